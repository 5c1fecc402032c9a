#![no_main]

use libfuzzer_sys::fuzz_target;
use resex::PEHeaders;

fuzz_target!(|data: &[u8]| {
    // Headers only; must never panic, only return errors for invalid input
    let _ = PEHeaders::from_slice(data);
});
