#![no_main]

use libfuzzer_sys::fuzz_target;
use resex::{ArchiveDecoder, CrawlLimits, ExeArchiveDecoder, MemoryLogger, SliceReader, Stream};

fuzz_target!(|data: &[u8]| {
    let reader = SliceReader::new(data);
    let mut stream = Stream::new(&reader);
    let decoder = ExeArchiveDecoder::with_limits(CrawlLimits::new(16, 10_000));
    if !decoder.detect(&mut stream) {
        return;
    }

    let logger = MemoryLogger::new();
    if let Ok(meta) = decoder.enumerate(&logger, &mut stream) {
        for entry in &meta {
            let _ = decoder.extract(&mut stream, &meta, entry);
        }
    }
});
