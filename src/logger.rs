//! Diagnostic sink for recoverable crawl failures.

use std::cell::RefCell;
use std::fmt;

/// Receives one message per resource entry that could not be read.
///
/// These failures never abort an enumeration.
pub trait Logger {
    fn error(&self, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        log::error!(target: "resex::crawler", "{args}");
    }
}

/// Keeps diagnostics in memory, e.g. to report them after a run.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: RefCell<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl Logger for MemoryLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.messages.borrow_mut().push(args.to_string());
    }
}
