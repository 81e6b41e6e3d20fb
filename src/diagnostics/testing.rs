//! Test helpers: a recording sink and a lock serializing access to the
//! process-wide implementation.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::global::{override_implementation, reset_implementation};
use super::sink::{DiagnosticOptions, Diagnostics, Test, Thunk};
use crate::error::DiagnosticError;

static LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that swap the global sink.
pub(crate) fn lock() -> MutexGuard<'static, ()> {
    LOCK.lock()
}

/// Runs `f` with `sink` installed, then restores the default.
pub(crate) fn isolated<R>(sink: Arc<dyn Diagnostics>, f: impl FnOnce() -> R) -> R {
    struct Reset;
    impl Drop for Reset {
        fn drop(&mut self) {
            reset_implementation();
        }
    }

    let _guard = lock();
    override_implementation(sink);
    let _reset = Reset;
    f()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Record {
    Warn { message: String, id: Option<String> },
    Debug { message: String },
    Deprecate { message: String, id: Option<String> },
}

impl Record {
    fn message(&self) -> &str {
        match self {
            Record::Warn { message, .. }
            | Record::Debug { message }
            | Record::Deprecate { message, .. } => message,
        }
    }
}

/// Records failed checks; assertions fail like the debug sink, deprecations never do.
#[derive(Default)]
pub(crate) struct Recorder {
    records: Mutex<Vec<Record>>,
}

impl Recorder {
    /// Records whose message contains `needle`; other tests may emit concurrently.
    pub(crate) fn records_containing(&self, needle: &str) -> Vec<Record> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.message().contains(needle))
            .cloned()
            .collect()
    }

    pub(crate) fn warnings_containing(&self, needle: &str) -> Vec<(String, Option<String>)> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                Record::Warn { message, id } if message.contains(needle) => {
                    Some((message.clone(), id.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for Recorder {
    fn assert(&self, message: &str, test: Test<'_>) -> Result<(), DiagnosticError> {
        if test.holds() {
            return Ok(());
        }
        Err(DiagnosticError::AssertionFailed {
            message: message.to_string(),
        })
    }

    fn warn(&self, message: &str, test: Test<'_>, options: &DiagnosticOptions) {
        if !test.holds() {
            self.records.lock().push(Record::Warn {
                message: message.to_string(),
                id: options.id().map(str::to_string),
            });
        }
    }

    fn debug(&self, message: &str) {
        self.records.lock().push(Record::Debug {
            message: message.to_string(),
        });
    }

    fn deprecate(
        &self,
        message: &str,
        test: Test<'_>,
        options: &DiagnosticOptions,
    ) -> Result<(), DiagnosticError> {
        if !test.holds() {
            self.records.lock().push(Record::Deprecate {
                message: message.to_string(),
                id: options.id().map(str::to_string),
            });
        }
        Ok(())
    }

    fn deprecate_func<'a>(
        &self,
        message: &str,
        options: &DiagnosticOptions,
        mut f: Thunk<'a>,
    ) -> Thunk<'a> {
        let message = message.to_string();
        let options = options.clone();
        Box::new(move || {
            super::global::deprecate(&message, false, &options)?;
            f()
        })
    }

    fn run_in_debug(&self, f: &mut dyn FnMut()) {
        f();
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}
