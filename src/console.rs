//! User-facing narration, separate from structured `tracing` output.
//!
//! The primary channel (stdout) carries what the run accomplished; the
//! diagnostic channel carries notices such as skipped files and goes through
//! the tracing subscriber on stderr, so `--log-level` can silence it.

pub trait Console: Send + Sync {
    fn print(&self, message: &str);
    fn diagnostic(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn diagnostic(&self, message: &str) {
        tracing::info!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::Console;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingConsole {
        printed: Mutex<Vec<String>>,
        diagnostics: Mutex<Vec<String>>,
    }

    impl RecordingConsole {
        pub(crate) fn printed(&self) -> Vec<String> {
            self.printed.lock().unwrap().clone()
        }

        pub(crate) fn diagnostics(&self) -> Vec<String> {
            self.diagnostics.lock().unwrap().clone()
        }
    }

    impl Console for RecordingConsole {
        fn print(&self, message: &str) {
            self.printed.lock().unwrap().push(message.to_string());
        }

        fn diagnostic(&self, message: &str) {
            self.diagnostics.lock().unwrap().push(message.to_string());
        }
    }
}
