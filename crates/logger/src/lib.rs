use std::{fmt::Display, sync::Mutex};

use anyhow::anyhow;

/// Sink for user-facing build diagnostics.
///
/// Internal tracing goes through `tracing`; this trait is for messages a
/// person running the build is expected to read.
pub trait Logger: Clone {
    fn log(&self, message: impl Display);
    fn warn(&self, message: impl Display) {
        self.log(format!("WARN: {}", message));
    }
    fn error(&self, message: impl Display) {
        self.log(format!("ERROR: {}", message));
    }
}

impl<T: Logger> Logger for &T {
    fn log(&self, message: impl Display) {
        (*self).log(message);
    }
    fn warn(&self, message: impl Display) {
        (*self).warn(message);
    }
    fn error(&self, message: impl Display) {
        (*self).error(message);
    }
}

/// Writes plain messages to stdout and warnings/errors to stderr,
/// stamped with the seconds elapsed since the logger was created.
#[derive(Clone)]
pub struct StdioLogger {
    zero_time: std::time::Instant,
}

impl StdioLogger {
    pub fn new() -> Self {
        Self {
            zero_time: std::time::Instant::now(),
        }
    }

    fn elapsed(&self) -> f64 {
        std::time::Instant::now()
            .duration_since(self.zero_time)
            .as_secs_f64()
    }
}

impl Default for StdioLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StdioLogger {
    fn log(&self, message: impl Display) {
        println!("[{:.04}] {}", self.elapsed(), message);
    }
    fn warn(&self, message: impl Display) {
        eprintln!("[{:.04}] WARN: {}", self.elapsed(), message);
    }
    fn error(&self, message: impl Display) {
        eprintln!("[{:.04}] ERROR: {}", self.elapsed(), message);
    }
}

/// Collects every message in memory. Used by tests to assert on the
/// diagnostics a transform produced.
pub struct VecLogger {
    logs: Mutex<Vec<String>>,
}

impl Logger for &VecLogger {
    fn log(&self, message: impl Display) {
        self.logs
            .lock()
            .expect("locking the logger array should not fail!")
            .push(format!("{}", message));
    }
}

impl VecLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn get_logs(self) -> Result<Vec<String>, anyhow::Error> {
        self.logs
            .into_inner()
            .map_err(|err| anyhow!("error unlocking VecLogger logs:{err}"))
    }
}

impl Default for VecLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{Logger, VecLogger};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vec_logger_prefixes_levels() {
        let logger = VecLogger::new();
        (&logger).log("plain");
        (&logger).warn("careful");
        (&logger).error("broken");
        assert_eq!(
            logger.get_logs().unwrap(),
            vec!["plain", "WARN: careful", "ERROR: broken"]
        );
    }

    #[test]
    fn test_logger_through_double_reference() {
        let logger = VecLogger::new();
        let by_ref = &logger;
        (&by_ref).warn("nested");
        assert_eq!(logger.get_logs().unwrap(), vec!["WARN: nested"]);
    }
}
