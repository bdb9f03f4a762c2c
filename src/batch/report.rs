//! User facing reporting of batch progress and outcomes.
#[cfg(test)]
use std::sync::Mutex;

/// Sink for messages emitted while a batch runs.
pub trait Reporter: Send + Sync {
    /// Reports an informational message.
    fn info(&self, msg: &str);

    /// Reports a failure message.
    fn error(&self, msg: &str);

    /// Reports that the `current` of `total` resources is being processed.
    fn progress(&self, current: usize, total: usize);
}

/// Reporter writing through the `log` facade.
///
/// Progress is only emitted at debug level, so it shows up with the
/// verbose switch and stays out of the way otherwise.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, msg: &str) {
        info!("{}", msg);
    }

    fn error(&self, msg: &str) {
        error!("{}", msg);
    }

    fn progress(&self, current: usize, total: usize) {
        debug!("Processing {}/{}...", current, total);
    }
}

/// Reporter which captures everything it is given, for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<(usize, usize)>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn info(&self, msg: &str) {
        self.infos.lock().unwrap().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }

    fn progress(&self, current: usize, total: usize) {
        self.progress.lock().unwrap().push((current, total));
    }
}
