use std::io::Read;

use reqwest::StatusCode;

use crate::model::User;

/// Bytes of the image handed to the transport so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Rounded percentage; `None` while the total is unknown.
    pub fn percentage(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.loaded.min(self.total) as f64 * 100.0 / self.total as f64).round();
        Some(pct as u8)
    }
}

/// Terminal response of a profile-image upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub status: StatusCode,
    pub user: Option<User>,
}

/// Wraps a body reader and reports every chunk the transport pulls.
pub struct ProgressReader<R> {
    inner: R,
    loaded: u64,
    total: u64,
    sink: Box<dyn FnMut(UploadProgress) + Send>,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, total: u64, sink: Box<dyn FnMut(UploadProgress) + Send>) -> Self {
        Self {
            inner,
            loaded: 0,
            total,
            sink,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.loaded += n as u64;
            (self.sink)(UploadProgress {
                loaded: self.loaded,
                total: self.total,
            });
        }
        Ok(n)
    }
}

#[cfg(test)]
#[path = "../tests/remote/upload_tests.rs"]
mod tests;
