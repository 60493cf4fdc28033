//! Cloneable in-memory writer for capturing diagnostic streams in tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// A `Write` implementation backed by a shared buffer.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// bridge as a diagnostic writer and keep another to read what was
/// written.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let buf = self.inner.lock().expect("buffer lock poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Non-empty lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().expect("buffer lock poisoned");
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
