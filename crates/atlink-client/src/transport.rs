//! Byte-level transport contract.
//!
//! The engine only needs a bounded read and a write over some byte stream
//! (UART, TCP bridge, in-memory test double). Timekeeping uses the standard
//! monotonic clock; mutual exclusion uses `std::sync::Mutex`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;

/// A byte stream the engine can drive.
pub trait Transport: Send {
    /// Read up to `buf.len()` bytes, waiting at most `timeout`.
    ///
    /// Returning `Ok(0)` means the timeout elapsed with no data, which is
    /// not an error. A short read is likewise fine.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError>;

    /// Write the whole buffer.
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

// ============================================================================
// Scripted transport
// ============================================================================

#[derive(Debug, Default)]
struct MockState {
    reads: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    read_error: Option<i32>,
}

/// A scripted in-memory transport for tests and examples.
///
/// Reads pop pre-queued chunks in order; an empty script behaves like a
/// silent line (the read sleeps for its timeout and returns 0). Writes are
/// captured for inspection.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create an empty scripted transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk to be returned by a future read.
    pub fn push_read(&self, data: &[u8]) {
        self.lock().reads.push_back(data.to_vec());
    }

    /// Make the next read fail with the given transport error code.
    pub fn fail_next_read(&self, code: i32) {
        self.lock().read_error = Some(code);
    }

    /// All bytes written so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    /// Drop captured writes.
    pub fn clear_written(&self) {
        self.lock().written.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError> {
        let mut state = self.lock();
        if let Some(code) = state.read_error.take() {
            return Err(TransportError::Code(code));
        }
        match state.reads.front_mut() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n == chunk.len() {
                    state.reads.pop_front();
                } else {
                    chunk.drain(..n);
                }
                Ok(n)
            }
            None => {
                drop(state);
                std::thread::sleep(timeout);
                Ok(0)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.lock().written.extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transport_scripted_reads() {
        let mock = MockTransport::new();
        mock.push_read(b"abc");
        mock.push_read(b"de");

        let mut t = mock.clone();
        let mut buf = [0u8; 2];
        assert_eq!(t.read(&mut buf, Duration::from_millis(1)).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        // Remainder of the first chunk comes before the second.
        assert_eq!(t.read(&mut buf, Duration::from_millis(1)).unwrap(), 1);
        assert_eq!(buf[0], b'c');
        assert_eq!(t.read(&mut buf, Duration::from_millis(1)).unwrap(), 2);
        assert_eq!(&buf, b"de");
    }

    #[test]
    fn test_mock_transport_captures_writes() {
        let mock = MockTransport::new();
        let mut t = mock.clone();
        t.write_all(b"AT\r").unwrap();
        assert_eq!(mock.written(), b"AT\r");
    }

    #[test]
    fn test_mock_transport_empty_read_times_out() {
        let mock = MockTransport::new();
        let mut t = mock.clone();
        let mut buf = [0u8; 4];
        let start = std::time::Instant::now();
        assert_eq!(t.read(&mut buf, Duration::from_millis(10)).unwrap(), 0);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
