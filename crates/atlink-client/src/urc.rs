//! URC queue.
//!
//! Unsolicited result codes arrive interleaved with command traffic, during
//! receive processing. They are buffered here so dispatch can happen outside
//! the receive critical section, where a handler is free to issue new
//! commands. The queue is a single byte arena holding variable-length
//! records, packed from offset 0:
//!
//! ```text
//! +-------------+----------------+------------------+-------------------+
//! | line_len u16| payload_len u16| line[0..line_len]| payload[0..p_len] |
//! +-------------+----------------+------------------+-------------------+
//! ```
//!
//! The arena is a bump allocator, not a ring: records are appended at the
//! tail and only ever removed from the head, with the remaining bytes
//! compacted down to offset 0 on dequeue. Capacity is fixed at construction;
//! a URC that does not fit is dropped rather than blocking the receive path.
//!
//! Enqueue is two-phase so a binary payload of unknown size can be appended
//! after the line is committed: `enqueue_begin` / `append_payload` /
//! `enqueue_end`, with `enqueue_abort` fully unwinding a record whose
//! promised payload turned out not to fit. Dequeue is likewise two-phase: at
//! most one dequeue may be in flight (a second one reports empty instead of
//! blocking), and dropping the returned entry compacts the arena.

use std::sync::{Mutex, MutexGuard, TryLockError};

/// Bytes of record header: line length + payload length, both u16 LE.
const RECORD_HEADER_SIZE: usize = 4;

/// Maximum length of a queued line or payload.
const MAX_FIELD_LEN: usize = u16::MAX as usize;

#[derive(Debug)]
struct Arena {
    buf: Box<[u8]>,
    /// Next free byte; everything below it is packed complete records,
    /// except a trailing in-progress record starting at `pending`.
    used: usize,
    /// Offset of the in-progress (enqueue-begun, not yet ended) record.
    pending: Option<usize>,
}

impl Arena {
    fn record_lens(&self, offset: usize) -> Option<(usize, usize)> {
        if offset + RECORD_HEADER_SIZE > self.used {
            return None;
        }
        let line_len =
            u16::from_le_bytes([self.buf[offset], self.buf[offset + 1]]) as usize;
        let payload_len =
            u16::from_le_bytes([self.buf[offset + 2], self.buf[offset + 3]]) as usize;
        if offset + RECORD_HEADER_SIZE + line_len + payload_len > self.used {
            return None;
        }
        Some((line_len, payload_len))
    }
}

/// Bounded FIFO queue of URC records over a fixed byte arena.
#[derive(Debug)]
pub struct UrcQueue {
    arena: Mutex<Arena>,
    /// Held for the duration of one dequeue; acquired with `try_lock` so a
    /// concurrent dequeuer sees "empty" instead of blocking.
    drain: Mutex<()>,
}

impl UrcQueue {
    /// Create a queue with a fixed arena capacity in bytes.
    pub fn new(capacity: usize) -> Self {
        UrcQueue {
            arena: Mutex::new(Arena {
                buf: vec![0u8; capacity].into_boxed_slice(),
                used: 0,
                pending: None,
            }),
            drain: Mutex::new(()),
        }
    }

    fn lock_arena(&self) -> MutexGuard<'_, Arena> {
        self.arena.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.lock_arena().buf.len()
    }

    /// Bytes currently occupied by records (the arena cursor).
    pub fn used_bytes(&self) -> usize {
        self.lock_arena().used
    }

    /// Whether a complete record is available for dequeue.
    pub fn is_empty(&self) -> bool {
        let arena = self.lock_arena();
        arena.used == 0 || arena.pending == Some(0)
    }

    // ------------------------------------------------------------------
    // Two-phase enqueue (single producer: the receive path)
    // ------------------------------------------------------------------

    /// Start a record with the given line text. Returns `false`, leaving the
    /// cursor untouched, if the line does not fit; the caller must not call
    /// [`append_payload`](Self::append_payload) or the end/abort operations
    /// after a failed begin.
    pub fn enqueue_begin(&self, line: &[u8]) -> bool {
        let mut arena = self.lock_arena();
        if arena.pending.is_some() {
            log::warn!("urc queue: enqueue_begin while a record is in progress");
            return false;
        }
        if line.len() > MAX_FIELD_LEN {
            return false;
        }
        let needed = RECORD_HEADER_SIZE + line.len();
        if arena.buf.len() - arena.used < needed {
            return false;
        }
        let start = arena.used;
        arena.buf[start..start + 2].copy_from_slice(&(line.len() as u16).to_le_bytes());
        arena.buf[start + 2..start + 4].copy_from_slice(&0u16.to_le_bytes());
        arena.buf[start + RECORD_HEADER_SIZE..start + needed].copy_from_slice(line);
        arena.used += needed;
        arena.pending = Some(start);
        true
    }

    /// Upper bound for a binary payload appended to the in-progress record.
    pub fn payload_remaining(&self) -> usize {
        let arena = self.lock_arena();
        if arena.pending.is_some() {
            arena.buf.len() - arena.used
        } else {
            0
        }
    }

    /// Append payload bytes to the in-progress record. Returns `false` if
    /// the bytes do not fit; the caller should then abort the record.
    pub fn append_payload(&self, bytes: &[u8]) -> bool {
        let mut arena = self.lock_arena();
        let Some(start) = arena.pending else {
            log::warn!("urc queue: append_payload without enqueue_begin");
            return false;
        };
        if arena.buf.len() - arena.used < bytes.len() {
            return false;
        }
        let Some((_, payload_len)) = arena.record_lens(start) else {
            return false;
        };
        if payload_len + bytes.len() > MAX_FIELD_LEN {
            return false;
        }
        let at = arena.used;
        arena.buf[at..at + bytes.len()].copy_from_slice(bytes);
        arena.used += bytes.len();
        let new_len = (payload_len + bytes.len()) as u16;
        arena.buf[start + 2..start + 4].copy_from_slice(&new_len.to_le_bytes());
        true
    }

    /// Finalize the in-progress record, making it visible to dequeue.
    pub fn enqueue_end(&self) {
        let mut arena = self.lock_arena();
        if arena.pending.take().is_none() {
            log::warn!("urc queue: enqueue_end without enqueue_begin");
        }
    }

    /// Unwind the in-progress record completely.
    pub fn enqueue_abort(&self) {
        let mut arena = self.lock_arena();
        if let Some(start) = arena.pending.take() {
            arena.used = start;
        }
    }

    // ------------------------------------------------------------------
    // Two-phase dequeue (single in-flight consumer)
    // ------------------------------------------------------------------

    /// Take the oldest complete record, or `None` if the queue is empty or
    /// another dequeue is already in flight.
    ///
    /// The record's bytes stay in the arena until the returned [`UrcEntry`]
    /// is dropped, which compacts the remaining records down to offset 0.
    pub fn dequeue_begin(&self) -> Option<UrcEntry<'_>> {
        let drain = match self.drain.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return None,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let arena = self.lock_arena();
        if arena.used == 0 || arena.pending == Some(0) {
            return None;
        }
        let (line_len, payload_len) = arena.record_lens(0)?;
        let line_start = RECORD_HEADER_SIZE;
        let payload_start = line_start + line_len;
        let total = payload_start + payload_len;
        let line = arena.buf[line_start..payload_start].to_vec();
        let payload = arena.buf[payload_start..total].to_vec();
        drop(arena);

        Some(UrcEntry {
            queue: self,
            line,
            payload,
            total,
            _drain: drain,
        })
    }

    /// Remove `total` bytes from the head and compact. Called from
    /// [`UrcEntry::drop`].
    fn dequeue_end(&self, total: usize) {
        let mut arena = self.lock_arena();
        let used = arena.used;
        debug_assert!(total <= used);
        arena.buf.copy_within(total..used, 0);
        arena.used = used - total;
        if let Some(pending) = arena.pending {
            arena.pending = Some(pending - total);
        }
    }
}

/// A dequeued URC record.
///
/// Holds the queue's dequeue slot; dropping the entry completes the dequeue
/// and compacts the arena.
pub struct UrcEntry<'q> {
    queue: &'q UrcQueue,
    line: Vec<u8>,
    payload: Vec<u8>,
    total: usize,
    _drain: MutexGuard<'q, ()>,
}

impl UrcEntry<'_> {
    /// The URC line text (without terminator).
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// The binary payload, empty if the URC carried none.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl Drop for UrcEntry<'_> {
    fn drop(&mut self) {
        self.queue.dequeue_end(self.total);
    }
}

impl std::fmt::Debug for UrcEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrcEntry")
            .field("line", &String::from_utf8_lossy(&self.line))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
