//! AT command client engine.
//!
//! The engine owns the receive state machine (line accumulation vs. inline
//! binary frames), the command lifecycle, response-line matching, and URC
//! demultiplexing. It is vocabulary-agnostic: feature APIs are expected to be
//! thin call-sites that build a command with [`AtClient::command`] and parse
//! the response with the codec.
//!
//! # Concurrency
//!
//! All calls are synchronous and blocking on the calling thread; the engine
//! spawns nothing. One command may be in flight per client: command execution
//! and idle receive passes serialize on an internal mutex. URCs are buffered
//! in the [`UrcQueue`] during receive processing and dispatched only after
//! the mutex is released, so a URC handler may itself issue commands. In
//! direct-dispatch mode (no queue configured) the handler runs on the
//! receive stack instead and must not issue commands.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use bytes::BytesMut;

use atlink_codec::{
    format_command, parse_params, Arg, ParamKind, ParamValue, BINARY_LENGTH_SIZE, BINARY_MARKER,
    COMMAND_TERMINATOR,
};

use crate::constants::*;
use crate::error::{AtError, TransportError};
use crate::transport::Transport;
use crate::urc::UrcQueue;

/// Counter used only to derive default log labels for clients.
static CLIENT_SEQ: AtomicU32 = AtomicU32::new(0);

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for an [`AtClient`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtClientConfig {
    /// Log label; a process-wide sequence number is used when absent.
    pub label: Option<String>,
    /// Receive line buffer capacity. A longer line is silently discarded.
    pub rx_buffer_size: usize,
    /// URC arena capacity. `None` disables queueing and switches the client
    /// to direct-dispatch URC mode.
    pub urc_arena_size: Option<usize>,
    /// Default (permanent) command timeout in milliseconds.
    pub command_timeout_ms: u64,
    /// Per-iteration transport read timeout in milliseconds.
    pub read_timeout_ms: u64,
}

impl Default for AtClientConfig {
    fn default() -> Self {
        AtClientConfig {
            label: None,
            rx_buffer_size: DEFAULT_RX_BUFFER_SIZE,
            urc_arena_size: Some(DEFAULT_URC_ARENA_SIZE),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

/// Callback invoked once per URC with the line text and binary payload
/// (empty if the URC carried none).
pub type UrcHandler = Box<dyn FnMut(&str, &[u8]) + Send>;

// ============================================================================
// Engine state
// ============================================================================

/// What kind of response line the in-flight command is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expectation {
    /// No response line expected, only a terminal status.
    None,
    /// A line starting with this prefix; the remainder is the parameter text.
    Prefix(String),
    /// Any non-status, non-URC, non-echo line is the response.
    AnyLine,
}

/// State of the in-flight command. `status: None` is the "no status yet"
/// sentinel; it only transitions away while the command executes.
#[derive(Debug)]
struct ExecState {
    deadline: Instant,
    status: Option<i32>,
    expect: Expectation,
    response: Option<Vec<u8>>,
}

/// How a received line was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    /// Matched the expected response; parameters captured.
    Response,
    /// Terminal status line (`OK` / `ERROR` / `ERROR:<n>`).
    Status,
    /// URC committed (or in progress) in the queue.
    UrcQueued,
    /// URC to be dispatched synchronously (direct mode).
    UrcDirect,
    /// Nothing to do; any binary payload bound to this line is discarded.
    Discard,
}

/// A URC captured for synchronous dispatch in direct mode.
#[derive(Debug)]
struct DirectUrc {
    line: Vec<u8>,
    payload: Vec<u8>,
}

/// Destination for binary response payloads, supplied per command.
#[derive(Debug, Default)]
struct BinaryOut<'a> {
    buf: Option<&'a mut [u8]>,
    written: usize,
}

struct Inner<T> {
    transport: T,
    line_buf: BytesMut,
    rx_capacity: usize,
    exec: Option<ExecState>,
    permanent_timeout: Duration,
    read_timeout: Duration,
    last_io_error: Option<i32>,
    label: String,
}

impl<T: Transport> Inner<T> {
    /// One bounded receive pass: a single transport read fed through the
    /// line/binary state machine. Returns URCs to dispatch in direct mode.
    fn rx_pass(
        &mut self,
        queue: Option<&UrcQueue>,
        timeout: Duration,
        bin: &mut BinaryOut<'_>,
    ) -> Result<Vec<DirectUrc>, TransportError> {
        let mut events = Vec::new();
        let mut chunk = [0u8; RX_CHUNK_SIZE];
        let n = self.transport.read(&mut chunk, timeout)?;
        let mut idx = 0;
        while idx < n {
            let byte = chunk[idx];
            idx += 1;
            match byte {
                BINARY_MARKER => {
                    self.on_binary_marker(&chunk[..n], &mut idx, queue, bin, &mut events)?;
                }
                b'\r' | b'\n' => self.on_line_end(queue, &mut events),
                _ => self.push_line_byte(byte),
            }
        }
        Ok(events)
    }

    fn push_line_byte(&mut self, byte: u8) {
        if self.line_buf.len() >= self.rx_capacity {
            log::trace!("[{}] rx line overflow, discarding partial line", self.label);
            self.line_buf.clear();
        }
        self.line_buf.extend_from_slice(&[byte]);
    }

    /// Take the accumulated line and reset the buffer for the next one.
    fn take_line(&mut self) -> Vec<u8> {
        let line = self.line_buf.to_vec();
        self.line_buf.clear();
        line
    }

    fn on_line_end(&mut self, queue: Option<&UrcQueue>, events: &mut Vec<DirectUrc>) {
        let line = self.take_line();
        if line.is_empty() {
            // CRLF yields an empty line between CR and LF; noise.
            return;
        }
        let class = self.classify_line(&line, false, queue);
        if class == LineClass::UrcDirect {
            events.push(DirectUrc {
                line,
                payload: Vec::new(),
            });
        }
    }

    /// Classify one terminated line, in protocol order. `binary_follows` is
    /// set when the line was terminated by the binary marker, in which case
    /// a queued URC record is left open for its payload.
    fn classify_line(
        &mut self,
        line: &[u8],
        binary_follows: bool,
        queue: Option<&UrcQueue>,
    ) -> LineClass {
        let starts_urc = matches!(line.first(), Some(b'+') | Some(b'*'));

        if let Some(exec) = self.exec.as_mut() {
            // Expected response prefix.
            if let Expectation::Prefix(prefix) = &exec.expect {
                if exec.response.is_none() && line.starts_with(prefix.as_bytes()) {
                    exec.response = Some(line[prefix.len()..].to_vec());
                    return LineClass::Response;
                }
            }

            // Terminal status lines.
            if line == OK_RESPONSE.as_bytes() {
                exec.status = Some(STATUS_OK);
                return LineClass::Status;
            }
            if line.starts_with(ERROR_RESPONSE.as_bytes()) {
                if line.len() == ERROR_RESPONSE.len() {
                    exec.status = Some(STATUS_SERVER_ERROR);
                    return LineClass::Status;
                }
                if let Some(code) = parse_extended_error(&line[ERROR_RESPONSE.len()..]) {
                    exec.status = Some(EXTENDED_ERROR_OFFSET - code);
                    return LineClass::Status;
                }
                // Malformed ERROR tail: falls through unclassified.
            }

            // Permissive fallback: while a response is awaited and not yet
            // found, any line that is not a URC and not a command echo is
            // taken as the response.
            let is_echo = line.starts_with(COMMAND_ECHO_PREFIX.as_bytes());
            if exec.expect != Expectation::None
                && exec.response.is_none()
                && !starts_urc
                && !is_echo
            {
                exec.response = Some(line.to_vec());
                return LineClass::Response;
            }
        }

        if starts_urc {
            return self.classify_urc(line, binary_follows, queue);
        }

        if line.starts_with(COMMAND_ECHO_PREFIX.as_bytes()) {
            log::trace!("[{}] ignoring command echo", self.label);
        } else {
            log::debug!(
                "[{}] unexpected line: {:?}",
                self.label,
                String::from_utf8_lossy(line)
            );
        }
        LineClass::Discard
    }

    fn classify_urc(
        &mut self,
        line: &[u8],
        binary_follows: bool,
        queue: Option<&UrcQueue>,
    ) -> LineClass {
        match queue {
            Some(queue) => {
                if queue.enqueue_begin(line) {
                    if !binary_follows {
                        queue.enqueue_end();
                    }
                    LineClass::UrcQueued
                } else {
                    log::warn!(
                        "[{}] urc queue full, dropping {:?}",
                        self.label,
                        String::from_utf8_lossy(line)
                    );
                    LineClass::Discard
                }
            }
            None => LineClass::UrcDirect,
        }
    }

    /// Handle the binary marker: read the 2-byte big-endian length, classify
    /// the line the marker terminated, and stream exactly `length` bytes to
    /// the selected destination. The frame length is authoritative: the
    /// bytes are fully consumed from the transport no matter where they end
    /// up.
    fn on_binary_marker(
        &mut self,
        chunk: &[u8],
        idx: &mut usize,
        queue: Option<&UrcQueue>,
        bin: &mut BinaryOut<'_>,
        events: &mut Vec<DirectUrc>,
    ) -> Result<(), TransportError> {
        let line = self.take_line();
        let deadline = match &self.exec {
            Some(exec) => exec.deadline,
            None => Instant::now() + Duration::from_millis(BINARY_FRAME_TIMEOUT_MS),
        };

        let mut len_bytes = [0u8; BINARY_LENGTH_SIZE];
        self.fill_exact(&mut len_bytes, chunk, idx, deadline)?;
        let len = u16::from_be_bytes(len_bytes) as usize;

        let class = if line.is_empty() {
            LineClass::Discard
        } else {
            self.classify_line(&line, true, queue)
        };

        match class {
            LineClass::Response => {
                let fit = match bin.buf.as_deref_mut() {
                    Some(buf) => {
                        let fit = len.min(buf.len() - bin.written);
                        let start = bin.written;
                        self.fill_exact(&mut buf[start..start + fit], chunk, idx, deadline)?;
                        fit
                    }
                    None => 0,
                };
                bin.written += fit;
                if fit < len {
                    log::warn!(
                        "[{}] response binary buffer short by {} bytes, discarding",
                        self.label,
                        len - fit
                    );
                    self.discard_exact(len - fit, chunk, idx, deadline)?;
                }
            }
            LineClass::UrcQueued => {
                if let Some(queue) = queue {
                    self.stream_urc_payload(queue, len, chunk, idx, deadline)?;
                } else {
                    self.discard_exact(len, chunk, idx, deadline)?;
                }
            }
            LineClass::UrcDirect => {
                let mut payload = vec![0u8; len];
                self.fill_exact(&mut payload, chunk, idx, deadline)?;
                events.push(DirectUrc { line, payload });
            }
            LineClass::Status | LineClass::Discard => {
                self.discard_exact(len, chunk, idx, deadline)?;
            }
        }
        Ok(())
    }

    fn stream_urc_payload(
        &mut self,
        queue: &UrcQueue,
        len: usize,
        chunk: &[u8],
        idx: &mut usize,
        deadline: Instant,
    ) -> Result<(), TransportError> {
        if queue.payload_remaining() < len {
            log::warn!(
                "[{}] urc payload of {} bytes does not fit in queue, dropping urc",
                self.label,
                len
            );
            queue.enqueue_abort();
            return self.discard_exact(len, chunk, idx, deadline);
        }
        let mut appended = true;
        let result = self.stream_exact(len, chunk, idx, deadline, |bytes| {
            if !queue.append_payload(bytes) {
                appended = false;
            }
        });
        match result {
            Ok(()) if appended => {
                queue.enqueue_end();
                Ok(())
            }
            Ok(()) => {
                queue.enqueue_abort();
                Ok(())
            }
            Err(err) => {
                queue.enqueue_abort();
                Err(err)
            }
        }
    }

    /// Consume exactly `remaining` bytes, first from the current chunk, then
    /// from further transport reads, handing each piece to `sink`.
    fn stream_exact<F: FnMut(&[u8])>(
        &mut self,
        mut remaining: usize,
        chunk: &[u8],
        idx: &mut usize,
        deadline: Instant,
        mut sink: F,
    ) -> Result<(), TransportError> {
        let available = (chunk.len() - *idx).min(remaining);
        if available > 0 {
            sink(&chunk[*idx..*idx + available]);
            *idx += available;
            remaining -= available;
        }
        let mut scratch = [0u8; 64];
        while remaining > 0 {
            if Instant::now() >= deadline {
                // The frame is abandoned; bytes that arrive late will be
                // read as line text until the next terminator resyncs.
                log::warn!(
                    "[{}] binary frame stalled with {} bytes outstanding, stream may desync",
                    self.label,
                    remaining
                );
                self.line_buf.clear();
                return Err(TransportError::Timeout);
            }
            let want = remaining.min(scratch.len());
            let n = self.transport.read(&mut scratch[..want], self.read_timeout)?;
            if n > 0 {
                sink(&scratch[..n]);
                remaining -= n;
            }
        }
        Ok(())
    }

    fn fill_exact(
        &mut self,
        dest: &mut [u8],
        chunk: &[u8],
        idx: &mut usize,
        deadline: Instant,
    ) -> Result<(), TransportError> {
        let mut pos = 0;
        self.stream_exact(dest.len(), chunk, idx, deadline, |bytes| {
            dest[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        })
    }

    fn discard_exact(
        &mut self,
        count: usize,
        chunk: &[u8],
        idx: &mut usize,
        deadline: Instant,
    ) -> Result<(), TransportError> {
        self.stream_exact(count, chunk, idx, deadline, |_| {})
    }
}

fn parse_extended_error(tail: &[u8]) -> Option<i32> {
    let digits = tail.strip_prefix(b":")?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse::<i32>().ok()
}

// ============================================================================
// Client
// ============================================================================

/// A client for one transport connection to a companion module.
///
/// See the [module docs](self) for the concurrency model.
pub struct AtClient<T: Transport> {
    inner: Mutex<Inner<T>>,
    urc_queue: Option<UrcQueue>,
    handler: Mutex<Option<UrcHandler>>,
    /// Thread currently running a direct-dispatch handler. Commands from
    /// that thread are rejected instead of deadlocking on `inner`.
    dispatching: Mutex<Option<std::thread::ThreadId>>,
    label: String,
}

impl<T: Transport> AtClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T, config: AtClientConfig) -> Self {
        let label = config
            .label
            .clone()
            .unwrap_or_else(|| format!("at{}", CLIENT_SEQ.fetch_add(1, Ordering::Relaxed)));
        AtClient {
            inner: Mutex::new(Inner {
                transport,
                line_buf: BytesMut::with_capacity(config.rx_buffer_size),
                rx_capacity: config.rx_buffer_size,
                exec: None,
                permanent_timeout: Duration::from_millis(config.command_timeout_ms),
                read_timeout: Duration::from_millis(config.read_timeout_ms),
                last_io_error: None,
                label: label.clone(),
            }),
            urc_queue: config.urc_arena_size.map(UrcQueue::new),
            handler: Mutex::new(None),
            dispatching: Mutex::new(None),
            label,
        }
    }

    /// The client's log label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether URC queueing is enabled (vs. direct-dispatch mode).
    pub fn urc_queueing(&self) -> bool {
        self.urc_queue.is_some()
    }

    /// Register the URC handler. In queued mode the handler runs during
    /// drains (after a command completes, or from [`poll_urcs`]) and may
    /// issue commands; in direct-dispatch mode it runs on the receive stack
    /// and must not. URCs arriving in queued mode before a handler is
    /// registered stay buffered.
    ///
    /// May be called from inside a running handler to register a
    /// replacement; the replacement takes effect once the current dispatch
    /// finishes.
    ///
    /// [`poll_urcs`]: Self::poll_urcs
    pub fn on_urc(&self, handler: impl FnMut(&str, &[u8]) + Send + 'static) {
        *self.lock_handler() = Some(Box::new(handler));
    }

    /// Set the permanent command timeout used by commands without an
    /// explicit override.
    pub fn set_command_timeout(&self, timeout: Duration) {
        self.lock_inner().permanent_timeout = timeout;
    }

    /// The permanent command timeout.
    pub fn command_timeout(&self) -> Duration {
        self.lock_inner().permanent_timeout
    }

    /// Code of the most recent transport failure, if any.
    pub fn last_io_error(&self) -> Option<i32> {
        self.lock_inner().last_io_error
    }

    /// Start building a command.
    pub fn command<'a>(&'a self, name: &'a str) -> CommandBuilder<'a, T> {
        CommandBuilder {
            client: self,
            name,
            args: &[],
            expect: Expectation::None,
            timeout: None,
            binary_out: None,
        }
    }

    /// Run one receive-and-classify pass while idle, then dispatch any
    /// queued URCs. The pass holds the command mutex so a command cannot
    /// start mid-way through it; dispatch happens after it is released.
    pub fn poll_urcs(&self, timeout: Duration) -> Result<(), AtError> {
        if self.in_direct_dispatch() {
            return Err(AtError::BusyReentry);
        }
        {
            let mut inner = self.lock_inner();
            let mut bin = BinaryOut::default();
            match inner.rx_pass(self.urc_queue.as_ref(), timeout, &mut bin) {
                Ok(events) => self.dispatch_events(events),
                Err(err) => {
                    inner.last_io_error = Some(err.code());
                    return Err(err.into());
                }
            }
        }
        self.drain_queue();
        Ok(())
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_handler(&self) -> MutexGuard<'_, Option<UrcHandler>> {
        self.handler.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Synchronous dispatch for direct mode. The caller still holds the
    /// command mutex: the receive stack is active and handlers must not
    /// issue commands.
    fn dispatch_events(&self, events: Vec<DirectUrc>) {
        if events.is_empty() {
            return;
        }
        let Some(mut handler) = self.lock_handler().take() else {
            return;
        };
        *self.lock_dispatching() = Some(std::thread::current().id());
        for event in events {
            let line = String::from_utf8_lossy(&event.line);
            handler(&line, &event.payload);
        }
        *self.lock_dispatching() = None;
        self.restore_handler(handler);
    }

    fn in_direct_dispatch(&self) -> bool {
        *self.lock_dispatching() == Some(std::thread::current().id())
    }

    fn lock_dispatching(&self) -> MutexGuard<'_, Option<std::thread::ThreadId>> {
        self.dispatching.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drain and dispatch queued URCs. Never called with the command mutex
    /// held. The handler is taken out of its slot for the duration of the
    /// drain, so a drain triggered from inside a handler (via a nested
    /// command) finds the slot empty and backs off; the outer drain picks up
    /// the remaining entries.
    fn drain_queue(&self) {
        let Some(queue) = &self.urc_queue else {
            return;
        };
        let Some(mut handler) = self.lock_handler().take() else {
            return;
        };
        while let Some(entry) = queue.dequeue_begin() {
            let line = String::from_utf8_lossy(entry.line()).into_owned();
            handler(&line, entry.payload());
        }
        self.restore_handler(handler);
    }

    /// Put a taken-out handler back, unless the handler re-registered a
    /// replacement (via [`on_urc`](Self::on_urc)) while it was running.
    fn restore_handler(&self, handler: UrcHandler) {
        let mut guard = self.lock_handler();
        if guard.is_none() {
            *guard = Some(handler);
        }
    }
}

// ============================================================================
// Command execution
// ============================================================================

/// Builder for one command execution.
pub struct CommandBuilder<'a, T: Transport> {
    client: &'a AtClient<T>,
    name: &'a str,
    args: &'a [Arg<'a>],
    expect: Expectation,
    timeout: Option<Duration>,
    binary_out: Option<&'a mut [u8]>,
}

impl<'a, T: Transport> CommandBuilder<'a, T> {
    /// Set the command arguments.
    pub fn args(mut self, args: &'a [Arg<'a>]) -> Self {
        self.args = args;
        self
    }

    /// Expect a response line starting with `prefix`; the remainder of the
    /// line becomes the response parameter text.
    pub fn expect_prefix(mut self, prefix: &str) -> Self {
        self.expect = Expectation::Prefix(prefix.to_string());
        self
    }

    /// Expect a response with no fixed prefix: the whole matching line is
    /// the parameter text.
    pub fn expect_line(mut self) -> Self {
        self.expect = Expectation::AnyLine;
        self
    }

    /// Override the command timeout for this execution only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Supply a destination for a binary response payload. The number of
    /// bytes actually written is reported in
    /// [`CommandResponse::binary_len`].
    pub fn binary_out(mut self, buf: &'a mut [u8]) -> Self {
        self.binary_out = Some(buf);
        self
    }

    /// Execute the command: write it, await the terminal status while
    /// classifying incoming lines, then dispatch URCs accumulated during
    /// the command.
    ///
    /// A remote `ERROR` is reported as [`AtError::ServerError`] /
    /// [`AtError::ExtendedError`]; neither timeouts nor transport failures
    /// are retried.
    pub fn execute(self) -> Result<CommandResponse, AtError> {
        let client = self.client;
        if client.in_direct_dispatch() {
            return Err(AtError::BusyReentry);
        }

        let mut wire = Vec::with_capacity(self.name.len() + 16);
        let ends_binary = format_command(&mut wire, self.name, self.args)?;
        if !ends_binary {
            // After a binary transfer the remote expects raw bytes already
            // sent, not another line.
            wire.push(COMMAND_TERMINATOR);
        }

        let mut inner = client.lock_inner();
        debug_assert!(inner.exec.is_none(), "one in-flight command per client");
        let timeout = self.timeout.unwrap_or(inner.permanent_timeout);

        log::debug!("[{}] >> {}", client.label, self.name);
        if let Err(err) = inner.transport.write_all(&wire) {
            inner.last_io_error = Some(err.code());
            return Err(err.into());
        }

        let deadline = Instant::now() + timeout;
        inner.exec = Some(ExecState {
            deadline,
            status: None,
            expect: self.expect,
            response: None,
        });

        let mut bin = BinaryOut {
            buf: self.binary_out,
            written: 0,
        };
        let queue = client.urc_queue.as_ref();
        let mut transport_failure = None;

        let status = loop {
            if let Some(status) = inner.exec.as_ref().and_then(|exec| exec.status) {
                break status;
            }
            if Instant::now() >= deadline {
                break STATUS_TIMEOUT;
            }
            let read_timeout = inner.read_timeout;
            match inner.rx_pass(queue, read_timeout, &mut bin) {
                Ok(events) => client.dispatch_events(events),
                Err(err) => {
                    inner.last_io_error = Some(err.code());
                    transport_failure = Some(err);
                    break STATUS_IO_ERROR;
                }
            }
        };

        let exec = inner.exec.take();
        drop(inner);
        // URCs buffered during the command are dispatched only now, outside
        // the command mutex, so a handler may issue a new command.
        client.drain_queue();

        match status {
            STATUS_OK => Ok(CommandResponse {
                params: exec.and_then(|exec| exec.response),
                binary_len: bin.written,
            }),
            STATUS_SERVER_ERROR => Err(AtError::ServerError),
            STATUS_TIMEOUT => {
                log::debug!("[{}] command {} timed out", client.label, self.name);
                Err(AtError::Timeout)
            }
            STATUS_IO_ERROR => Err(match transport_failure {
                Some(err) => AtError::Transport(err),
                None => AtError::Transport(TransportError::Code(STATUS_IO_ERROR)),
            }),
            code => Err(AtError::ExtendedError(EXTENDED_ERROR_OFFSET - code)),
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Default)]
pub struct CommandResponse {
    params: Option<Vec<u8>>,
    binary_len: usize,
}

impl CommandResponse {
    /// Raw response parameter text, if a response line matched.
    pub fn params_raw(&self) -> Option<&[u8]> {
        self.params.as_deref()
    }

    /// Response parameter text as a string.
    pub fn params_text(&self) -> Option<Cow<'_, str>> {
        self.params.as_deref().map(String::from_utf8_lossy)
    }

    /// Bytes written to the caller's binary response buffer.
    pub fn binary_len(&self) -> usize {
        self.binary_len
    }

    /// Destructively parse the response parameters against a kind sequence.
    /// The parameter buffer is rewritten in place; call at most once.
    pub fn parse(&mut self, kinds: &[ParamKind]) -> Result<Vec<ParamValue<'_>>, AtError> {
        match self.params.as_mut() {
            Some(buf) => Ok(parse_params(buf, kinds)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extended_error() {
        assert_eq!(parse_extended_error(b":123"), Some(123));
        assert_eq!(parse_extended_error(b":0"), Some(0));
        assert_eq!(parse_extended_error(b"123"), None);
        assert_eq!(parse_extended_error(b":"), None);
        assert_eq!(parse_extended_error(b":12x"), None);
        assert_eq!(parse_extended_error(b": 12"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = AtClientConfig::default();
        assert_eq!(config.rx_buffer_size, DEFAULT_RX_BUFFER_SIZE);
        assert_eq!(config.urc_arena_size, Some(DEFAULT_URC_ARENA_SIZE));
    }
}
