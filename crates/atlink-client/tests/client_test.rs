//! End-to-end tests of the command engine over the scripted transport.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use atlink_client::{
    Arg, AtClient, AtClientConfig, AtError, MockTransport, ParamKind, ParamValue, TransportError,
    EXTENDED_ERROR_OFFSET,
};

fn client_with(mock: &MockTransport) -> AtClient<MockTransport> {
    let config = AtClientConfig {
        command_timeout_ms: 1_000,
        read_timeout_ms: 5,
        ..AtClientConfig::default()
    };
    AtClient::new(mock.clone(), config)
}

#[test]
fn test_simple_command_ok() {
    let mock = MockTransport::new();
    mock.push_read(b"OK\r\n");

    let client = client_with(&mock);
    let response = client.command("AT").execute().unwrap();
    assert_eq!(response.params_raw(), None);
    assert_eq!(mock.written(), b"AT\r");
}

#[test]
fn test_ipv4_argument_on_the_wire() {
    let mock = MockTransport::new();
    mock.push_read(b"OK\r\n");

    let client = client_with(&mock);
    client
        .command("AT+FOO=")
        .args(&[Arg::Ipv4(std::net::Ipv4Addr::from(0x0010_2030u32))])
        .execute()
        .unwrap();
    assert_eq!(mock.written(), b"AT+FOO=0.16.32.48\r");
}

#[test]
fn test_prefix_response_skips_echo() {
    let mock = MockTransport::new();
    mock.push_read(b"AT+CFG?\r\n+CFG:1,\"name\"\r\nOK\r\n");

    let client = client_with(&mock);
    let mut response = client
        .command("AT+CFG?")
        .expect_prefix("+CFG:")
        .execute()
        .unwrap();
    assert_eq!(response.params_raw(), Some(&b"1,\"name\""[..]));

    let values = response
        .parse(&[ParamKind::Int, ParamKind::String])
        .unwrap();
    assert_eq!(values[0], ParamValue::Int(1));
    assert_eq!(values[1], ParamValue::String("name"));
}

#[test]
fn test_expect_line_takes_loose_response() {
    // No prefix expected: a bare non-status, non-URC, non-echo line is the
    // response.
    let mock = MockTransport::new();
    mock.push_read(b"AT+VER?\r\n1.2.3\r\nOK\r\n");

    let client = client_with(&mock);
    let response = client
        .command("AT+VER?")
        .expect_line()
        .execute()
        .unwrap();
    assert_eq!(response.params_raw(), Some(&b"1.2.3"[..]));
}

#[test]
fn test_plain_error() {
    let mock = MockTransport::new();
    mock.push_read(b"ERROR\r\n");

    let client = client_with(&mock);
    let err = client.command("AT+BAD").execute().unwrap_err();
    assert!(matches!(err, AtError::ServerError));
}

#[test]
fn test_extended_error() {
    let mock = MockTransport::new();
    mock.push_read(b"ERROR:123\r\n");

    let client = client_with(&mock);
    let err = client.command("AT+BAD").execute().unwrap_err();
    match err {
        AtError::ExtendedError(code) => {
            assert_eq!(code, 123);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), EXTENDED_ERROR_OFFSET - 123);
}

#[test]
fn test_malformed_error_tail_is_not_a_status() {
    // "ERROR:12x" is not a valid extended status; the command then times
    // out instead of misreporting an error code.
    let mock = MockTransport::new();
    mock.push_read(b"ERROR:12x\r\n");

    let client = client_with(&mock);
    let err = client
        .command("AT+BAD")
        .timeout(Duration::from_millis(40))
        .execute()
        .unwrap_err();
    assert!(matches!(err, AtError::Timeout));
}

#[test]
fn test_command_timeout_elapses() {
    let mock = MockTransport::new();

    let client = client_with(&mock);
    let start = Instant::now();
    let err = client
        .command("AT+SLOW")
        .timeout(Duration::from_millis(50))
        .execute()
        .unwrap_err();
    assert!(matches!(err, AtError::Timeout));
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_transport_failure_recorded() {
    let mock = MockTransport::new();
    mock.fail_next_read(-77);

    let client = client_with(&mock);
    let err = client.command("AT").execute().unwrap_err();
    assert!(matches!(
        err,
        AtError::Transport(TransportError::Code(-77))
    ));
    assert_eq!(client.last_io_error(), Some(-77));
}

#[test]
fn test_urc_during_command_dispatched_after_completion() {
    let mock = MockTransport::new();
    mock.push_read(b"+EVT:1\r\nOK\r\n");

    let client = client_with(&mock);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |line, payload| {
        sink.lock().unwrap().push((line.to_string(), payload.to_vec()));
    });

    client.command("AT+GO").execute().unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], ("+EVT:1".to_string(), Vec::new()));
}

#[test]
fn test_poll_urcs_queued_mode() {
    let mock = MockTransport::new();
    mock.push_read(b"+RING\r\n*STATE:2\r\n");

    let client = client_with(&mock);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |line, _| sink.lock().unwrap().push(line.to_string()));

    client.poll_urcs(Duration::from_millis(5)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["+RING", "*STATE:2"]);
}

#[test]
fn test_poll_urcs_direct_mode() {
    let mock = MockTransport::new();
    mock.push_read(b"+EVT:9\r\n");

    let config = AtClientConfig {
        urc_arena_size: None,
        read_timeout_ms: 5,
        ..AtClientConfig::default()
    };
    let client = AtClient::new(mock.clone(), config);
    assert!(!client.urc_queueing());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |line, _| sink.lock().unwrap().push(line.to_string()));

    client.poll_urcs(Duration::from_millis(5)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["+EVT:9"]);
}

#[test]
fn test_binary_response_payload() {
    // "+RD:3" terminated by the marker byte, 3-byte payload, then OK.
    let mock = MockTransport::new();
    mock.push_read(b"+RD:3\x01\x00\x03abcOK\r\n");

    let client = client_with(&mock);
    let mut buf = [0u8; 8];
    let response = client
        .command("AT+RD=")
        .args(&[Arg::Int(3)])
        .expect_prefix("+RD:")
        .binary_out(&mut buf)
        .execute()
        .unwrap();
    assert_eq!(response.params_raw(), Some(&b"3"[..]));
    assert_eq!(response.binary_len(), 3);
    assert_eq!(&buf[..3], b"abc");
}

#[test]
fn test_binary_response_overflow_is_discarded() {
    // 5 payload bytes but only room for 2: the rest is consumed off the
    // wire so the OK after the frame still parses.
    let mock = MockTransport::new();
    mock.push_read(b"+RD:5\x01\x00\x05abcdeOK\r\n");

    let client = client_with(&mock);
    let mut buf = [0u8; 2];
    let response = client
        .command("AT+RD=")
        .args(&[Arg::Int(5)])
        .expect_prefix("+RD:")
        .binary_out(&mut buf)
        .execute()
        .unwrap();
    assert_eq!(response.binary_len(), 2);
    assert_eq!(&buf, b"ab");
}

#[test]
fn test_urc_with_binary_payload() {
    let mock = MockTransport::new();
    mock.push_read(b"+DATA:2\x01\x00\x02xy");

    let client = client_with(&mock);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |line, payload| {
        sink.lock().unwrap().push((line.to_string(), payload.to_vec()));
    });

    client.poll_urcs(Duration::from_millis(5)).unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], ("+DATA:2".to_string(), b"xy".to_vec()));
}

#[test]
fn test_stalled_binary_frame_surfaces_timeout() {
    // Only 2 of the 4 promised payload bytes arrive, then silence: the
    // frame cannot complete before the command deadline.
    let mock = MockTransport::new();
    mock.push_read(b"+RD:4\x01\x00\x04ab");

    let client = client_with(&mock);
    let mut buf = [0u8; 8];
    let err = client
        .command("AT+RD=")
        .args(&[Arg::Int(4)])
        .expect_prefix("+RD:")
        .binary_out(&mut buf)
        .timeout(Duration::from_millis(50))
        .execute()
        .unwrap_err();
    assert!(matches!(
        err,
        AtError::Transport(TransportError::Timeout)
    ));
}

#[test]
fn test_urc_split_across_reads() {
    // Line, length prefix, and payload arrive in separate chunks.
    let mock = MockTransport::new();
    mock.push_read(b"+DATA:4\x01");
    mock.push_read(b"\x00\x04wx");
    mock.push_read(b"yz");

    let client = client_with(&mock);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |_, payload| sink.lock().unwrap().push(payload.to_vec()));

    client.poll_urcs(Duration::from_millis(5)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![b"wxyz".to_vec()]);
}

#[test]
fn test_queue_full_drops_urc_but_command_completes() {
    let mock = MockTransport::new();
    mock.push_read(b"+THIS_EVENT_IS_FAR_TOO_LONG_TO_FIT\r\nOK\r\n");

    let config = AtClientConfig {
        urc_arena_size: Some(8),
        read_timeout_ms: 5,
        ..AtClientConfig::default()
    };
    let client = AtClient::new(mock.clone(), config);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_urc(move |line, _| sink.lock().unwrap().push(line.to_string()));

    client.command("AT").execute().unwrap();
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_dropped_urc_payload_fully_consumed() {
    // The URC does not fit in the arena, so its 4 payload bytes go to the
    // discard sink; the OK after the frame must still parse.
    let mock = MockTransport::new();
    mock.push_read(b"+BULK_EVENT_NAME:4\x01\x00\x04wxyzOK\r\n");

    let config = AtClientConfig {
        urc_arena_size: Some(8),
        read_timeout_ms: 5,
        ..AtClientConfig::default()
    };
    let client = AtClient::new(mock.clone(), config);

    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    client.on_urc(move |_, _| *sink.lock().unwrap() += 1);

    client.command("AT").execute().unwrap();
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn test_handler_can_reregister_during_dispatch() {
    let mock = MockTransport::new();
    mock.push_read(b"+EVT:1\r\nOK\r\n");
    mock.push_read(b"+EVT:2\r\n");

    let client = Arc::new(client_with(&mock));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let reg_client = Arc::clone(&client);
    let outer_sink = Arc::clone(&seen);
    client.on_urc(move |line, _| {
        outer_sink.lock().unwrap().push(format!("first:{line}"));
        let inner_sink = Arc::clone(&outer_sink);
        reg_client.on_urc(move |line, _| {
            inner_sink.lock().unwrap().push(format!("second:{line}"));
        });
    });

    client.command("AT").execute().unwrap();
    client.poll_urcs(Duration::from_millis(5)).unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["first:+EVT:1", "second:+EVT:2"]
    );
}

#[test]
fn test_nested_command_from_urc_handler() {
    let mock = MockTransport::new();
    mock.push_read(b"+EVT:GO\r\nOK\r\n");
    mock.push_read(b"OK\r\n");

    let client = Arc::new(client_with(&mock));
    let nested_ok = Arc::new(Mutex::new(false));

    let handler_client = Arc::clone(&client);
    let flag = Arc::clone(&nested_ok);
    client.on_urc(move |line, _| {
        if line == "+EVT:GO" {
            handler_client.command("AT+PING").execute().unwrap();
            *flag.lock().unwrap() = true;
        }
    });

    client.command("AT+GO").execute().unwrap();
    assert!(*nested_ok.lock().unwrap());
    assert_eq!(mock.written(), b"AT+GO\rAT+PING\r");
}

#[test]
fn test_direct_mode_handler_cannot_issue_commands() {
    let mock = MockTransport::new();
    mock.push_read(b"+EVT:GO\r\n");

    let config = AtClientConfig {
        urc_arena_size: None,
        read_timeout_ms: 5,
        ..AtClientConfig::default()
    };
    let client = Arc::new(AtClient::new(mock.clone(), config));

    let handler_client = Arc::clone(&client);
    let rejected = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&rejected);
    client.on_urc(move |_, _| {
        let err = handler_client.command("AT+NESTED").execute().unwrap_err();
        *flag.lock().unwrap() = matches!(err, AtError::BusyReentry);
    });

    client.poll_urcs(Duration::from_millis(5)).unwrap();
    assert!(*rejected.lock().unwrap());
}

#[test]
fn test_crlf_noise_and_blank_lines_ignored() {
    let mock = MockTransport::new();
    mock.push_read(b"\r\n\r\n\nOK\r\n");

    let client = client_with(&mock);
    client.command("AT").execute().unwrap();
}

#[test]
fn test_binary_command_has_no_terminator() {
    let mock = MockTransport::new();
    mock.push_read(b"OK\r\n");

    let client = client_with(&mock);
    client
        .command("AT+WR=")
        .args(&[Arg::Int(3), Arg::Binary(b"abc")])
        .execute()
        .unwrap();
    // Marker, big-endian length, raw payload; no trailing CR.
    assert_eq!(mock.written(), b"AT+WR=3\x01\x00\x03abc");
}

#[test]
fn test_permanent_timeout_setting() {
    let mock = MockTransport::new();
    let client = client_with(&mock);

    client.set_command_timeout(Duration::from_millis(30));
    assert_eq!(client.command_timeout(), Duration::from_millis(30));

    let start = Instant::now();
    let err = client.command("AT").execute().unwrap_err();
    assert!(matches!(err, AtError::Timeout));
    assert!(start.elapsed() >= Duration::from_millis(30));
}
