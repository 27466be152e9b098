//! Poll a serial-attached module for URCs.
//!
//! Usage: poll <device> [baud]
//!
//! Sends a plain `AT` probe, then loops printing every unsolicited line the
//! module emits.

use std::time::Duration;

use atlink_client::{AtClient, AtClientConfig, SerialTransport};

fn main() {
    let mut args = std::env::args().skip(1);
    let device = match args.next() {
        Some(device) => device,
        None => {
            eprintln!("usage: poll <device> [baud]");
            std::process::exit(2);
        }
    };
    let baud = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(115_200);

    let transport = match SerialTransport::open(&device, baud) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("failed to open {device}: {err}");
            std::process::exit(1);
        }
    };

    let client = AtClient::new(transport, AtClientConfig::default());
    client.on_urc(|line, payload| {
        if payload.is_empty() {
            println!("{line}");
        } else {
            println!("{line} ({} payload bytes)", payload.len());
        }
    });

    match client.command("AT").execute() {
        Ok(_) => println!("module is up"),
        Err(err) => {
            eprintln!("probe failed: {err}");
            std::process::exit(1);
        }
    }

    loop {
        if let Err(err) = client.poll_urcs(Duration::from_millis(100)) {
            eprintln!("poll failed: {err}");
            std::process::exit(1);
        }
    }
}
