// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tracing setup for the hook binary.
//!
//! Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT`:
//!
//! - `text` (default): compact human-readable lines on stdout
//! - `json`: one JSON object per event
//! - `syslog`: RFC 3164 datagrams on `/dev/log`, tagged `kea-ddns-nsd`
//!
//! Kea discards the hook's stdout, so production installs usually run with
//! `RUST_LOG_FORMAT=syslog`.

use crate::constants::{SYSLOG_FACILITY_USER, SYSLOG_TAG};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use crate::constants::SYSLOG_SOCKET_PATH;
#[cfg(unix)]
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use tracing::Metadata;
#[cfg(unix)]
use tracing_subscriber::fmt::MakeWriter;

/// Output formats selectable through `RUST_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text on stdout
    Text,
    /// JSON lines on stdout
    Json,
    /// Datagrams on the local syslog socket
    Syslog,
}

impl LogFormat {
    /// Parse a `RUST_LOG_FORMAT` value; anything unrecognized means text.
    #[must_use]
    pub fn from_env_value(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            "syslog" => Self::Syslog,
            _ => Self::Text,
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match LogFormat::from_env_value(&log_format) {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        #[cfg(unix)]
        LogFormat::Syslog => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(SyslogMakeWriter::connect())
                .with_ansi(false)
                .without_time()
                .with_target(false)
                .compact()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

/// Syslog severity for a tracing level.
#[must_use]
pub fn syslog_severity(level: Level) -> u8 {
    if level == Level::ERROR {
        3
    } else if level == Level::WARN {
        4
    } else if level == Level::INFO {
        6
    } else {
        7
    }
}

/// Frame `message` as an RFC 3164 datagram for the user facility.
#[must_use]
pub fn syslog_frame(level: Level, message: &str) -> String {
    let priority = SYSLOG_FACILITY_USER * 8 + syslog_severity(level);
    format!("<{priority}>{SYSLOG_TAG}: {}", message.trim_end())
}

/// Makes one [`SyslogWriter`] per event.
///
/// Without a reachable `/dev/log` every event goes to stderr instead.
#[cfg(unix)]
#[derive(Debug)]
pub struct SyslogMakeWriter {
    socket: Option<UnixDatagram>,
}

#[cfg(unix)]
impl SyslogMakeWriter {
    /// Connect to the local syslog socket.
    #[must_use]
    pub fn connect() -> Self {
        match UnixDatagram::unbound()
            .and_then(|socket| socket.connect(SYSLOG_SOCKET_PATH).map(|()| socket))
        {
            Ok(socket) => Self::from_socket(socket),
            Err(e) => {
                eprintln!("Syslog unavailable, logging to stderr: {e}");
                Self { socket: None }
            }
        }
    }

    /// Send events over an already connected datagram socket.
    #[must_use]
    pub fn from_socket(socket: UnixDatagram) -> Self {
        Self {
            socket: Some(socket),
        }
    }
}

#[cfg(unix)]
impl<'a> MakeWriter<'a> for SyslogMakeWriter {
    type Writer = SyslogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogWriter::new(self.socket.as_ref(), Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogWriter::new(self.socket.as_ref(), *meta.level())
    }
}

/// Buffers one formatted event and sends it as a single datagram on drop.
#[cfg(unix)]
#[derive(Debug)]
pub struct SyslogWriter<'a> {
    socket: Option<&'a UnixDatagram>,
    level: Level,
    buffer: Vec<u8>,
}

#[cfg(unix)]
impl<'a> SyslogWriter<'a> {
    fn new(socket: Option<&'a UnixDatagram>, level: Level) -> Self {
        Self {
            socket,
            level,
            buffer: Vec::new(),
        }
    }
}

#[cfg(unix)]
impl Write for SyslogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
impl Drop for SyslogWriter<'_> {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let message = String::from_utf8_lossy(&self.buffer);
        let frame = syslog_frame(self.level, &message);

        let sent = self
            .socket
            .is_some_and(|socket| socket.send(frame.as_bytes()).is_ok());
        if !sent {
            eprintln!("{frame}");
        }
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
