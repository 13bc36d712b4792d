#![allow(dead_code)] // Init/Config variants reserved for typed peripheral-init and config-load returns

//! Unified error types for the LevelGuard firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! bootstrap path's error handling uniform.  All variants are `Copy` so they
//! can be cheaply passed around without allocation.
//!
//! The connectivity state machines themselves do not propagate these upward;
//! their recovery policy is local (bounded retry, then either defer or
//! escalate to a restart signal).  Typed errors cross the port boundary only
//! where an adapter can genuinely fail a single operation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The WiFi link could not be brought up or validated.
    Link(LinkError),
    /// An MQTT session operation failed.
    Session(SessionError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Session(e) => write!(f, "session: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// SSID is empty, too long, or not printable ASCII.
    InvalidSsid,
    /// Password is present but outside the WPA2 8–64 byte range.
    InvalidPassword,
    /// The station did not associate within the allowed window.
    ConnectTimeout,
    /// The underlying WiFi driver rejected an operation.
    DriverFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectTimeout => write!(f, "WiFi connect timed out"),
            Self::DriverFailed => write!(f, "WiFi driver operation failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The broker refused the connection or it timed out.
    ConnectFailed,
    /// The subscribe request was not accepted.
    SubscribeFailed,
    /// The publish could not be enqueued or sent.
    PublishFailed,
    /// An operation requires a live session and there is none.
    NotConnected,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "broker connect failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::NotConnected => write!(f, "no live session"),
        }
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
