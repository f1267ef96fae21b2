// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types
//!
//! Error types for connection and transport operations.

use thiserror::Error;

/// Network and transport error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Transport not connected")]
    NotConnected,

    #[error("Connection closed by caller")]
    Closed,

    #[error("Max retries exceeded")]
    MaxRetriesExceeded,
}
