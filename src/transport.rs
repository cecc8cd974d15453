// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The transport collaborator seam.
//!
//! Decoders in this crate never touch a device: something else opens
//! it, ships the command and hands back a filled response buffer.
//! That collaborator sits behind [`Transport`], so callers can plug
//! in an sg ioctl, a USB pass-through or a fake for tests. Each call
//! produces its own [`ResponseBuffer`]; nothing is shared or reused
//! across calls, and concurrent decodes never coordinate.
//!
//! Transport failures are a separate error type from
//! [`DecodeError`](crate::error::DecodeError): "the device did not
//! answer" and "the device answered garbage" must stay
//! distinguishable for callers.

use thiserror::Error;

use crate::response::sense::SenseData;

/// A response as returned by a transport: the allocation plus the
/// number of bytes the device actually filled.
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    valid_len: usize,
}

impl ResponseBuffer {
    /// Wrap a filled allocation. `valid_len` is clamped to the
    /// allocation size.
    pub fn new(data: Vec<u8>, valid_len: usize) -> Self {
        let valid_len = valid_len.min(data.len());
        Self { data, valid_len }
    }

    /// The declared-valid prefix that decoders operate on.
    #[inline]
    pub fn valid(&self) -> &[u8] {
        &self.data[..self.valid_len]
    }

    pub fn len(&self) -> usize {
        self.valid_len
    }

    pub fn is_empty(&self) -> bool {
        self.valid_len == 0
    }
}

/// Failures raised by the transport while opening, driving or closing
/// a device.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open device (errno {errno})")]
    Open { errno: i32 },

    #[error("command failed with SCSI status 0x{status:02x}")]
    Command {
        status: u8,
        sense: Option<SenseData>,
    },

    #[error("failed to close device (errno {errno})")]
    Close { errno: i32 },
}

/// Contract for executing one command against one device.
///
/// Implementations own every I/O concern (retries, timeouts,
/// cancellation); decoders only ever see the finished buffer.
pub trait Transport {
    type Handle;

    fn open(&self, device_name: &str) -> Result<Self::Handle, TransportError>;

    /// Execute the command described by `cdb` and return the filled
    /// response buffer, at most `max_response_len` bytes of it valid.
    fn execute(
        &self,
        handle: &mut Self::Handle,
        cdb: &[u8],
        max_response_len: usize,
    ) -> Result<ResponseBuffer, TransportError>;

    fn close(&self, handle: Self::Handle) -> Result<(), TransportError>;
}
