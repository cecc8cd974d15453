// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Decode-level error taxonomy.
//!
//! These errors describe a *malformed response buffer* and nothing
//! else. A device that never answered, or answered with CHECK
//! CONDITION, surfaces as a [`TransportError`] from the collaborator
//! that filled the buffer; the two must stay distinguishable.
//!
//! [`TransportError`]: crate::transport::TransportError

use thiserror::Error;

/// Why a response buffer could not be decoded.
///
/// Every decoder either returns a fully populated result or exactly
/// one of these; no partial output survives a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes available than a fixed-layout field requires.
    #[error("response truncated: need {expected} bytes, have {actual}")]
    TruncatedBuffer { expected: usize, actual: usize },

    /// A VPD page header declares more data than the buffer holds.
    #[error("VPD page length {declared} exceeds the {available} valid bytes")]
    InvalidPageLength { declared: usize, available: usize },

    /// The mode parameter header lengths contradict each other.
    #[error(
        "inconsistent mode parameter header: mode data length {mode_data_len}, block \
         descriptor length {block_desc_len}"
    )]
    InvalidModeHeader { mode_data_len: u16, block_desc_len: u16 },

    /// LUN LIST LENGTH is not a whole number of entries, or promises
    /// more entries than the buffer holds.
    #[error("LUN list length {length} is inconsistent with the {available}-byte response")]
    InvalidLunListLength { length: u32, available: usize },

    /// A designation descriptor's declared length crosses the page
    /// boundary.
    #[error(
        "designation descriptor at offset {offset} needs {needed} bytes but the page \
         ends at {limit}"
    )]
    TruncatedDescriptor { offset: usize, needed: usize, limit: usize },

    /// A mode page's declared length crosses the mode data boundary.
    #[error("mode page record needs {needed} bytes but only {remaining} remain")]
    TruncatedModePage { needed: usize, remaining: usize },

    /// A VPD/INQUIRY page number outside the supported set.
    #[error("unsupported VPD page 0x{page:02x}")]
    UnsupportedPage { page: u8 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
