// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REPORT LUNS response parsing.
//!
//! Response layout (SPC):
//!   [0..3] = LUN LIST LENGTH (big-endian u32, multiple of 8)
//!   [4..7] = reserved
//!   [8..]  = LUN entries (8 bytes each)

use serde::Serialize;
use tracing::debug;

use crate::{
    cursor::ByteCursor,
    error::{DecodeError, Result},
};

/// Fixed response header ahead of the LUN entries.
pub const LUN_LIST_HEADER_LEN: usize = 8;
/// Every LUN entry is 8 bytes.
pub const LUN_ENTRY_LEN: usize = 8;

/// A single-level logical unit number.
///
/// Only the second byte of the 8-byte entry is interpreted;
/// hierarchical addressing levels at bytes 2..8 are not decoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LunEntry {
    pub lun: u8,
}

/// Decode a REPORT LUNS response into LUNs in buffer order.
pub fn decode_report_luns(buf: &[u8]) -> Result<Vec<LunEntry>> {
    let mut c = ByteCursor::new(buf);
    let lun_list_length = c.read_u32_be()?;
    c.skip(4)?; // reserved

    if lun_list_length % LUN_ENTRY_LEN as u32 != 0 {
        return Err(DecodeError::InvalidLunListLength {
            length: lun_list_length,
            available: buf.len(),
        });
    }
    let count = (lun_list_length / LUN_ENTRY_LEN as u32) as usize;
    if c.remaining() / LUN_ENTRY_LEN < count {
        return Err(DecodeError::InvalidLunListLength {
            length: lun_list_length,
            available: buf.len(),
        });
    }

    let mut luns = Vec::with_capacity(count);
    for _ in 0..count {
        let entry = c.slice(LUN_ENTRY_LEN)?;
        luns.push(LunEntry { lun: entry[1] });
    }
    debug!(count = luns.len(), "decoded REPORT LUNS");
    Ok(luns)
}
