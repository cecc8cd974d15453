// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! MODE SENSE(10) response parsing.
//!
//! Response layout (SPC):
//!   [0..1] = MODE DATA LENGTH (big-endian u16, bytes after itself)
//!   [2]    = medium type
//!   [3]    = device-specific parameter
//!   [4]    = LONGLBA (bit 0), [5] reserved
//!   [6..7] = BLOCK DESCRIPTOR LENGTH (big-endian u16)
//!   then the block descriptors (skipped), then the mode pages:
//!   each page is `{ PS/SPF | page code (5..0), page length }` plus
//!   `page length` payload bytes.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    cursor::ByteCursor,
    error::{DecodeError, Result},
};

/// Mode parameter header of a MODE SENSE(10) response.
pub const MODE_HEADER_LEN: usize = 8;

/// One mode page: its 6-bit page code and raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModePage {
    pub page_code: u8,
    pub payload: Vec<u8>,
}

/// Mode pages in buffer order.
///
/// Lookup by page code returns the **last** occurrence: compliant
/// targets do not repeat a code, but if one does, the later page
/// replaces the earlier in the page-code → payload mapping this
/// collection stands for. The full sequence stays available through
/// iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModePages(Vec<ModePage>);

impl ModePages {
    /// Payload of the given page code, if present (last wins).
    pub fn page(&self, page_code: u8) -> Option<&[u8]> {
        self.0
            .iter()
            .rev()
            .find(|p| p.page_code == page_code)
            .map(|p| p.payload.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModePage> {
        self.0.iter()
    }
}

impl IntoIterator for ModePages {
    type Item = ModePage;
    type IntoIter = std::vec::IntoIter<ModePage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModePages {
    type Item = &'a ModePage;
    type IntoIter = std::slice::Iter<'a, ModePage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Decode a MODE SENSE(10) response into its mode pages.
///
/// A response whose header accounts for zero page bytes decodes to an
/// empty collection, not an error.
pub fn decode_mode_sense10(buf: &[u8]) -> Result<ModePages> {
    let mut c = ByteCursor::new(buf);
    let mode_data_len = c.read_u16_be()?;
    c.skip(4)?; // medium type, device-specific, LONGLBA, reserved
    let block_desc_len = c.read_u16_be()?;

    // MODE DATA LENGTH counts everything after its own two bytes; the
    // six remaining header bytes and the block descriptors are not
    // page data.
    let mut remaining = (mode_data_len as usize)
        .checked_sub(MODE_HEADER_LEN - 2)
        .and_then(|v| v.checked_sub(block_desc_len as usize))
        .ok_or(DecodeError::InvalidModeHeader {
            mode_data_len,
            block_desc_len,
        })?;

    c.skip(block_desc_len as usize)?;

    let mut pages: Vec<ModePage> = Vec::new();
    while remaining > 0 {
        if remaining < 2 {
            return Err(DecodeError::TruncatedModePage { needed: 2, remaining });
        }
        let page_code = c.read_u8()? & 0x3f;
        let page_len = c.read_u8()? as usize;
        let record_len = page_len + 2;
        if record_len > remaining {
            return Err(DecodeError::TruncatedModePage {
                needed: record_len,
                remaining,
            });
        }
        let payload = c.slice(page_len)?.to_vec();
        if pages.iter().any(|p| p.page_code == page_code) {
            warn!(page_code, "duplicate mode page code, later payload wins");
        }
        pages.push(ModePage { page_code, payload });
        remaining -= record_len;
    }

    debug!(pages = pages.len(), "decoded MODE SENSE(10)");
    Ok(ModePages(pages))
}
