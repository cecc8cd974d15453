// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Fixed-format sense data (SPC-4 § 4.5.3).
//!
//! A failed command's transport error carries one of these when the
//! device returned sense bytes; decoding it is response
//! interpretation like everything else in this crate.

use std::fmt;

use serde::Serialize;

use crate::{
    cursor::ByteCursor,
    error::{DecodeError, Result},
};

/// Sense data must be ≥ 18 bytes for fixed format.
pub const FIXED_MIN_LEN: usize = 18;

#[derive(Default, Clone, PartialEq, Eq, Serialize)]
pub struct SenseData {
    pub valid: bool,        // bit7 of byte0
    pub response_code: u8,  // low-7 bits of byte0
    pub sense_key: u8,      // low-4 bits of byte2
    pub ili: bool,          // bit5 of byte2
    pub eom: bool,          // bit6 of byte2
    pub filemark: bool,     // bit7 of byte2
    pub information: u32,   // bytes 3-6
    pub additional_len: u8, // byte7
    pub cmd_specific: u32,  // bytes 8-11
    pub asc: u8,            // Additional Sense Code
    pub ascq: u8,           /* Additional Sense Code Qualifier
                             * -- the remaining bytes (fru, sks…) are
                             * rarely used; add when needed */
}

impl SenseData {
    /// Decode fixed-format sense data (needs ≥ 18 bytes).
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < FIXED_MIN_LEN {
            return Err(DecodeError::TruncatedBuffer {
                expected: FIXED_MIN_LEN,
                actual: buf.len(),
            });
        }

        let mut c = ByteCursor::new(buf);
        let b0 = c.read_u8()?;
        c.skip(1)?; // obsolete
        let b2 = c.read_u8()?;
        let information = c.read_u32_be()?;
        let additional_len = c.read_u8()?;
        let cmd_specific = c.read_u32_be()?;
        let asc = c.read_u8()?;
        let ascq = c.read_u8()?;

        Ok(Self {
            valid: b0 & 0x80 != 0,
            response_code: b0 & 0x7f,
            sense_key: b2 & 0x0f,
            ili: b2 & 0x20 != 0,
            eom: b2 & 0x40 != 0,
            filemark: b2 & 0x80 != 0,
            information,
            additional_len,
            cmd_specific,
            asc,
            ascq,
        })
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseData")
            .field("valid", &self.valid)
            .field(
                "response_code",
                &format_args!("{:#04x}", self.response_code),
            )
            .field("sense_key", &format_args!("{:#x}", self.sense_key))
            .field("filemark", &self.filemark)
            .field("eom", &self.eom)
            .field("ili", &self.ili)
            .field("information", &self.information)
            .field("additional_len", &self.additional_len)
            .field("cmd_specific", &self.cmd_specific)
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &asc_ascq_to_str(self.asc, self.ascq))
            .finish()
    }
}

/// Return the SPC-4 description for a given ASC/ASCQ pair.
///
/// * If the pair is not present in the official table, returns
///   `"UNSPECIFIED / vendor specific"`.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    hot_table(asc, ascq).unwrap_or("UNSPECIFIED / vendor specific")
}

fn hot_table(asc: u8, ascq: u8) -> Option<&'static str> {
    Some(match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x04, 0x01) => "Logical unit is in process of becoming ready",
        (0x04, 0x04) => "Not ready – format in progress",
        (0x11, 0x00) => "Medium error – unrecovered read error",
        (0x20, 0x00) => "Illegal request – invalid command operation code",
        (0x24, 0x00) => "Illegal request – invalid field in CDB",
        (0x25, 0x00) => "Illegal request – logical unit not supported",
        (0x28, 0x00) => "Unit attention – not ready to ready change",
        (0x29, 0x00) => "Unit attention – power on, reset, or bus device reset",
        (0x3a, 0x00) => "Medium not present",
        _ => return None,
    })
}
