// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ CAPACITY(16) parameter data.

use serde::Serialize;
use tracing::debug;
use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U16, U32, U64},
};

use crate::error::{DecodeError, Result};

/// Raw first 16 bytes of READ CAPACITY(16) parameter data.
///
/// Targets may return up to 32 bytes; everything past byte 15 is
/// reserved and ignored here. All fields are big-endian per SBC.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct Rc16Raw {
    /// Last logical block address (bytes 0-7).
    pub max_lba: U64<BigEndian>,
    /// Block length in bytes (bytes 8-11).
    pub block_len: U32<BigEndian>,
    /// P_TYPE (bits 3..1) and PROT_EN (bit 0), byte 12.
    pub prot: u8,
    /// P_I_EXPONENT (high nibble) and LBPPBE (low nibble), byte 13.
    pub exponents: u8,
    /// LBPME (bit 15), LBPRZ (bit 14), LOWEST ALIGNED LBA (bits 13..0).
    pub tail: U16<BigEndian>,
}

/// Capacity, geometry and protection state of one logical unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalBlockInfo {
    pub last_lba: u64,
    pub block_length: u32,
    /// Protection type field (0-7); 0 means unprotected formatting.
    pub protection_type: u8,
    pub protection_enabled: bool,
    /// Protection information intervals per block, as a power of two.
    pub protection_interval_exponent: u8,
    /// Logical blocks per physical block, as a power of two.
    pub logical_blocks_per_physical_exponent: u8,
    /// LBPME: logical block provisioning management enabled.
    pub provisioning_enabled: bool,
    /// LBPRZ: unmapped blocks read back as zeroes.
    pub provisioning_read_zero: bool,
    /// 14-bit offset of the first physically aligned LBA.
    pub lowest_aligned_lba: u16,
}

impl LogicalBlockInfo {
    /// Total addressable capacity in bytes.
    #[inline]
    pub fn total_bytes(&self) -> u128 {
        (self.last_lba as u128 + 1) * self.block_length as u128
    }
}

/// Decode READ CAPACITY(16) parameter data (needs ≥ 16 bytes).
pub fn decode_read_capacity16(buf: &[u8]) -> Result<LogicalBlockInfo> {
    let (raw, _rest) =
        Rc16Raw::ref_from_prefix(buf).map_err(|_| DecodeError::TruncatedBuffer {
            expected: size_of::<Rc16Raw>(),
            actual: buf.len(),
        })?;

    let tail = raw.tail.get();
    let info = LogicalBlockInfo {
        last_lba: raw.max_lba.get(),
        block_length: raw.block_len.get(),
        protection_type: (raw.prot >> 1) & 0x07,
        protection_enabled: raw.prot & 0x01 != 0,
        protection_interval_exponent: raw.exponents >> 4,
        logical_blocks_per_physical_exponent: raw.exponents & 0x0f,
        provisioning_enabled: tail & 0x8000 != 0,
        provisioning_read_zero: tail & 0x4000 != 0,
        lowest_aligned_lba: tail & 0x3fff,
    };
    debug!(
        last_lba = info.last_lba,
        block_length = info.block_length,
        "decoded READ CAPACITY(16)"
    );
    Ok(info)
}
