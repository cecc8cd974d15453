// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! INQUIRY response parsers:
//! - Standard INQUIRY (EVPD=0)
//! - dispatch over the supported VPD pages (0x80, 0x83)
//!
//! Standard layout (SPC), all offsets from the response start:
//!   [0] = peripheral qualifier (7..5) / device type (4..0)
//!   [1] = RMB (bit 7)
//!   [2] = version
//!   [3] = NormACA (5), HiSup (4), response data format (3..0)
//!   [5] = SCCS (7), ACC (6), TPGS (5..4), 3PC (3), PROTECT (0)
//!   [6] = BQue (7), EncServ (6), MultiP (4), MChngr (3), Addr16 (0)
//!   [7] = WBus16 (5), Sync (4), Linked (3), CmdQue (1)
//!   [8..16] / [16..32] / [32..36] = vendor / product / revision ASCII

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
    cursor::ByteCursor,
    error::{DecodeError, Result},
    response::{
        trim_ascii,
        vpd::{VpdDescriptor, decode_vpd_device_id, decode_vpd_unit_serial},
    },
};

/// Standard INQUIRY responses are fixed at 36 bytes.
pub const STANDARD_INQUIRY_LEN: usize = 36;

/// VPD pages this crate decodes.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VpdPage {
    UnitSerial = 0x80,
    DeviceId = 0x83,
}

impl From<VpdPage> for u8 {
    #[inline]
    fn from(p: VpdPage) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for VpdPage {
    type Error = DecodeError;

    #[inline]
    fn try_from(v: u8) -> Result<Self> {
        Ok(match v {
            0x80 => Self::UnitSerial,
            0x83 => Self::DeviceId,
            page => return Err(DecodeError::UnsupportedPage { page }),
        })
    }
}

bitflags! {
    /// Single-bit feature flags of the standard INQUIRY layout.
    ///
    /// Encoded as `byte3 << 24 | byte5 << 16 | byte6 << 8 | byte7`, so
    /// every constant sits at the exact bit position the protocol
    /// assigns it. The multi-bit fields sharing those bytes (response
    /// data format, TPGS) are masked out and carried separately on
    /// [`DeviceIdentity`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InquiryFlags: u32 {
        const NORM_ACA = 0x20 << 24;
        const HI_SUP = 0x10 << 24;
        const SCCS = 0x80 << 16;
        const ACC = 0x40 << 16;
        const THIRD_PARTY_COPY = 0x08 << 16;
        const PROTECT = 0x01 << 16;
        const B_QUE = 0x80 << 8;
        const ENC_SERV = 0x40 << 8;
        const MULTI_P = 0x10 << 8;
        const M_CHNGR = 0x08 << 8;
        const ADDR16 = 0x01 << 8;
        const WBUS16 = 0x20;
        const SYNC = 0x10;
        const LINKED = 0x08;
        const CMD_QUE = 0x02;
    }
}

impl Serialize for InquiryFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

/// Identity and feature set reported by a standard INQUIRY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    /// Bits 7..5 of byte 0; 0 means a connected logical unit.
    pub peripheral_qualifier: u8,
    /// Bits 4..0 of byte 0; see [`DeviceIdentity::device_type_str`].
    pub peripheral_device_type: u8,
    /// RMB: the medium is removable.
    pub removable: bool,
    /// Claimed SPC version byte.
    pub version: u8,
    /// Byte 3 low nibble; 2 for every post-SCSI-2 device.
    pub response_data_format: u8,
    /// Target port group support, 2-bit field of byte 5.
    pub tpgs: u8,
    pub flags: InquiryFlags,
    pub vendor_id: String,
    pub product_id: String,
    pub product_rev: String,
}

impl DeviceIdentity {
    pub fn device_type_str(&self) -> &'static str {
        match self.peripheral_device_type {
            0x00 => "Direct-access block (disk)",
            0x01 => "Sequential-access (tape)",
            0x02 => "Printer (obsolete)",
            0x03 => "Processor",
            0x04 => "WORM",
            0x05 => "CD/DVD",
            0x06 => "Scanner (obsolete)",
            0x07 => "Optical memory",
            0x08 => "Medium changer",
            0x09 => "Communications",
            0x0c => "Storage array controller",
            0x0d => "Enclosure services",
            0x0e => "RBC",
            0x0f => "Optical card",
            0x11 => "Object-based storage",
            0x12 => "Automation/Drive Interface",
            _ => "Unknown/Reserved",
        }
    }
}

/// Decode a standard INQUIRY (EVPD=0) response (minimum 36 bytes).
pub fn decode_inquiry_standard(buf: &[u8]) -> Result<DeviceIdentity> {
    let mut c = ByteCursor::new(buf);
    if c.remaining() < STANDARD_INQUIRY_LEN {
        return Err(DecodeError::TruncatedBuffer {
            expected: STANDARD_INQUIRY_LEN,
            actual: buf.len(),
        });
    }

    let b0 = c.read_u8()?;
    let b1 = c.read_u8()?;
    let version = c.read_u8()?;
    let b3 = c.read_u8()?;
    c.skip(1)?; // additional length
    let b5 = c.read_u8()?;
    let b6 = c.read_u8()?;
    let b7 = c.read_u8()?;
    let vendor = c.slice(8)?;
    let product = c.slice(16)?;
    let revision = c.slice(4)?;

    // from_bits_truncate drops the multi-bit fields sharing the flag
    // bytes; those are carried as integers below.
    let flag_bits = (u32::from(b3) << 24)
        | (u32::from(b5) << 16)
        | (u32::from(b6) << 8)
        | u32::from(b7);
    let identity = DeviceIdentity {
        peripheral_qualifier: b0 >> 5,
        peripheral_device_type: b0 & 0x1f,
        removable: b1 & 0x80 != 0,
        version,
        response_data_format: b3 & 0x0f,
        tpgs: (b5 >> 4) & 0x03,
        flags: InquiryFlags::from_bits_truncate(flag_bits),
        vendor_id: trim_ascii(vendor),
        product_id: trim_ascii(product),
        product_rev: trim_ascii(revision),
    };
    debug!(
        vendor = %identity.vendor_id,
        product = %identity.product_id,
        device_type = identity.device_type_str(),
        "decoded standard INQUIRY"
    );
    Ok(identity)
}

/// One decoded INQUIRY response, by page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InquiryData {
    Standard(DeviceIdentity),
    UnitSerial(String),
    DeviceId(Vec<VpdDescriptor>),
}

/// Decode an INQUIRY response for the given VPD page (`None` for the
/// standard EVPD=0 layout). Pages outside {0x80, 0x83} fail with
/// [`DecodeError::UnsupportedPage`].
pub fn decode_inquiry(page: Option<u8>, buf: &[u8]) -> Result<InquiryData> {
    match page {
        None => Ok(InquiryData::Standard(decode_inquiry_standard(buf)?)),
        Some(code) => match VpdPage::try_from(code)? {
            VpdPage::UnitSerial => Ok(InquiryData::UnitSerial(decode_vpd_unit_serial(buf)?)),
            VpdPage::DeviceId => Ok(InquiryData::DeviceId(decode_vpd_device_id(buf)?)),
        },
    }
}
