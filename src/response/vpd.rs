// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Vital Product Data pages 0x80 (Unit Serial Number) and 0x83
//! (Device Identification).
//!
//! Page layout (SPC):
//!
//! ```text
//!   [0]    = peripheral qualifier / device type
//!   [1]    = page code
//!   [2..3] = page length (big-endian u16, bytes after the header)
//!   [4..]  = page payload
//! ```
//!
//! Page 0x83 carries a list of designation descriptors, each with a
//! 4-byte header and a self-declared identifier length. Descriptor
//! lengths come from the device and are re-checked against the page
//! boundary before every read; a single bad length fails the whole
//! decode rather than yielding a partial list.

use serde::Serialize;
use tracing::debug;

use crate::{
    cursor::ByteCursor,
    error::{DecodeError, Result},
    response::{inquiry::VpdPage, trim_ascii},
};

/// Bytes ahead of the first descriptor (or the serial string).
pub const PAGE_HEADER_LEN: usize = 4;
/// Bytes ahead of each descriptor's identifier.
pub const DESCRIPTOR_HEADER_LEN: usize = 4;

/// What a designation descriptor refers to (byte 1 bits 5..4).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Association {
    AddressedLogicalUnit,
    TargetPort,
    TargetDevice,
    Reserved,
}

impl Association {
    /// Total over the 2-bit field; the reserved pattern included.
    #[inline]
    pub fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            0 => Self::AddressedLogicalUnit,
            1 => Self::TargetPort,
            2 => Self::TargetDevice,
            _ => Self::Reserved,
        }
    }
}

/// How a descriptor's identifier bytes are encoded (byte 0 low nibble).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CodeSet {
    Binary,
    Ascii,
    Utf8,
    /// Patterns 0 and 4..15 carry no defined encoding.
    Reserved(u8),
}

impl CodeSet {
    /// Total over the 4-bit field.
    #[inline]
    pub fn from_bits(v: u8) -> Self {
        match v & 0x0f {
            1 => Self::Binary,
            2 => Self::Ascii,
            3 => Self::Utf8,
            other => Self::Reserved(other),
        }
    }
}

/// The identifier format of a designation descriptor (byte 1 low
/// nibble).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum DesignatorType {
    VendorSpecific,
    T10VendorId,
    Eui64,
    Naa,
    RelativeTargetPort,
    TargetPortGroup,
    LogicalUnitGroup,
    Md5LogicalUnitId,
    ScsiNameString,
    ProtocolSpecificPort,
    Reserved(u8),
}

impl DesignatorType {
    /// Total over the 4-bit field; patterns 10..15 are reserved.
    #[inline]
    pub fn from_bits(v: u8) -> Self {
        match v & 0x0f {
            0 => Self::VendorSpecific,
            1 => Self::T10VendorId,
            2 => Self::Eui64,
            3 => Self::Naa,
            4 => Self::RelativeTargetPort,
            5 => Self::TargetPortGroup,
            6 => Self::LogicalUnitGroup,
            7 => Self::Md5LogicalUnitId,
            8 => Self::ScsiNameString,
            9 => Self::ProtocolSpecificPort,
            other => Self::Reserved(other),
        }
    }
}

/// Transport protocol named by a descriptor (byte 0 high nibble,
/// meaningful only with the PIV bit).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ProtocolIdentifier {
    Fcp,
    Spi,
    Ssa,
    Sbp,
    Srp,
    Iscsi,
    Sas,
    Adt,
    Ata,
    Uas,
    Sop,
    Reserved(u8),
    Unspecified,
}

impl ProtocolIdentifier {
    /// Total over the 4-bit field; 0xb..0xe reserved, 0xf unspecified.
    pub fn from_bits(v: u8) -> Self {
        match v & 0x0f {
            0x0 => Self::Fcp,
            0x1 => Self::Spi,
            0x2 => Self::Ssa,
            0x3 => Self::Sbp,
            0x4 => Self::Srp,
            0x5 => Self::Iscsi,
            0x6 => Self::Sas,
            0x7 => Self::Adt,
            0x8 => Self::Ata,
            0x9 => Self::Uas,
            0xa => Self::Sop,
            0xf => Self::Unspecified,
            other => Self::Reserved(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcp => "FCP (Fibre Channel)",
            Self::Spi => "SPI (parallel SCSI)",
            Self::Ssa => "SSA",
            Self::Sbp => "SBP (IEEE 1394)",
            Self::Srp => "SRP (RDMA)",
            Self::Iscsi => "iSCSI",
            Self::Sas => "SAS",
            Self::Adt => "ADT",
            Self::Ata => "ATA/ACS",
            Self::Uas => "UAS (USB)",
            Self::Sop => "SOP (PCIe)",
            Self::Reserved(_) => "reserved",
            Self::Unspecified => "unspecified",
        }
    }
}

/// One device-identification designator from a VPD 0x83 page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpdDescriptor {
    pub association: Association,
    pub designator_type: DesignatorType,
    pub code_set: CodeSet,
    /// Present only when the descriptor's PIV bit is set and the
    /// association is the target port or the target device.
    pub transport_protocol: Option<ProtocolIdentifier>,
    /// Raw identifier bytes; interpretation depends on `code_set`.
    pub identifier: Vec<u8>,
}

impl VpdDescriptor {
    /// Render the identifier following its code set: ASCII and UTF-8
    /// designators decode to text, everything else to uppercase hex.
    pub fn identifier_string(&self) -> String {
        match self.code_set {
            CodeSet::Ascii => trim_ascii(&self.identifier),
            CodeSet::Utf8 => String::from_utf8_lossy(&self.identifier).trim().to_string(),
            _ => hex::encode_upper(&self.identifier),
        }
    }
}

/// Decode VPD page 0x80 — Unit Serial Number.
///
/// The serial string sits at `[4 .. 4 + length]` where `length` is
/// the low byte of the page-length field; serial numbers never exceed
/// one byte of length in practice.
pub fn decode_vpd_unit_serial(buf: &[u8]) -> Result<String> {
    let mut c = ByteCursor::new(buf);
    c.skip(1)?; // peripheral qualifier / device type
    let page = c.read_u8()?;
    if page != u8::from(VpdPage::UnitSerial) {
        return Err(DecodeError::UnsupportedPage { page });
    }
    c.skip(1)?; // page length high byte
    let len = c.read_u8()? as usize;
    let serial = c
        .slice(len)
        .map_err(|_| DecodeError::InvalidPageLength {
            declared: PAGE_HEADER_LEN + len,
            available: buf.len(),
        })?;
    Ok(trim_ascii(serial))
}

/// Restartable walk over the designation descriptors of a 0x83 page.
///
/// Construction validates the page header against the declared buffer
/// length; each step re-checks the descriptor's own length against
/// the page boundary before trusting it. After the first error the
/// iterator is fused.
#[derive(Debug, Clone)]
pub struct DescriptorIter<'a> {
    page: &'a [u8],
    /// One past the last byte the page header covers.
    limit: usize,
    /// Position of the next descriptor header.
    offset: usize,
    done: bool,
}

impl<'a> DescriptorIter<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Self::resume(buf, PAGE_HEADER_LEN)
    }

    /// Restart a walk at an `offset` previously reported by
    /// [`DescriptorIter::offset`].
    pub fn resume(buf: &'a [u8], offset: usize) -> Result<Self> {
        let mut c = ByteCursor::new(buf);
        c.skip(1)?; // peripheral qualifier / device type
        let page = c.read_u8()?;
        if page != u8::from(VpdPage::DeviceId) {
            return Err(DecodeError::UnsupportedPage { page });
        }
        let limit = c.read_u16_be()? as usize + PAGE_HEADER_LEN;
        if limit > buf.len() {
            return Err(DecodeError::InvalidPageLength {
                declared: limit,
                available: buf.len(),
            });
        }
        Ok(Self { page: buf, limit, offset, done: false })
    }

    /// Position of the next descriptor header; feeds
    /// [`DescriptorIter::resume`].
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn step(&mut self) -> Result<Option<VpdDescriptor>> {
        if self.offset >= self.limit {
            return Ok(None);
        }
        if self.offset + DESCRIPTOR_HEADER_LEN > self.limit {
            return Err(DecodeError::TruncatedDescriptor {
                offset: self.offset,
                needed: DESCRIPTOR_HEADER_LEN,
                limit: self.limit,
            });
        }

        let mut c = ByteCursor::new(&self.page[..self.limit]);
        c.skip(self.offset)?;
        let b0 = c.read_u8()?;
        let b1 = c.read_u8()?;
        c.skip(1)?; // reserved
        let i_len = c.read_u8()? as usize;

        let record_len = DESCRIPTOR_HEADER_LEN + i_len;
        if self.offset + record_len > self.limit {
            return Err(DecodeError::TruncatedDescriptor {
                offset: self.offset,
                needed: record_len,
                limit: self.limit,
            });
        }
        let identifier = c.slice(i_len)?.to_vec();

        let association = Association::from_bits(b1 >> 4);
        let piv = b1 & 0x80 != 0;
        let transport_protocol = if piv
            && matches!(
                association,
                Association::TargetPort | Association::TargetDevice
            ) {
            Some(ProtocolIdentifier::from_bits(b0 >> 4))
        } else {
            None
        };

        self.offset += record_len;
        Ok(Some(VpdDescriptor {
            association,
            designator_type: DesignatorType::from_bits(b1),
            code_set: CodeSet::from_bits(b0),
            transport_protocol,
            identifier,
        }))
    }
}

impl Iterator for DescriptorIter<'_> {
    type Item = Result<VpdDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(d)) => Some(Ok(d)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

/// Decode every descriptor of a VPD 0x83 page.
///
/// Fails on the first structural violation; descriptors collected
/// before the violation are discarded with it.
pub fn decode_vpd_device_id(buf: &[u8]) -> Result<Vec<VpdDescriptor>> {
    let descriptors = DescriptorIter::new(buf)?.collect::<Result<Vec<_>>>()?;
    debug!(count = descriptors.len(), "decoded VPD device identification page");
    Ok(descriptors)
}
