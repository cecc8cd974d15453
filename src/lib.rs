//! This crate decodes SCSI primary and block command responses into
//! structured records: device identity (INQUIRY and its VPD pages),
//! capacity and geometry (READ CAPACITY(16)), mode-page configuration
//! (MODE SENSE(10)) and logical-unit enumeration (REPORT LUNS).
//!
//! Every decoder is a pure function over an already-filled byte
//! buffer; issuing commands and moving bytes to and from a device is
//! the transport collaborator's job (see [`transport`]).
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Bounds-checked big-endian reads over a response buffer.
pub mod cursor;
/// Decode-level error taxonomy.
pub mod error;
/// Parsers for the individual response layouts.
pub mod response;
/// The transport collaborator seam and its error surface.
pub mod transport;
