use anyhow::Result;
use scsi_decode_rs::{
    error::DecodeError,
    response::vpd::{
        Association, CodeSet, DescriptorIter, DesignatorType, ProtocolIdentifier,
        decode_vpd_device_id, decode_vpd_unit_serial,
    },
};

#[test]
fn unit_serial_is_trimmed() {
    let mut page = vec![0x00, 0x80, 0x00, 0x0b];
    page.extend_from_slice(b"0123456789 ");
    let serial = decode_vpd_unit_serial(&page).expect("serial page");
    assert_eq!(serial, "0123456789");
}

#[test]
fn unit_serial_rejects_overlong_length() {
    // header claims 16 serial bytes, buffer holds 4
    let page = [0x00, 0x80, 0x00, 0x10, b'A', b'B', b'C', b'D'];
    assert_eq!(
        decode_vpd_unit_serial(&page).expect_err("length beyond buffer"),
        DecodeError::InvalidPageLength { declared: 20, available: 8 }
    );
}

#[test]
fn unit_serial_rejects_wrong_page_code() {
    let page = [0x00, 0x83, 0x00, 0x00];
    assert_eq!(
        decode_vpd_unit_serial(&page).expect_err("device-id page is not a serial page"),
        DecodeError::UnsupportedPage { page: 0x83 }
    );
}

/// Device-identification page with four descriptors:
/// NAA (logical unit), SCSI name (target port, PIV, iSCSI),
/// T10 vendor id (target device, PIV, FCP), EUI-64 (logical unit
/// with a PIV bit that must stay unsurfaced).
fn device_id_fixture() -> Vec<u8> {
    let mut page = vec![0x00, 0x83, 0x00, 0x3e];
    // NAA, binary, association = addressed logical unit
    page.extend_from_slice(&[0x01, 0x03, 0x00, 0x08]);
    page.extend_from_slice(&[0x60, 0x01, 0x40, 0x55, 0xaa, 0xbb, 0xcc, 0xdd]);
    // SCSI name string, ASCII, target port, PIV, protocol = iSCSI
    page.extend_from_slice(&[0x52, 0x98, 0x00, 0x16]);
    page.extend_from_slice(b"iqn.2016-04.test:disk0");
    // T10 vendor id, UTF-8, target device, PIV, protocol = FCP
    page.extend_from_slice(&[0x03, 0xa1, 0x00, 0x08]);
    page.extend_from_slice(b"T10VEND0");
    // EUI-64, binary, addressed logical unit, PIV set
    page.extend_from_slice(&[0x51, 0x82, 0x00, 0x08]);
    page.extend_from_slice(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    page
}

#[test]
fn device_id_descriptors_parse_in_order() {
    let descriptors = decode_vpd_device_id(&device_id_fixture()).expect("device-id page");
    assert_eq!(descriptors.len(), 4);

    let d = &descriptors[0];
    assert_eq!(d.association, Association::AddressedLogicalUnit);
    assert_eq!(d.designator_type, DesignatorType::Naa);
    assert_eq!(d.code_set, CodeSet::Binary);
    assert_eq!(d.transport_protocol, None);
    assert_eq!(d.identifier, [0x60, 0x01, 0x40, 0x55, 0xaa, 0xbb, 0xcc, 0xdd]);
    assert_eq!(d.identifier_string(), "60014055AABBCCDD");

    let d = &descriptors[1];
    assert_eq!(d.association, Association::TargetPort);
    assert_eq!(d.designator_type, DesignatorType::ScsiNameString);
    assert_eq!(d.code_set, CodeSet::Ascii);
    assert_eq!(d.transport_protocol, Some(ProtocolIdentifier::Iscsi));
    assert_eq!(d.identifier_string(), "iqn.2016-04.test:disk0");
    assert_eq!(
        d.transport_protocol.map(|p| p.name()),
        Some("iSCSI")
    );

    let d = &descriptors[2];
    assert_eq!(d.association, Association::TargetDevice);
    assert_eq!(d.designator_type, DesignatorType::T10VendorId);
    assert_eq!(d.code_set, CodeSet::Utf8);
    assert_eq!(d.transport_protocol, Some(ProtocolIdentifier::Fcp));

    // PIV alone is not enough; the association must be a target one
    let d = &descriptors[3];
    assert_eq!(d.association, Association::AddressedLogicalUnit);
    assert_eq!(d.designator_type, DesignatorType::Eui64);
    assert_eq!(d.transport_protocol, None);
}

#[test]
fn device_id_decode_is_idempotent() {
    let page = device_id_fixture();
    let first = decode_vpd_device_id(&page).expect("first pass");
    let second = decode_vpd_device_id(&page).expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn device_id_ignores_bytes_past_declared_length() {
    let mut page = device_id_fixture();
    // trailing transport garbage beyond the declared page length
    page.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
    let descriptors = decode_vpd_device_id(&page).expect("padded page");
    assert_eq!(descriptors.len(), 4);
}

#[test]
fn device_id_empty_descriptor_list() {
    let page = [0x00, 0x83, 0x00, 0x00];
    assert!(decode_vpd_device_id(&page).expect("empty page").is_empty());
}

#[test]
fn device_id_rejects_page_length_beyond_buffer() {
    let page = [0x00, 0x83, 0x00, 0x40, 0x01, 0x03, 0x00, 0x00];
    assert_eq!(
        decode_vpd_device_id(&page).expect_err("page length beyond buffer"),
        DecodeError::InvalidPageLength { declared: 0x44, available: 8 }
    );
}

#[test]
fn overrunning_descriptor_discards_the_whole_decode() {
    let mut page = device_id_fixture();
    // last descriptor claims one identifier byte more than the page holds
    let last_header_len_at = 4 + 12 + 26 + 12 + 3;
    page[last_header_len_at] = 0x09;

    assert_eq!(
        decode_vpd_device_id(&page).expect_err("no partial descriptor list"),
        DecodeError::TruncatedDescriptor { offset: 54, needed: 13, limit: 66 }
    );
}

#[test]
fn descriptor_iter_resumes_from_reported_offset() -> Result<()> {
    let page = device_id_fixture();

    let mut iter = DescriptorIter::new(&page)?;
    let first = iter.next().expect("first descriptor")?;
    assert_eq!(first.designator_type, DesignatorType::Naa);
    let offset = iter.offset();

    let rest = DescriptorIter::resume(&page, offset)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[0].designator_type, DesignatorType::ScsiNameString);

    let all = decode_vpd_device_id(&page)?;
    assert_eq!(&all[1..], rest.as_slice());

    Ok(())
}

#[test]
fn device_id_rejects_wrong_page_code() {
    let page = [0x00, 0x80, 0x00, 0x04, b'S', b'N', b'0', b'1'];
    assert_eq!(
        decode_vpd_device_id(&page).expect_err("serial page is not a device-id page"),
        DecodeError::UnsupportedPage { page: 0x80 }
    );
}
