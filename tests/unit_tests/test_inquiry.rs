use anyhow::Result;
use scsi_decode_rs::{
    error::DecodeError,
    response::inquiry::{
        InquiryData, InquiryFlags, decode_inquiry, decode_inquiry_standard,
    },
};

/// A plausible direct-access target: removable=0, SPC-4, HiSup,
/// RDF=2, SCCS/TPGS=1/3PC/PROTECT, EncServ/MultiP, CmdQue.
fn std_inquiry_fixture() -> [u8; 36] {
    let mut b = [0u8; 36];
    b[0] = 0x00; // connected, direct-access block
    b[1] = 0x80; // RMB
    b[2] = 0x06;
    b[3] = 0x12; // HiSup, RDF=2
    b[4] = 31;
    b[5] = 0x99; // SCCS, TPGS=01b, 3PC, PROTECT
    b[6] = 0x50; // EncServ, MultiP
    b[7] = 0x02; // CmdQue
    b[8..16].copy_from_slice(b"LIO-ORG ");
    b[16..32].copy_from_slice(b"TCMU device     ");
    b[32..36].copy_from_slice(b"4.0 ");
    b
}

#[test]
fn std_inquiry_identity_and_flags() -> Result<()> {
    let identity = decode_inquiry_standard(&std_inquiry_fixture())?;

    assert_eq!(identity.peripheral_qualifier, 0);
    assert_eq!(identity.peripheral_device_type, 0);
    assert_eq!(identity.device_type_str(), "Direct-access block (disk)");
    assert!(identity.removable);
    assert_eq!(identity.version, 0x06);
    assert_eq!(identity.response_data_format, 2);
    assert_eq!(identity.tpgs, 1);

    let expected = InquiryFlags::HI_SUP
        | InquiryFlags::SCCS
        | InquiryFlags::THIRD_PARTY_COPY
        | InquiryFlags::PROTECT
        | InquiryFlags::ENC_SERV
        | InquiryFlags::MULTI_P
        | InquiryFlags::CMD_QUE;
    assert_eq!(identity.flags, expected);
    assert!(!identity.flags.contains(InquiryFlags::NORM_ACA));
    assert!(!identity.flags.contains(InquiryFlags::WBUS16));

    assert_eq!(identity.vendor_id, "LIO-ORG");
    assert_eq!(identity.product_id, "TCMU device");
    assert_eq!(identity.product_rev, "4.0");

    Ok(())
}

/// byte0 = 0x00, byte3 = 0x12 decodes to qualifier 0, type 0,
/// HiSup set, response data format 2.
#[test]
fn std_inquiry_minimal_flags_example() {
    let mut b = [0u8; 36];
    b[3] = 0x12;
    let identity = decode_inquiry_standard(&b).expect("zero-filled INQUIRY");
    assert_eq!(identity.peripheral_qualifier, 0);
    assert_eq!(identity.peripheral_device_type, 0);
    assert!(identity.flags.contains(InquiryFlags::HI_SUP));
    assert_eq!(identity.response_data_format, 2);
    assert!(identity.vendor_id.is_empty());
}

#[test]
fn std_inquiry_rejects_short_buffer() {
    let b = std_inquiry_fixture();
    assert_eq!(
        decode_inquiry_standard(&b[..35]).expect_err("35 bytes must fail"),
        DecodeError::TruncatedBuffer { expected: 36, actual: 35 }
    );
}

#[test]
fn dispatch_selects_decoder_by_page() {
    let std = decode_inquiry(None, &std_inquiry_fixture()).expect("standard page");
    assert!(matches!(std, InquiryData::Standard(_)));

    let mut serial_page = vec![0x00, 0x80, 0x00, 0x04];
    serial_page.extend_from_slice(b"S3R1");
    match decode_inquiry(Some(0x80), &serial_page).expect("serial page") {
        InquiryData::UnitSerial(serial) => assert_eq!(serial, "S3R1"),
        other => panic!("expected UnitSerial, got {other:?}"),
    }
}

#[test]
fn dispatch_rejects_unsupported_pages() {
    let buf = [0u8; 64];
    for page in [0x00, 0x86, 0xb0, 0xb1, 0xc0, 0xff] {
        assert_eq!(
            decode_inquiry(Some(page), &buf).expect_err("page outside {0x80, 0x83}"),
            DecodeError::UnsupportedPage { page }
        );
    }
}
