use std::fs;

use eeprom_emu_tool::{
    region_statistics,
    DataValue,
    EepromImage,
    Error,
    ImageEntry,
    Layout,
    Mcu,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const LAYOUT: Layout = Layout::new(0x1_F800, 0x400, 2);

#[test]
fn test_csv_to_region() {
    let image = EepromImage::from_csv_file("tests/assets/defaults.csv").unwrap();
    assert_eq!(image.entries.len(), 4);

    let bin_file = NamedTempFile::new().unwrap();
    image.generate_region_file(bin_file.path(), &LAYOUT).unwrap();

    let data = fs::read(bin_file.path()).unwrap();
    assert_eq!(data.len(), 2048);

    // one entry per non-erased byte, in address order: address halfword then data halfword
    assert_eq!(&data[0..4], &[0x00, 0x00, 0x01, 0x00]);
    assert_eq!(&data[4..8], &[0x02, 0x00, 0x34, 0x00]);
    assert_eq!(&data[8..12], &[0x03, 0x00, 0x12, 0x00]);

    let statistics = region_statistics(&data, &LAYOUT).unwrap();
    // address 1 is never written
    assert_eq!(statistics.live_bytes, 23);
    assert_eq!(statistics.used_slots, 23);
    assert_eq!(statistics.free_slots, 512 - 23);
}

#[test]
fn test_later_entries_win() {
    let image = EepromImage {
        entries: vec![
            ImageEntry {
                address: 0,
                value: DataValue::U32(0xAABB_CCDD),
            },
            ImageEntry {
                address: 1,
                value: DataValue::U8(0x00),
            },
        ],
    };

    assert_eq!(image.contents(4).unwrap(), vec![0xDD, 0x00, 0xBB, 0xAA]);
}

#[test]
fn test_erased_bytes_are_not_written() {
    let image = EepromImage {
        entries: vec![ImageEntry {
            address: 8,
            value: DataValue::U16(0xFF42),
        }],
    };

    let data = image.generate_region(&LAYOUT).unwrap();
    assert_eq!(&data[0..4], &[0x08, 0x00, 0x42, 0x00]);
    assert!(data[4..].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_address_out_of_range() {
    let image = EepromImage::from_csv_file("tests/assets/out_of_range.csv").unwrap();
    let result = image.generate_region(&LAYOUT);
    assert!(matches!(
        result,
        Err(Error::AddressOutOfRange {
            address: 510,
            len: 2,
            capacity: 511
        })
    ));
}

#[test]
fn test_invalid_layout() {
    let image = EepromImage { entries: vec![] };
    let result = image.generate_region(&Layout::new(0, 6, 2));
    assert!(matches!(result, Err(Error::EepromError(_))));
}

#[test]
fn test_overflowing_layout() {
    let image = EepromImage::from_csv("address,encoding,value\n0,u8,1\n").unwrap();

    for layout in [
        Layout::new(0, 0x8000_0000, 2),
        Layout::new(0, 0x4000_0000, 1),
        Layout::new(0, 0, 0),
    ] {
        assert!(
            matches!(
                image.generate_region(&layout),
                Err(Error::EepromError(eeprom_emu::error::Error::InvalidRegionSize))
            ),
            "{layout:?}"
        );
        assert!(
            matches!(
                EepromImage::parse_region(&[0xFF; 16], &layout),
                Err(Error::EepromError(eeprom_emu::error::Error::InvalidRegionSize))
            ),
            "{layout:?}"
        );
        assert!(
            matches!(
                region_statistics(&[0xFF; 16], &layout),
                Err(Error::EepromError(eeprom_emu::error::Error::InvalidRegionSize))
            ),
            "{layout:?}"
        );
    }
}

#[test]
fn test_mcu_layout() {
    let image = EepromImage::from_csv("address,encoding,value\n2046,u8,7\n").unwrap();
    let layout = Mcu::Stm32f303cc.layout();

    let data = image.generate_region(&layout).unwrap();
    assert_eq!(data.len(), 8192);
    assert_eq!(&data[0..4], &[0xFE, 0x07, 0x07, 0x00]);
}
