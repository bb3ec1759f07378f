use std::fmt;

use eeprom_emu::{Eeprom, EepromStatistics, Layout, ERASED_BYTE};

use crate::error::Error;
use crate::ram_flash::RamFlash;
use crate::EepromImage;

/// Bytes written at a single address. Multi-byte values are stored little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub address: u16,
    pub value: DataValue,
}

/// A value in one of the encodings supported in the CSV format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    U8(u8),
    U16(u16),
    U32(u32),
    /// Raw bytes, written in order starting at the entry's address.
    Binary(Vec<u8>),
}

impl DataValue {
    /// Return the CSV encoding column string for this value.
    pub fn encoding_str(&self) -> &'static str {
        match self {
            DataValue::U8(_) => "u8",
            DataValue::U16(_) => "u16",
            DataValue::U32(_) => "u32",
            DataValue::Binary(_) => "hex2bin",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            DataValue::U8(v) => vec![*v],
            DataValue::U16(v) => v.to_le_bytes().to_vec(),
            DataValue::U32(v) => v.to_le_bytes().to_vec(),
            DataValue::Binary(v) => v.clone(),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::U8(v) => write!(f, "{v}"),
            DataValue::U16(v) => write!(f, "{v}"),
            DataValue::U32(v) => write!(f, "{v}"),
            DataValue::Binary(v) => f.write_str(&hex::encode(v)),
        }
    }
}

/// The image only contains the region, so the log starts at offset 0.
///
/// The layout is checked here, before anything is sized from it.
fn rebase(layout: &Layout) -> Result<Layout, Error> {
    let layout = Layout::new(0, layout.page_size, layout.page_count);
    layout.check()?;
    Ok(layout)
}

fn open(data: &[u8], layout: &Layout) -> Result<Eeprom<RamFlash>, Error> {
    let layout = rebase(layout)?;
    let expected = layout.region_bytes() as usize;
    if data.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    Ok(Eeprom::new(layout, RamFlash::from_bytes(data))?)
}

/// Apply every entry in order and return the resulting contents of all bytes.
pub(crate) fn resolve_contents(image: &EepromImage, capacity: u16) -> Result<Vec<u8>, Error> {
    let mut contents = vec![ERASED_BYTE; capacity as usize];

    for entry in &image.entries {
        let bytes = entry.value.to_bytes();
        let start = entry.address as usize;
        let end = start + bytes.len();
        if end > contents.len() {
            return Err(Error::AddressOutOfRange {
                address: entry.address,
                len: bytes.len(),
                capacity,
            });
        }
        contents[start..end].copy_from_slice(&bytes);
    }

    Ok(contents)
}

/// Write the image into an erased region, one log entry per byte that differs
/// from the erased value, in address order.
pub(crate) fn generate_region_data(image: &EepromImage, layout: &Layout) -> Result<Vec<u8>, Error> {
    let layout = rebase(layout)?;
    let flash = RamFlash::erased(layout.region_bytes() as usize);
    let mut eeprom = Eeprom::new(layout, flash)?;

    let contents = resolve_contents(image, eeprom.capacity())?;
    eeprom.write_block(0, &contents)?;

    Ok(eeprom.into_inner().into_bytes())
}

/// Replay the log of a region image and return one `u8` entry per live byte.
pub(crate) fn parse_region_data(data: &[u8], layout: &Layout) -> Result<EepromImage, Error> {
    let eeprom = open(data, layout)?;

    let entries = (0..eeprom.capacity())
        .filter_map(|address| match eeprom.read_byte(address) {
            ERASED_BYTE => None,
            value => Some(ImageEntry {
                address,
                value: DataValue::U8(value),
            }),
        })
        .collect();

    Ok(EepromImage { entries })
}

pub(crate) fn region_statistics(data: &[u8], layout: &Layout) -> Result<EepromStatistics, Error> {
    let mut eeprom = open(data, layout)?;
    Ok(eeprom.statistics()?)
}
