//! Host side companion of `eeprom-emu`: converts between CSV files and raw
//! flash region images.
//!
//! Images are produced and read by the same engine that runs on the device,
//! driven over a flash region held in memory.

pub mod error;
pub mod image;

mod csv;
mod ram_flash;

use std::fs;
use std::io::Write;
use std::path::Path;

pub use eeprom_emu::{EepromStatistics, Layout, Mcu};
pub use error::Error;
pub use image::{DataValue, ImageEntry};

/// The contents of an emulated EEPROM as a list of values at addresses.
///
/// Entries may overlap, later entries win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EepromImage {
    /// The ordered list of entries in this image.
    pub entries: Vec<ImageEntry>,
}

impl EepromImage {
    /// Parse CSV content from a string.
    ///
    /// The header is `address,encoding,value`. Addresses and numeric values
    /// are decimal or `0x` prefixed hexadecimal.
    pub fn from_csv(content: &str) -> Result<Self, Error> {
        csv::parser::parse_csv(content)
    }

    /// Parse a CSV file at the given `path`.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        csv::parser::parse_csv(&content)
    }

    /// Serialize this image to CSV and return the content as a `String`.
    pub fn to_csv(&self) -> Result<String, Error> {
        csv::writer::write_csv_content(self)
    }

    /// Serialize this image to a CSV file at the given `path`.
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        csv::writer::write_csv(self, path)
    }

    /// Contents of every byte once all entries are applied.
    pub fn contents(&self, capacity: u16) -> Result<Vec<u8>, Error> {
        image::resolve_contents(self, capacity)
    }

    /// Generate the raw bytes of a region with the given layout, ready to be
    /// flashed at `layout.base`.
    pub fn generate_region(&self, layout: &Layout) -> Result<Vec<u8>, Error> {
        image::generate_region_data(self, layout)
    }

    /// Generate a region image and write it to `path`.
    pub fn generate_region_file<P: AsRef<Path>>(
        &self,
        path: P,
        layout: &Layout,
    ) -> Result<(), Error> {
        let data = self.generate_region(layout)?;
        fs::File::create(path)?.write_all(&data)?;
        Ok(())
    }

    /// Parse a region image from an in-memory byte slice.
    pub fn parse_region(data: &[u8], layout: &Layout) -> Result<Self, Error> {
        image::parse_region_data(data, layout)
    }

    /// Parse a region image file at the given `path`.
    pub fn parse_region_file<P: AsRef<Path>>(path: P, layout: &Layout) -> Result<Self, Error> {
        let data = fs::read(path)?;
        image::parse_region_data(&data, layout)
    }
}

/// Slot usage of a region image.
pub fn region_statistics(data: &[u8], layout: &Layout) -> Result<EepromStatistics, Error> {
    image::region_statistics(data, layout)
}
