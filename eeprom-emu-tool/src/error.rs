use thiserror::Error;

/// Errors that can occur during CSV parsing, region generation, or region
/// parsing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("hex decoding error: {0}")]
    HexError(#[from] hex::FromHexError),

    #[error("{len} bytes at address {address} exceed the capacity of {capacity} bytes")]
    AddressOutOfRange {
        address: u16,
        len: usize,
        capacity: u16,
    },

    #[error("image is {actual} bytes, the region is {expected} bytes")]
    ImageSizeMismatch { expected: usize, actual: usize },

    #[error("eeprom error: {0}")]
    EepromError(#[from] eeprom_emu::error::Error),
}
