use thiserror::Error;

/// Errors that can occur while setting up or mutating the emulated EEPROM.
///
/// Out-of-range addresses, a full region and corrupt log slots are not errors:
/// reads fall back to [`ERASED_BYTE`](crate::ERASED_BYTE), writes report
/// [`WriteOutcome::OutOfRange`](crate::WriteOutcome::OutOfRange), a full region is
/// compacted in place and corrupt slots are skipped during the boot scan.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The region base has to be aligned to the page size and to the driver's erase size
    #[error("invalid region base")]
    InvalidRegionBase,

    /// The region has to consist of at least one page, the page size has to be a multiple
    /// of the driver's erase size, the region has to fit into the flash and the resulting
    /// capacity has to be addressable with 16 bits.
    #[error("invalid region size")]
    InvalidRegionSize,

    /// The driver has to be able to program single halfwords and read single words.
    #[error("unsupported flash write or read size")]
    UnsupportedWriteSize,

    /// The internal error value is returned from the provided flash driver
    #[error("internal flash error")]
    FlashError,
}
