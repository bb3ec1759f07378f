use embedded_storage::nor_flash::NorFlash;

/// Any blocking NOR flash driver can back the emulated EEPROM.
///
/// HAL flash drivers (e.g. `embassy_stm32::flash::Flash<'_, Blocking>`) implement
/// [`NorFlash`] directly and take care of unlocking the flash controller around
/// erase and program operations. Offsets are relative to the start of the flash
/// device, not absolute memory-mapped addresses.
pub trait Platform: NorFlash {}

impl<T: NorFlash> Platform for T {}

/// The three primitives the engine needs from the flash: aligned word reads,
/// halfword programming and page erase.
pub trait FlashMedium: Platform {
    /// Reads the 32-bit little-endian word at `offset`.
    fn read_word(&mut self, offset: u32) -> Result<u32, Self::Error> {
        let mut buf = [0u8; 4];
        self.read(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Programs a single 16-bit halfword. The target must be erased.
    fn program_halfword(&mut self, offset: u32, value: u16) -> Result<(), Self::Error> {
        self.write(offset, &value.to_le_bytes())
    }

    fn erase_page(&mut self, offset: u32, page_size: u32) -> Result<(), Self::Error> {
        self.erase(offset, offset + page_size)
    }
}

impl<T: Platform> FlashMedium for T {}

/// Reads and program halfwords must map onto whole driver transfers.
pub(crate) const fn supports_geometry<T: Platform>() -> bool {
    T::WRITE_SIZE != 0
        && T::READ_SIZE != 0
        && 2 % T::WRITE_SIZE == 0
        && 4 % T::READ_SIZE == 0
}
