//! Placement and geometry of the flash region reserved for the emulated EEPROM.
//!
//! The layout must never change once a device has shipped: a different base or
//! page count makes every previously written log unreadable.

use crate::error::Error;
use crate::platform::Platform;
use crate::raw::{ENTRY_SIZE, ERASED_HALFWORD};
use core::ops::Range;

/// The erase pages that make up the region, described as a contiguous run of
/// equally sized pages. A single large sector is simply `page_count == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Offset of the first page from the start of the flash device.
    pub base: u32,
    pub page_size: u32,
    pub page_count: u32,
}

impl Layout {
    pub const fn new(base: u32, page_size: u32, page_count: u32) -> Self {
        Self {
            base,
            page_size,
            page_count,
        }
    }

    /// Places `page_count` pages at the very top of a flash of `flash_size` bytes.
    pub const fn top_of_flash(flash_size: u32, page_size: u32, page_count: u32) -> Self {
        Self::new(
            flash_size.saturating_sub(page_size.saturating_mul(page_count)),
            page_size,
            page_count,
        )
    }

    /// Size of the region in bytes, saturating at `u32::MAX`.
    pub const fn region_bytes(&self) -> u32 {
        self.page_size.saturating_mul(self.page_count)
    }

    pub const fn end(&self) -> u32 {
        self.base.saturating_add(self.region_bytes())
    }

    /// Number of 4-byte entry slots in the region.
    pub const fn entry_slots(&self) -> u32 {
        self.region_bytes() / ENTRY_SIZE
    }

    /// Number of emulated bytes. One slot is held back so that a fully live
    /// mirror still leaves free room after compaction.
    ///
    /// Only meaningful for a layout that passes [`Layout::check`].
    pub const fn capacity(&self) -> u16 {
        let capacity = self.entry_slots().saturating_sub(1);
        if capacity > u16::MAX as u32 {
            u16::MAX
        } else {
            capacity as u16
        }
    }

    /// Start offsets of every erase page in the region.
    pub fn pages(&self) -> impl Iterator<Item = u32> + use<> {
        let Layout {
            base, page_size, ..
        } = *self;
        (0..self.page_count).map(move |page| base + page * page_size)
    }

    /// Offsets of every entry slot, in log order.
    pub fn slots(&self) -> impl Iterator<Item = u32> + use<> {
        self.range().step_by(ENTRY_SIZE as usize)
    }

    pub const fn range(&self) -> Range<u32> {
        self.base..self.end()
    }

    /// Checks the parts of the layout that do not depend on a flash driver: at
    /// least one page, pages made of whole entries, a base aligned to the page
    /// size, a region that ends inside the 32-bit offset space and a capacity
    /// that fits the 16-bit address slot.
    pub fn check(&self) -> Result<(), Error> {
        if self.page_count == 0 || self.page_size == 0 || !self.page_size.is_multiple_of(ENTRY_SIZE)
        {
            return Err(Error::InvalidRegionSize);
        }

        if !self.base.is_multiple_of(self.page_size) {
            return Err(Error::InvalidRegionBase);
        }

        let end = (self.page_size as u64) * (self.page_count as u64) + self.base as u64;
        if end > u32::MAX as u64 {
            return Err(Error::InvalidRegionSize);
        }

        // capacity has to fit the 16-bit address slot without colliding with the erased marker
        let entry_slots = (end - self.base as u64) / ENTRY_SIZE as u64;
        if entry_slots < 2 || entry_slots - 1 > ERASED_HALFWORD as u64 {
            return Err(Error::InvalidRegionSize);
        }

        Ok(())
    }

    /// Checks the layout against the driver's geometry.
    pub(crate) fn validate<T: Platform>(&self, flash_capacity: usize) -> Result<(), Error> {
        self.check()?;

        if !(self.page_size as usize).is_multiple_of(T::ERASE_SIZE) {
            return Err(Error::InvalidRegionSize);
        }

        if !(self.base as usize).is_multiple_of(T::ERASE_SIZE) {
            return Err(Error::InvalidRegionBase);
        }

        if self.end() as u64 > flash_capacity as u64 {
            return Err(Error::InvalidRegionSize);
        }

        Ok(())
    }
}

/// Microcontrollers with a known region placement at the top of their flash.
#[derive(
    strum::Display, strum::EnumString, strum::EnumIter, Debug, Clone, Copy, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mcu {
    /// 128 KiB flash, two 1 KiB pages.
    Stm32f103rb,
    /// 32 KiB flash, two 1 KiB pages.
    Stm32f042k6,
    /// 256 KiB flash, four 2 KiB pages.
    Stm32f303cc,
    /// 128 KiB flash, four 2 KiB pages.
    Stm32f072cb,
    /// 256 KiB flash, the 128 KiB sector 7.
    Stm32f401xc,
}

impl Mcu {
    pub const fn flash_size(&self) -> u32 {
        match self {
            Mcu::Stm32f103rb | Mcu::Stm32f072cb => 128 * 1024,
            Mcu::Stm32f042k6 => 32 * 1024,
            Mcu::Stm32f303cc | Mcu::Stm32f401xc => 256 * 1024,
        }
    }

    pub const fn page_size(&self) -> u32 {
        match self {
            Mcu::Stm32f103rb | Mcu::Stm32f042k6 => 0x400,
            Mcu::Stm32f303cc | Mcu::Stm32f072cb => 0x800,
            Mcu::Stm32f401xc => 0x2_0000,
        }
    }

    pub const fn page_count(&self) -> u32 {
        match self {
            Mcu::Stm32f103rb | Mcu::Stm32f042k6 => 2,
            Mcu::Stm32f303cc | Mcu::Stm32f072cb => 4,
            Mcu::Stm32f401xc => 1,
        }
    }

    pub const fn layout(&self) -> Layout {
        Layout::top_of_flash(self.flash_size(), self.page_size(), self.page_count())
    }
}

impl From<Mcu> for Layout {
    fn from(mcu: Mcu) -> Self {
        mcu.layout()
    }
}
