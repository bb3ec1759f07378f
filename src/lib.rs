#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, target_arch = "x86_64")), no_std)]

pub mod error;
mod get;
mod internal;
pub mod layout;
mod mirror;
pub mod platform;
mod raw;
mod set;

pub use get::Get;
pub use layout::{Layout, Mcu};
pub use raw::ERASED_BYTE;
pub use set::{Set, Update};

extern crate alloc;

use crate::error::Error;
use crate::mirror::Mirror;
use crate::platform::Platform;

/// What a single byte write did to the flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteOutcome {
    /// A new entry was appended to the log.
    Appended,
    /// The region was full, so it was erased and rewritten from the mirror.
    Compacted,
    /// The byte already held the value. Flash was not touched.
    Unchanged,
    /// The address is not below [`Eeprom::capacity`]. Nothing was written.
    OutOfRange,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Appended | WriteOutcome::Compacted)
    }
}

/// Result of the boot scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport {
    /// Committed entries replayed into the mirror, including shadowed ones.
    pub entries: u32,
    /// Slots holding an address without data, left behind by an interrupted write.
    pub torn_slots: u32,
    /// Slots that are neither a valid entry nor erased.
    pub corrupt_slots: u32,
    /// Offset of the first erased slot, `None` if the log fills the whole region.
    pub end: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromStatistics {
    pub capacity: u16,
    pub entry_slots: u32,
    pub used_slots: u32,
    pub free_slots: u32,
    pub torn_slots: u32,
    pub corrupt_slots: u32,
    /// Bytes of the mirror that do not read as [`ERASED_BYTE`].
    pub live_bytes: u32,
}

/// An emulated EEPROM backed by a region of NOR flash.
///
/// Keeps a copy of every byte in RAM, so reads never touch the flash. Each changed byte
/// is appended to the flash as an (address, value) entry; once the region is full it is
/// erased and rewritten with one entry per live byte.
///
/// The engine owns the region exclusively. Operations run to completion and must not be
/// interleaved with other users of the same flash pages.
pub struct Eeprom<T: Platform> {
    pub(crate) hal: T,
    pub(crate) layout: Layout,
    pub(crate) faulted: bool,
    pub(crate) mirror: Mirror,
    pub(crate) last_scan: ScanReport,
    /// Where the search for the next free slot starts. `None` once the region is full.
    pub(crate) next_free: Option<u32>,
}

impl<T: Platform> Eeprom<T> {
    /// Checks the layout against the flash driver and rebuilds the contents of every byte
    /// by replaying the log stored in the region.
    ///
    /// Torn or corrupt slots are skipped. Bytes that were never written read as
    /// [`ERASED_BYTE`].
    pub fn new(layout: Layout, hal: T) -> Result<Eeprom<T>, Error> {
        if !platform::supports_geometry::<T>() {
            return Err(Error::UnsupportedWriteSize);
        }

        layout.validate::<T>(hal.capacity())?;

        let mut eeprom = Self {
            hal,
            layout,
            faulted: false,
            mirror: Mirror::new(layout.capacity()),
            last_scan: ScanReport::default(),
            next_free: None,
        };

        eeprom.last_scan = eeprom.load_mirror()?;
        eeprom.next_free = eeprom.last_scan.end;

        Ok(eeprom)
    }

    /// Number of usable bytes. Valid addresses are `0..capacity`.
    pub fn capacity(&self) -> u16 {
        self.mirror.capacity()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn last_scan(&self) -> &ScanReport {
        &self.last_scan
    }

    /// Erases the whole region and resets every byte to [`ERASED_BYTE`].
    ///
    /// Also clears a previous flash fault once the erase went through.
    pub fn erase(&mut self) -> Result<(), Error> {
        match self.clear_region() {
            Ok(()) => {
                self.mirror.reset();
                self.next_free = Some(self.layout.base);
                self.faulted = false;
                Ok(())
            }
            Err(e) => {
                self.faulted = true;
                Err(e)
            }
        }
    }

    /// Returns the byte at `address`, or [`ERASED_BYTE`] for addresses beyond the capacity.
    pub fn read_byte(&self, address: u16) -> u8 {
        self.mirror.get(address).unwrap_or(raw::ERASED_BYTE)
    }

    /// Writes a single byte. Writing the value a byte already holds does not touch the flash.
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<WriteOutcome, Error> {
        if self.faulted {
            return Err(Error::FlashError);
        }

        match self.write_entry(address, value) {
            Err(Error::FlashError) => {
                self.faulted = true;
                Err(Error::FlashError)
            }
            other => other,
        }
    }

    /// Same as [`Eeprom::write_byte`], every write already skips unchanged bytes.
    pub fn update_byte(&mut self, address: u16, value: u8) -> Result<WriteOutcome, Error> {
        self.write_byte(address, value)
    }

    /// Fills `buf` starting at `address`. Bytes beyond the capacity read as [`ERASED_BYTE`].
    pub fn read_block(&self, address: u16, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = offset(address, i).map_or(raw::ERASED_BYTE, |address| self.read_byte(address));
        }
    }

    /// Writes `data` byte by byte starting at `address`. Bytes beyond the capacity are dropped.
    pub fn write_block(&mut self, address: u16, data: &[u8]) -> Result<(), Error> {
        for (i, &value) in data.iter().enumerate() {
            if let Some(address) = offset(address, i) {
                self.write_byte(address, value)?;
            }
        }

        Ok(())
    }

    /// Writes `data` only if it differs from the current contents.
    pub fn update_block(&mut self, address: u16, data: &[u8]) -> Result<(), Error> {
        let unchanged = data.iter().enumerate().all(|(i, &value)| {
            offset(address, i).map_or(true, |address| self.read_byte(address) == value)
        });

        if unchanged {
            return Ok(());
        }

        self.write_block(address, data)
    }

    /// Reads a value starting at `address`.
    ///
    /// Multi-byte values are stored little-endian.
    pub fn get<R>(&self, address: u16) -> R
    where
        Eeprom<T>: Get<R>,
    {
        Get::get(self, address)
    }

    /// Writes a value starting at `address`, byte by byte.
    pub fn set<R>(&mut self, address: u16, value: R) -> Result<(), Error>
    where
        Eeprom<T>: Set<R>,
    {
        Set::set(self, address, value)
    }

    /// Writes a value only if it differs from what is currently stored.
    pub fn update<R>(&mut self, address: u16, value: R) -> Result<(), Error>
    where
        Eeprom<T>: Update<R>,
    {
        Update::update(self, address, value)
    }

    /// Returns usage information about the region. Walks every slot of the region.
    pub fn statistics(&mut self) -> Result<EepromStatistics, Error> {
        if self.faulted {
            return Err(Error::FlashError);
        }

        match self.collect_statistics() {
            Err(Error::FlashError) => {
                self.faulted = true;
                Err(Error::FlashError)
            }
            other => other,
        }
    }

    /// Returns the flash driver.
    pub fn into_inner(self) -> T {
        self.hal
    }
}

/// Address of the `i`-th byte of a block starting at `address`, if it is representable.
fn offset(address: u16, i: usize) -> Option<u16> {
    u16::try_from(i).ok().and_then(|i| address.checked_add(i))
}
