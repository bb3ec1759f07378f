use crate::error::Error;
use crate::platform::{FlashMedium, Platform};
use crate::raw::{ADDRESS_SLOT_OFFSET, DATA_SLOT_OFFSET, ENTRY_SIZE, ERASED_SLOT, SlotState};
use crate::{Eeprom, EepromStatistics, ScanReport, WriteOutcome, raw};
#[cfg(feature = "defmt")]
use defmt::{debug, trace, warn};

impl<T: Platform> Eeprom<T> {
    /// Replays the log into the mirror. The scan walks forward from the region base so
    /// the newest entry for an address always wins, and stops at the first fully
    /// erased slot since nothing is ever written past it.
    pub(crate) fn load_mirror(&mut self) -> Result<ScanReport, Error> {
        #[cfg(feature = "defmt")]
        trace!("load_mirror: @{:#08x}..{:#08x}", self.layout.base, self.layout.end());

        self.mirror.reset();
        let capacity = self.mirror.capacity();
        let mut report = ScanReport::default();

        for offset in self.layout.slots() {
            let raw = self.hal.read_word(offset).map_err(|_| Error::FlashError)?;

            match SlotState::classify(raw, capacity) {
                SlotState::Entry { address, value } => {
                    self.mirror.set(address, value);
                    report.entries += 1;
                }
                SlotState::Empty => {
                    report.end = Some(offset);
                    break;
                }
                #[allow(unused_variables)]
                SlotState::Torn { address } => {
                    #[cfg(feature = "defmt")]
                    warn!("load_mirror: torn entry for {} @{:#08x}", address, offset);

                    #[cfg(feature = "debug-logs")]
                    println!("  internal: load_mirror: torn entry for {address} @{offset:#08x}");

                    report.torn_slots += 1;
                }
                #[allow(unused_variables)]
                SlotState::Corrupt { raw } => {
                    #[cfg(feature = "defmt")]
                    warn!("load_mirror: corrupt slot {:#010x} @{:#08x}", raw, offset);

                    #[cfg(feature = "debug-logs")]
                    println!("  internal: load_mirror: corrupt slot {raw:#010x} @{offset:#08x}");

                    report.corrupt_slots += 1;
                }
            }
        }

        #[cfg(feature = "debug-logs")]
        println!("  internal: load_mirror: {report:?} {:?}", self.mirror);

        Ok(report)
    }

    /// Offset of the first slot at or after the cursor whose whole word is still erased.
    ///
    /// Damaged slots are stepped over, so the cursor only ever moves forward until the
    /// next compaction or erase.
    pub(crate) fn find_free_slot(&mut self) -> Result<Option<u32>, Error> {
        let Some(start) = self.next_free else {
            return Ok(None);
        };

        for offset in (start..self.layout.end()).step_by(ENTRY_SIZE as usize) {
            let raw = self.hal.read_word(offset).map_err(|_| Error::FlashError)?;
            if raw == ERASED_SLOT {
                self.next_free = Some(offset);
                return Ok(Some(offset));
            }
        }

        self.next_free = None;
        Ok(None)
    }

    /// Updates a single byte, appending to the log or compacting when the region is full.
    ///
    /// The mirror is updated before flash is touched, so a compaction triggered here
    /// already rewrites the new value.
    pub(crate) fn write_entry(&mut self, address: u16, value: u8) -> Result<WriteOutcome, Error> {
        match self.mirror.get(address) {
            None => return Ok(WriteOutcome::OutOfRange),
            Some(current) if current == value => return Ok(WriteOutcome::Unchanged),
            Some(_) => {}
        }

        let slot = self.find_free_slot()?;
        self.mirror.set(address, value);

        match slot {
            Some(offset) => {
                #[cfg(feature = "defmt")]
                trace!("write_entry: {}={:#04x} @{:#08x}", address, value, offset);

                program_entry(&mut self.hal, offset, address, value)?;
                let next = offset + ENTRY_SIZE;
                self.next_free = (next < self.layout.end()).then_some(next);
                Ok(WriteOutcome::Appended)
            }
            None => {
                self.compact()?;
                Ok(WriteOutcome::Compacted)
            }
        }
    }

    /// Erases the region and writes one entry per live mirror byte, in address order.
    pub(crate) fn compact(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        debug!("compact: {} live bytes", self.mirror.live_count());

        #[cfg(feature = "debug-logs")]
        println!("internal: compact");

        self.next_free = None;
        self.clear_region()?;

        let Self {
            hal,
            layout,
            mirror,
            next_free,
            ..
        } = self;

        let mut offset = layout.base;
        for (address, value) in mirror.live() {
            program_entry(hal, offset, address, value)?;
            offset += ENTRY_SIZE;
        }

        // capacity is one slot short of the region, so there is always room left
        *next_free = Some(offset);

        Ok(())
    }

    /// Erases every page of the region. The mirror is left untouched.
    pub(crate) fn clear_region(&mut self) -> Result<(), Error> {
        for page in self.layout.pages() {
            #[cfg(feature = "defmt")]
            trace!("clear_region: erase page @{:#08x}", page);

            self.hal
                .erase_page(page, self.layout.page_size)
                .map_err(|_| Error::FlashError)?;
        }

        Ok(())
    }

    pub(crate) fn collect_statistics(&mut self) -> Result<EepromStatistics, Error> {
        let capacity = self.mirror.capacity();
        let mut statistics = EepromStatistics {
            capacity,
            entry_slots: self.layout.entry_slots(),
            used_slots: 0,
            free_slots: 0,
            torn_slots: 0,
            corrupt_slots: 0,
            live_bytes: self.mirror.live_count() as u32,
        };

        for offset in self.layout.slots() {
            let raw = self.hal.read_word(offset).map_err(|_| Error::FlashError)?;
            match SlotState::classify(raw, capacity) {
                SlotState::Empty => statistics.free_slots += 1,
                SlotState::Entry { .. } => statistics.used_slots += 1,
                SlotState::Torn { .. } => statistics.torn_slots += 1,
                SlotState::Corrupt { .. } => statistics.corrupt_slots += 1,
            }
        }

        Ok(statistics)
    }
}

/// Programs one log entry. The address halfword goes first: if power is lost in
/// between, the slot is left torn and is ignored by the next scan.
fn program_entry<T: Platform>(
    hal: &mut T,
    offset: u32,
    address: u16,
    value: u8,
) -> Result<(), Error> {
    hal.program_halfword(offset + ADDRESS_SLOT_OFFSET, address)
        .map_err(|_| Error::FlashError)?;
    hal.program_halfword(offset + DATA_SLOT_OFFSET, raw::data_halfword(value))
        .map_err(|_| Error::FlashError)
}
