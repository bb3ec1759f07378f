//! On-flash log format.
//!
//! Every log entry occupies one 4-byte slot made of two little-endian halfwords:
//!
//! ```text
//! +0  address slot  (logical address, 0..capacity)
//! +2  data slot     (0x00 in the high byte, value in the low byte)
//! ```
//!
//! Entries are appended in order. A later entry for the same address shadows
//! every earlier one.

/// Size of one (address, data) entry in bytes.
pub(crate) const ENTRY_SIZE: u32 = 4;
pub(crate) const ADDRESS_SLOT_OFFSET: u32 = 0;
pub(crate) const DATA_SLOT_OFFSET: u32 = 2;

/// Value of an emulated byte that was never written.
pub const ERASED_BYTE: u8 = 0xFF;
pub(crate) const ERASED_HALFWORD: u16 = 0xFFFF;
pub(crate) const ERASED_SLOT: u32 = 0xFFFF_FFFF;

/// Classification of a single log slot as read back from flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum SlotState {
    /// Both halfwords erased. This is where the log ends.
    Empty,
    /// A committed entry.
    Entry { address: u16, value: u8 },
    /// The address was programmed but the data halfword never was.
    ///
    /// Skipped on replay, so the address keeps its previously committed value instead
    /// of reading back the low byte of the erased data halfword (`0xFF`).
    Torn { address: u16 },
    /// Neither a valid address nor the erased marker.
    Corrupt { raw: u32 },
}

impl SlotState {
    pub(crate) fn classify(raw: u32, capacity: u16) -> Self {
        let (address, data) = split(raw);

        if address < capacity {
            if data == ERASED_HALFWORD {
                SlotState::Torn { address }
            } else {
                SlotState::Entry {
                    address,
                    value: data as u8,
                }
            }
        } else if address == ERASED_HALFWORD && data == ERASED_HALFWORD {
            SlotState::Empty
        } else {
            SlotState::Corrupt { raw }
        }
    }
}

/// Splits a slot read as one little-endian word into its address and data halfwords.
#[inline(always)]
pub(crate) const fn split(raw: u32) -> (u16, u16) {
    (raw as u16, (raw >> 16) as u16)
}

/// The data halfword programmed for `value`. The high byte is always cleared so a
/// committed entry can never be mistaken for an erased data slot.
#[inline(always)]
pub(crate) const fn data_halfword(value: u8) -> u16 {
    value as u16
}
