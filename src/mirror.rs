use crate::raw::ERASED_BYTE;
use alloc::vec;
use alloc::vec::Vec;

/// RAM copy of every emulated byte. Reads are served from here; flash is only
/// read during the boot scan.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Mirror {
    bytes: Vec<u8>,
}

impl Mirror {
    pub(crate) fn new(capacity: u16) -> Self {
        Self {
            bytes: vec![ERASED_BYTE; capacity as usize],
        }
    }

    pub(crate) fn capacity(&self) -> u16 {
        self.bytes.len() as u16
    }

    /// `None` when `address` is outside the mirror.
    pub(crate) fn get(&self, address: u16) -> Option<u8> {
        self.bytes.get(address as usize).copied()
    }

    /// Stores `value` and returns the previous one, or `None` if `address` is out of range.
    pub(crate) fn set(&mut self, address: u16, value: u8) -> Option<u8> {
        self.bytes
            .get_mut(address as usize)
            .map(|slot| core::mem::replace(slot, value))
    }

    pub(crate) fn reset(&mut self) {
        self.bytes.fill(ERASED_BYTE);
    }

    /// Every `(address, value)` pair that does not hold the erased value, in address order.
    pub(crate) fn live(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.bytes
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != ERASED_BYTE)
            .map(|(address, &value)| (address as u16, value))
    }

    pub(crate) fn live_count(&self) -> usize {
        self.bytes.iter().filter(|&&value| value != ERASED_BYTE).count()
    }
}

#[cfg(feature = "debug-logs")]
impl core::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.live()).finish()
    }
}
