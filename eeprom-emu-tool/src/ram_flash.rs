use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

/// A flash region held in memory. Programming follows the NOR rules: bits only
/// flip from 1 to 0 and erasing sets every byte back to `0xFF`.
pub(crate) struct RamFlash {
    buf: Vec<u8>,
}

#[derive(Debug)]
pub(crate) struct OutOfBounds;

impl NorFlashError for OutOfBounds {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::OutOfBounds
    }
}

impl RamFlash {
    pub(crate) fn erased(len: usize) -> Self {
        Self {
            buf: vec![0xFF; len],
        }
    }

    pub(crate) fn from_bytes(data: &[u8]) -> Self {
        Self { buf: data.to_vec() }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn range(&self, offset: u32, len: usize) -> Result<std::ops::Range<usize>, OutOfBounds> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(OutOfBounds)?;
        if end > self.buf.len() {
            return Err(OutOfBounds);
        }
        Ok(start..end)
    }
}

impl ErrorType for RamFlash {
    type Error = OutOfBounds;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.buf[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 2;
    // smallest unit any region page can be a multiple of
    const ERASE_SIZE: usize = 4;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let len = to.checked_sub(from).ok_or(OutOfBounds)? as usize;
        let range = self.range(from, len)?;
        self.buf[range].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        for (byte, &value) in self.buf[range].iter_mut().zip(bytes) {
            *byte &= value;
        }
        Ok(())
    }
}
