use crate::Eeprom;
use crate::error::Error;
use crate::platform::Platform;

/// Writes every byte of a value. Bytes that already hold their new value are skipped
/// individually, so only the changed bytes cost a log entry.
pub trait Set<T> {
    fn set(&mut self, address: u16, value: T) -> Result<(), Error>;
}

impl<T, S: Set<T>> Set<T> for &mut S {
    fn set(&mut self, address: u16, value: T) -> Result<(), Error> {
        (*self).set(address, value)
    }
}

impl<T: Platform> Set<u8> for Eeprom<T> {
    fn set(&mut self, address: u16, value: u8) -> Result<(), Error> {
        self.write_byte(address, value).map(|_| ())
    }
}

impl<T: Platform> Set<u16> for Eeprom<T> {
    fn set(&mut self, address: u16, value: u16) -> Result<(), Error> {
        self.write_block(address, &value.to_le_bytes())
    }
}

impl<T: Platform> Set<u32> for Eeprom<T> {
    fn set(&mut self, address: u16, value: u32) -> Result<(), Error> {
        self.write_block(address, &value.to_le_bytes())
    }
}

/// Like [`Set`], but compares the whole value first and does nothing if it is unchanged.
pub trait Update<T> {
    fn update(&mut self, address: u16, value: T) -> Result<(), Error>;
}

impl<T, U: Update<T>> Update<T> for &mut U {
    fn update(&mut self, address: u16, value: T) -> Result<(), Error> {
        (*self).update(address, value)
    }
}

impl<T: Platform> Update<u8> for Eeprom<T> {
    fn update(&mut self, address: u16, value: u8) -> Result<(), Error> {
        self.update_byte(address, value).map(|_| ())
    }
}

impl<T: Platform> Update<u16> for Eeprom<T> {
    fn update(&mut self, address: u16, value: u16) -> Result<(), Error> {
        if self.get::<u16>(address) == value {
            return Ok(());
        }
        self.write_block(address, &value.to_le_bytes())
    }
}

impl<T: Platform> Update<u32> for Eeprom<T> {
    fn update(&mut self, address: u16, value: u32) -> Result<(), Error> {
        if self.get::<u32>(address) == value {
            return Ok(());
        }
        self.write_block(address, &value.to_le_bytes())
    }
}
