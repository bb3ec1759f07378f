//! The `Get<T>` trait and its implementation in this module allows providing a single generic,
//! overloaded function `get<T>()` for all supported types of the driver.

use crate::Eeprom;
use crate::platform::Platform;

pub trait Get<T> {
    fn get(&self, address: u16) -> T;
}

impl<T, G: Get<T>> Get<T> for &G {
    fn get(&self, address: u16) -> T {
        (*self).get(address)
    }
}

impl<T: Platform> Get<u8> for Eeprom<T> {
    fn get(&self, address: u16) -> u8 {
        self.read_byte(address)
    }
}

impl<T: Platform> Get<u16> for Eeprom<T> {
    fn get(&self, address: u16) -> u16 {
        let mut buf = [0u8; 2];
        self.read_block(address, &mut buf);
        u16::from_le_bytes(buf)
    }
}

impl<T: Platform> Get<u32> for Eeprom<T> {
    fn get(&self, address: u16) -> u32 {
        let mut buf = [0u8; 4];
        self.read_block(address, &mut buf);
        u32::from_le_bytes(buf)
    }
}
