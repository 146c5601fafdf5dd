// src/common/hal_traits.rs

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

/// 7-bit I2C address of the TCS34725 (fixed in silicon).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x29;

/// The bus handle the control core needs: byte reads and writes at a wire
/// address (command bit already applied by the caller).
///
/// One call is one bus transaction. Implementations must not retry or cache.
/// `I2cRegisterBus` covers any `embedded_hal::i2c::I2c`; implement this
/// directly for buses that expose SMBus byte-data calls natively.
pub trait RegisterBus {
    /// Associated error type for bus failures.
    type Error: Debug;

    /// SMBus "read byte data" at `address`.
    fn read_byte_at(&mut self, address: u8) -> Result<u8, Self::Error>;

    /// SMBus "write byte data" of `value` at `address`.
    fn write_byte_at(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;
}

/// Adapts an `embedded_hal::i2c::I2c` bus plus a device address to [`RegisterBus`].
#[derive(Debug)]
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    device_address: u8,
}

impl<I2C: I2c> I2cRegisterBus<I2C> {
    /// Uses the part's fixed address, 0x29.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_I2C_ADDRESS)
    }

    pub fn with_address(i2c: I2C, device_address: u8) -> Self {
        I2cRegisterBus { i2c, device_address }
    }

    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    /// Gives the underlying bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cRegisterBus<I2C> {
    type Error = I2C::Error;

    fn read_byte_at(&mut self, address: u8) -> Result<u8, Self::Error> {
        let mut data = [0u8];
        self.i2c
            .write_read(self.device_address, &[address], &mut data)?;
        Ok(data[0])
    }

    fn write_byte_at(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.device_address, &[address, value])
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn read_byte_at(&mut self, address: u8) -> Result<u8, Self::Error> {
        (**self).read_byte_at(address)
    }

    fn write_byte_at(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_byte_at(address, value)
    }
}
