// src/driver/transaction.rs

use super::Tcs34725;
use crate::common::{
    error::Tcs34725Error,
    hal_traits::RegisterBus,
    register::Register,
    types::Channel,
};
use embedded_hal::delay::DelayNs;

impl<BUS, D> Tcs34725<BUS, D>
where
    BUS: RegisterBus,
    D: DelayNs,
{
    /// Reads one register. Exactly one bus transaction.
    pub fn read_byte(&mut self, register: Register) -> Result<u8, Tcs34725Error<BUS::Error>> {
        self.bus.read_byte_at(register.address()).map_err(|e| {
            warn!("read of register {} failed", register.offset());
            Tcs34725Error::Transaction(e)
        })
    }

    /// Writes one register. Exactly one bus transaction.
    ///
    /// A successful ENABLE write also updates the tracked [`EnableState`](crate::EnableState);
    /// a failed one leaves it at the last value known to have reached the part.
    pub fn write_byte(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.bus
            .write_byte_at(register.address(), value)
            .map_err(|e| {
                warn!("write of {} to register {} failed", value, register.offset());
                Tcs34725Error::Transaction(e)
            })?;
        if register == Register::Enable {
            self.last_enable = Some(value);
        }
        Ok(())
    }

    /// Reads a channel count: low byte, then high byte, as two separate
    /// transactions.
    ///
    /// Not atomic. The part may latch a new integration result between the
    /// two reads, so a torn value is possible; nothing here detects it.
    pub fn read_word(&mut self, channel: Channel) -> Result<u16, Tcs34725Error<BUS::Error>> {
        let low = self.read_byte(channel.low_register())?;
        let high = self.read_byte(channel.high_register())?;
        Ok(u16::from_le_bytes([low, high]))
    }
}
