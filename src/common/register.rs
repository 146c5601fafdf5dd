// src/common/register.rs

//! TCS34725 register map.
//!
//! Every register access has to carry the command bit in the address byte;
//! the part ignores transactions without it.

/// Bit OR'ed into every register address (CMD, "normal" protocol, no auto-increment).
pub const COMMAND_BIT: u8 = 0x80;

/// ENABLE bit 0: power on, starts the internal oscillator.
pub const ENABLE_PON: u8 = 0x01;
/// ENABLE bit 1: RGBC ADC enable, starts integration cycles.
pub const ENABLE_AEN: u8 = 0x02;

/// Addressable 8-bit registers used by the control core.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Enable = 0x00,
    Atime = 0x01,
    Control = 0x0F,
    ClearLow = 0x14,
    ClearHigh = 0x15,
    RedLow = 0x16,
    RedHigh = 0x17,
    GreenLow = 0x18,
    GreenHigh = 0x19,
    BlueLow = 0x1A,
    BlueHigh = 0x1B,
}

impl Register {
    /// Raw register offset, without the command bit.
    #[inline]
    pub const fn offset(self) -> u8 {
        self as u8
    }

    /// Address byte put on the wire: `COMMAND_BIT | offset`.
    #[inline]
    pub const fn address(self) -> u8 {
        COMMAND_BIT | self as u8
    }
}

impl From<Register> for u8 {
    fn from(value: Register) -> Self {
        value.address()
    }
}
