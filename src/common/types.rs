// src/common/types.rs

use super::register::{Register, ENABLE_AEN, ENABLE_PON};

/// One of the four photodiode channels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Clear,
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Bulk-read order. ReadAll walks the channels in exactly this order.
    pub const ALL: [Channel; 4] = [Channel::Clear, Channel::Red, Channel::Green, Channel::Blue];

    /// Register holding the low byte of this channel's count.
    pub const fn low_register(self) -> Register {
        match self {
            Channel::Clear => Register::ClearLow,
            Channel::Red => Register::RedLow,
            Channel::Green => Register::GreenLow,
            Channel::Blue => Register::BlueLow,
        }
    }

    /// Register holding the high byte, always at `low_register() + 1`.
    pub const fn high_register(self) -> Register {
        match self {
            Channel::Clear => Register::ClearHigh,
            Channel::Red => Register::RedHigh,
            Channel::Green => Register::GreenHigh,
            Channel::Blue => Register::BlueHigh,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Channel::Clear => "clear",
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// A snapshot of all four channels, assembled from four independent word reads.
///
/// Nothing about it is cached; two samples taken back to back may straddle an
/// integration cycle boundary.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorSample {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl ColorSample {
    pub const fn new(clear: u16, red: u16, green: u16, blue: u16) -> Self {
        ColorSample { clear, red, green, blue }
    }

    /// The bulk-read payload as an ordered (clear, red, green, blue) tuple.
    pub const fn as_tuple(&self) -> (u16, u16, u16, u16) {
        (self.clear, self.red, self.green, self.blue)
    }
}

impl From<ColorSample> for (u16, u16, u16, u16) {
    fn from(value: ColorSample) -> Self {
        value.as_tuple()
    }
}

/// Logical power/acquisition state, derived from an ENABLE register value.
///
/// Only PON and AEN are looked at. With PON clear the oscillator is off, so
/// the part counts as `Disabled` whatever AEN says.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnableState {
    Disabled,
    PoweredOn,
    PoweredAndAcquiring,
}

impl EnableState {
    pub const fn from_register(value: u8) -> Self {
        if value & ENABLE_PON == 0 {
            EnableState::Disabled
        } else if value & ENABLE_AEN == 0 {
            EnableState::PoweredOn
        } else {
            EnableState::PoweredAndAcquiring
        }
    }

    /// ENABLE value the sequencer writes to reach this state.
    pub const fn to_register(self) -> u8 {
        match self {
            EnableState::Disabled => 0x00,
            EnableState::PoweredOn => ENABLE_PON,
            EnableState::PoweredAndAcquiring => ENABLE_PON | ENABLE_AEN,
        }
    }

    /// Channel registers only hold meaningful counts in this state.
    pub const fn is_acquiring(self) -> bool {
        matches!(self, EnableState::PoweredAndAcquiring)
    }
}

/// Raw CONTROL (AGAIN) byte. Written verbatim, never range checked.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gain(pub u8);

impl Gain {
    /// 1x gain, the value Initialize and the probe write.
    pub const X1: Gain = Gain(0x00);

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for Gain {
    fn from(value: u8) -> Self {
        Gain(value)
    }
}

/// Raw ATIME byte. Written verbatim, never range checked.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntegrationTime(pub u8);

impl IntegrationTime {
    /// ATIME = 0x00, the longest (700 ms) integration.
    pub const MAX: IntegrationTime = IntegrationTime(0x00);

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for IntegrationTime {
    fn from(value: u8) -> Self {
        IntegrationTime(value)
    }
}
