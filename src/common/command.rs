// src/common/command.rs

//! The closed set of operations the dispatcher accepts.
//!
//! Callers holding raw numbers (a character-device bridge, a test harness)
//! decode them with [`Command::from_code`] or [`Command::from_ioctl`]; anything
//! outside the table is rejected before the sensor is touched.

use core::fmt;

use super::error::Tcs34725Error;
use super::ioctl;
use super::types::{Channel, ColorSample, Gain, IntegrationTime};

/// Raw command codes (the ioctl sequence numbers of the character device).
pub mod code {
    pub const READ_RED: u8 = 0;
    pub const READ_GREEN: u8 = 1;
    pub const READ_BLUE: u8 = 2;
    pub const READ_CLEAR: u8 = 3;
    pub const READ_ALL: u8 = 4;
    pub const RESET: u8 = 5;
    pub const SET_GAIN: u8 = 6;
    pub const SET_INTEGRATION_TIME: u8 = 7;
    pub const SET_ENABLE: u8 = 8;
    pub const GET_STATUS: u8 = 9;
    pub const INITIALIZE: u8 = 10;
}

/// One sensor operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Word read of one channel.
    ReadChannel(Channel),
    /// Four word reads, clear, red, green, blue.
    ReadAll,
    /// Power cycle: ENABLE off, PON, PON|AEN with 10 ms settles.
    Reset,
    /// Write CONTROL verbatim.
    SetGain(Gain),
    /// Write ATIME verbatim.
    SetIntegrationTime(IntegrationTime),
    /// Write ENABLE verbatim. PON/AEN ordering is the caller's problem here.
    SetEnable(u8),
    /// Read back the ENABLE register.
    GetStatus,
    /// Power cycle, 1x gain, 700 ms integration, then block for 5 s.
    Initialize,
}

/// Successful result of a [`Command`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Result of `ReadChannel`.
    Channel(u16),
    /// Result of `ReadAll`.
    Sample(ColorSample),
    /// Raw ENABLE byte from `GetStatus`.
    Status(u8),
    /// Commands that only write.
    Done,
}

/// A raw code that matches no entry of the command table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand(pub u32);

impl<E: fmt::Debug> From<UnknownCommand> for Tcs34725Error<E> {
    fn from(value: UnknownCommand) -> Self {
        Tcs34725Error::InvalidOperation(value.0)
    }
}

impl Command {
    /// Decodes a raw command code. `arg` is the byte payload for the three
    /// setters and is ignored by everything else.
    pub fn from_code(code: u32, arg: u8) -> Result<Self, UnknownCommand> {
        let Ok(short) = u8::try_from(code) else {
            return Err(UnknownCommand(code));
        };
        let command = match short {
            code::READ_RED => Command::ReadChannel(Channel::Red),
            code::READ_GREEN => Command::ReadChannel(Channel::Green),
            code::READ_BLUE => Command::ReadChannel(Channel::Blue),
            code::READ_CLEAR => Command::ReadChannel(Channel::Clear),
            code::READ_ALL => Command::ReadAll,
            code::RESET => Command::Reset,
            code::SET_GAIN => Command::SetGain(Gain(arg)),
            code::SET_INTEGRATION_TIME => Command::SetIntegrationTime(IntegrationTime(arg)),
            code::SET_ENABLE => Command::SetEnable(arg),
            code::GET_STATUS => Command::GetStatus,
            code::INITIALIZE => Command::Initialize,
            _ => return Err(UnknownCommand(code)),
        };
        Ok(command)
    }

    /// Decodes a full Linux ioctl request number (see [`ioctl`]).
    pub fn from_ioctl(request: u32, arg: u8) -> Result<Self, UnknownCommand> {
        let nr = ioctl::decode(request).ok_or(UnknownCommand(request))?;
        Command::from_code(u32::from(nr), arg)
    }

    /// Inverse of [`Command::from_code`].
    pub const fn code(&self) -> u8 {
        match self {
            Command::ReadChannel(Channel::Red) => code::READ_RED,
            Command::ReadChannel(Channel::Green) => code::READ_GREEN,
            Command::ReadChannel(Channel::Blue) => code::READ_BLUE,
            Command::ReadChannel(Channel::Clear) => code::READ_CLEAR,
            Command::ReadAll => code::READ_ALL,
            Command::Reset => code::RESET,
            Command::SetGain(_) => code::SET_GAIN,
            Command::SetIntegrationTime(_) => code::SET_INTEGRATION_TIME,
            Command::SetEnable(_) => code::SET_ENABLE,
            Command::GetStatus => code::GET_STATUS,
            Command::Initialize => code::INITIALIZE,
        }
    }

    /// The ioctl request number a character-device bridge would receive.
    pub const fn ioctl_request(&self) -> u32 {
        ioctl::REQUESTS[self.code() as usize]
    }

    /// Commands that can block for long enough to matter to the caller.
    pub const fn is_long_running(&self) -> bool {
        matches!(self, Command::Initialize)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ReadChannel(channel) => write!(f, "read {}", channel.name()),
            Command::ReadAll => f.write_str("read all"),
            Command::Reset => f.write_str("reset"),
            Command::SetGain(gain) => write!(f, "set gain {:#04x}", gain.raw()),
            Command::SetIntegrationTime(atime) => {
                write!(f, "set integration time {:#04x}", atime.raw())
            }
            Command::SetEnable(value) => write!(f, "set enable {:#04x}", value),
            Command::GetStatus => f.write_str("get status"),
            Command::Initialize => f.write_str("initialize"),
        }
    }
}
