// src/common/mod.rs

// --- Protocol-level building blocks ---
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod ioctl;
pub mod register;
pub mod timing;
pub mod types;

// --- Re-exports ---

pub use command::{code, Command, Reply, UnknownCommand};

pub use error::Tcs34725Error;

pub use hal_traits::{I2cRegisterBus, RegisterBus, DEFAULT_I2C_ADDRESS};

pub use register::Register;

// timing constants stay under common::timing::*

pub use types::{Channel, ColorSample, EnableState, Gain, IntegrationTime};
