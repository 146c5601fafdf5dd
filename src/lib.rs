// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod binding;
pub mod common;
pub mod driver;
pub mod harness;
pub mod mock;

// Re-export key types for convenience
pub use binding::{BindError, BindingState, SensorBinding};
pub use common::{
    Channel, ColorSample, Command, EnableState, Gain, I2cRegisterBus, IntegrationTime,
    RegisterBus, Reply, Tcs34725Error,
};
pub use driver::Tcs34725;
pub use harness::{SessionConfig, SessionReport};
