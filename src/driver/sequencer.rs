// src/driver/sequencer.rs

//! Multi-step register procedures with their mandatory settle delays.
//!
//! Every procedure aborts on the first failed write and returns that error.
//! Nothing is rolled back: the sensor stays in whatever state the last
//! successful write left it in, which may be half-configured. Callers that
//! need a known state afterwards must run another Reset or Initialize.

use super::Tcs34725;
use crate::common::{
    error::Tcs34725Error,
    hal_traits::RegisterBus,
    register::Register,
    timing,
    types::{EnableState, Gain, IntegrationTime},
};
use core::time::Duration;
use embedded_hal::delay::DelayNs;

impl<BUS, D> Tcs34725<BUS, D>
where
    BUS: RegisterBus,
    D: DelayNs,
{
    /// ENABLE=0x00, 10 ms, ENABLE=PON, 10 ms, ENABLE=PON|AEN.
    ///
    /// Blocks for about 20 ms.
    pub(crate) fn power_cycle_enable(&mut self) -> Result<(), Tcs34725Error<BUS::Error>> {
        trace!("power cycle");
        self.write_enable(EnableState::Disabled)?;
        self.settle(timing::POWER_SETTLE);
        self.write_enable(EnableState::PoweredOn)?;
        self.settle(timing::POWER_SETTLE);
        self.write_enable(EnableState::PoweredAndAcquiring)
    }

    /// Power cycle, CONTROL=0x00 (1x), ATIME=0x00 (700 ms), then wait 5 s for
    /// the first integration cycles to complete.
    ///
    /// Blocks for about 5.02 s.
    pub(crate) fn initialize_defaults(&mut self) -> Result<(), Tcs34725Error<BUS::Error>> {
        info!("initializing sensor defaults");
        self.power_cycle_enable()?;
        self.write_byte(Register::Control, Gain::X1.raw())?;
        self.write_byte(Register::Atime, IntegrationTime::MAX.raw())?;
        self.settle(timing::INIT_SETTLE);
        info!("sensor initialized");
        Ok(())
    }

    /// Bring-up run by [`SensorBinding::bind`](crate::SensorBinding::bind):
    /// PON, 10 ms, PON|AEN, ATIME=0x00, CONTROL=0x00, then one 700 ms
    /// integration cycle.
    ///
    /// Unlike Reset it does not start by switching the part off.
    pub(crate) fn probe(&mut self) -> Result<(), Tcs34725Error<BUS::Error>> {
        debug!("probe sequence");
        self.write_enable(EnableState::PoweredOn)?;
        self.settle(timing::POWER_SETTLE);
        self.write_enable(EnableState::PoweredAndAcquiring)?;
        self.write_byte(Register::Atime, IntegrationTime::MAX.raw())?;
        self.write_byte(Register::Control, Gain::X1.raw())?;
        self.settle(timing::PROBE_SETTLE);
        Ok(())
    }

    fn write_enable(&mut self, state: EnableState) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.write_byte(Register::Enable, state.to_register())
    }

    fn settle(&mut self, duration: Duration) {
        self.delay.delay_ms(timing::as_delay_ms(duration));
    }
}
