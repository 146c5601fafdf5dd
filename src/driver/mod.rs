// src/driver/mod.rs

mod sequencer;
mod transaction;

use crate::common::{
    command::{Command, Reply},
    error::Tcs34725Error,
    hal_traits::RegisterBus,
    register::Register,
    types::{Channel, ColorSample, EnableState, Gain, IntegrationTime},
};
use embedded_hal::delay::DelayNs;

/// TCS34725 control core for one sensor.
///
/// Owns the register bus and the delay provider. Calls are serialized by
/// `&mut self`; share a driver between contexts through
/// [`SensorBinding`](crate::SensorBinding).
#[derive(Debug)]
pub struct Tcs34725<BUS, D> {
    bus: BUS,
    delay: D,
    last_enable: Option<u8>,
}

impl<BUS, D> Tcs34725<BUS, D>
where
    BUS: RegisterBus,
    D: DelayNs,
{
    /// Wraps a bus and delay. Does not touch the sensor.
    pub fn new(bus: BUS, delay: D) -> Self {
        Tcs34725 {
            bus,
            delay,
            last_enable: None,
        }
    }

    /// Consumes the driver and returns the bus and delay.
    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    /// Last ENABLE value that reached the part, if any was written through
    /// this driver.
    pub fn last_enable_write(&self) -> Option<u8> {
        self.last_enable
    }

    /// [`EnableState`] implied by [`last_enable_write`](Self::last_enable_write).
    ///
    /// `None` until the first successful ENABLE write. Tracked locally; the
    /// register is not read back.
    pub fn enable_state(&self) -> Option<EnableState> {
        self.last_enable.map(EnableState::from_register)
    }

    // --- Dispatcher ---

    /// Runs one command to completion.
    ///
    /// Any transaction failure aborts the command with
    /// [`Tcs34725Error::Transaction`]; earlier writes of the same command
    /// stay applied.
    pub fn execute(&mut self, command: &Command) -> Result<Reply, Tcs34725Error<BUS::Error>> {
        debug!("execute command {}", command.code());
        if command.is_long_running() {
            info!("command {} blocks for the 5 s settle", command.code());
        }
        let reply = match *command {
            Command::ReadChannel(channel) => Reply::Channel(self.read_channel(channel)?),
            Command::ReadAll => Reply::Sample(self.read_all()?),
            Command::Reset => {
                self.reset()?;
                Reply::Done
            }
            Command::SetGain(gain) => {
                self.set_gain(gain)?;
                Reply::Done
            }
            Command::SetIntegrationTime(atime) => {
                self.set_integration_time(atime)?;
                Reply::Done
            }
            Command::SetEnable(value) => {
                self.set_enable(value)?;
                Reply::Done
            }
            Command::GetStatus => Reply::Status(self.status()?),
            Command::Initialize => {
                self.initialize()?;
                Reply::Done
            }
        };
        Ok(reply)
    }

    // --- Typed operations ---

    pub fn read_channel(&mut self, channel: Channel) -> Result<u16, Tcs34725Error<BUS::Error>> {
        self.read_word(channel)
    }

    /// Eight reads: clear, red, green, blue, each low then high.
    ///
    /// The first failure aborts the rest; no partial sample is returned.
    pub fn read_all(&mut self) -> Result<ColorSample, Tcs34725Error<BUS::Error>> {
        let clear = self.read_word(Channel::Clear)?;
        let red = self.read_word(Channel::Red)?;
        let green = self.read_word(Channel::Green)?;
        let blue = self.read_word(Channel::Blue)?;
        Ok(ColorSample::new(clear, red, green, blue))
    }

    /// Power cycle into PON|AEN. Gain and integration time are left alone.
    pub fn reset(&mut self) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.power_cycle_enable()
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.write_byte(Register::Control, gain.raw())
    }

    pub fn set_integration_time(
        &mut self,
        atime: IntegrationTime,
    ) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.write_byte(Register::Atime, atime.raw())
    }

    /// Writes ENABLE verbatim. Setting AEN without PON is accepted and
    /// leaves the part idle.
    pub fn set_enable(&mut self, value: u8) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.write_byte(Register::Enable, value)
    }

    /// Raw ENABLE register, read from the part.
    pub fn status(&mut self) -> Result<u8, Tcs34725Error<BUS::Error>> {
        self.read_byte(Register::Enable)
    }

    /// Power cycle plus 1x gain and 700 ms integration, then a 5 s settle.
    pub fn initialize(&mut self) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.initialize_defaults()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BusEvent, MockBus, MockBusError, MockDelay, Trace};
    use crate::I2cRegisterBus;

    use BusEvent::{Delay, Read, Write};

    fn driver(bus: MockBus, trace: &Trace) -> Tcs34725<I2cRegisterBus<MockBus>, MockDelay> {
        Tcs34725::new(I2cRegisterBus::new(bus), MockDelay::new(trace.clone()))
    }

    fn loaded_bus(trace: &Trace) -> MockBus {
        let mut bus = MockBus::new(trace.clone());
        bus.set_word(Register::ClearLow, 0x0102);
        bus.set_word(Register::RedLow, 0x0304);
        bus.set_word(Register::GreenLow, 0x0506);
        bus.set_word(Register::BlueLow, 0x0708);
        bus
    }

    #[test]
    fn test_new_does_not_touch_bus() {
        let trace = Trace::new();
        let sensor = driver(MockBus::new(trace.clone()), &trace);
        assert!(trace.is_empty());
        assert_eq!(sensor.enable_state(), None);
    }

    #[test]
    fn test_read_channel_commands() {
        let trace = Trace::new();
        let mut sensor = driver(loaded_bus(&trace), &trace);

        let cases = [
            (Channel::Red, 0x0304, 0x96),
            (Channel::Green, 0x0506, 0x98),
            (Channel::Blue, 0x0708, 0x9A),
            (Channel::Clear, 0x0102, 0x94),
        ];
        for (channel, expected, low_address) in cases {
            trace.clear();
            let reply = sensor.execute(&Command::ReadChannel(channel)).unwrap();
            assert_eq!(reply, Reply::Channel(expected));
            assert_eq!(
                trace.events(),
                std::vec![
                    Read { address: low_address },
                    Read { address: low_address + 1 },
                ]
            );
        }
    }

    #[test]
    fn test_read_all_order() {
        let trace = Trace::new();
        let mut sensor = driver(loaded_bus(&trace), &trace);

        let reply = sensor.execute(&Command::ReadAll).unwrap();
        assert_eq!(
            reply,
            Reply::Sample(ColorSample::new(0x0102, 0x0304, 0x0506, 0x0708))
        );
        let addresses: std::vec::Vec<u8> = trace
            .events()
            .iter()
            .map(|e| match e {
                Read { address } => *address,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(addresses, (0x94..=0x9B).collect::<std::vec::Vec<u8>>());
    }

    #[test]
    fn test_read_all_all_zero() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);
        assert_eq!(
            sensor.execute(&Command::ReadAll),
            Ok(Reply::Sample(ColorSample::new(0, 0, 0, 0)))
        );
    }

    #[test]
    fn test_read_all_aborts_on_failure() {
        let trace = Trace::new();
        // Fails on the third read: red low.
        let mut sensor = driver(loaded_bus(&trace).fail_from(2), &trace);

        assert_eq!(
            sensor.execute(&Command::ReadAll),
            Err(Tcs34725Error::Transaction(MockBusError::NACK))
        );
        assert_eq!(trace.transaction_count(), 3);
    }

    #[test]
    fn test_setters_write_verbatim() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);

        assert_eq!(sensor.execute(&Command::SetGain(Gain(0x03))), Ok(Reply::Done));
        assert_eq!(
            sensor.execute(&Command::SetIntegrationTime(IntegrationTime(0xC0))),
            Ok(Reply::Done)
        );
        // Out-of-range gain bits pass through unchanged.
        assert_eq!(sensor.execute(&Command::SetGain(Gain(0xFF))), Ok(Reply::Done));
        assert_eq!(
            trace.events(),
            std::vec![
                Write { address: 0x8F, value: 0x03 },
                Write { address: 0x81, value: 0xC0 },
                Write { address: 0x8F, value: 0xFF },
            ]
        );
        assert_eq!(sensor.enable_state(), None);
    }

    #[test]
    fn test_set_enable_tracks_state() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);

        sensor.execute(&Command::SetEnable(0x02)).unwrap();
        assert_eq!(sensor.enable_state(), Some(EnableState::Disabled));
        sensor.execute(&Command::SetEnable(0x01)).unwrap();
        assert_eq!(sensor.enable_state(), Some(EnableState::PoweredOn));
        sensor.execute(&Command::SetEnable(0x03)).unwrap();
        assert_eq!(sensor.enable_state(), Some(EnableState::PoweredAndAcquiring));
        assert_eq!(sensor.last_enable_write(), Some(0x03));
    }

    #[test]
    fn test_get_status_reads_enable() {
        let trace = Trace::new();
        let mut bus = MockBus::new(trace.clone());
        bus.set_register(Register::Enable, 0x03);
        let mut sensor = driver(bus, &trace);

        assert_eq!(sensor.execute(&Command::GetStatus), Ok(Reply::Status(0x03)));
        assert_eq!(trace.events(), std::vec![Read { address: 0x80 }]);
    }

    #[test]
    fn test_get_status_after_set_enable() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);

        sensor.execute(&Command::SetEnable(0x01)).unwrap();
        assert_eq!(sensor.execute(&Command::GetStatus), Ok(Reply::Status(0x01)));
    }

    #[test]
    fn test_reset_keeps_gain_and_atime() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);

        sensor.execute(&Command::Reset).unwrap();
        assert!(trace
            .transactions()
            .iter()
            .all(|e| matches!(e, Write { address: 0x80, .. })));
        assert_eq!(trace.transaction_count(), 3);
    }

    #[test]
    fn test_initialize_then_read() {
        let trace = Trace::new();
        let mut sensor = driver(loaded_bus(&trace), &trace);

        sensor.execute(&Command::Initialize).unwrap();
        let events = trace.events();
        assert_eq!(events.last(), Some(&Delay { ms: 5000 }));
        assert_eq!(sensor.enable_state(), Some(EnableState::PoweredAndAcquiring));

        let reply = sensor.execute(&Command::ReadAll).unwrap();
        assert_eq!(
            reply,
            Reply::Sample(ColorSample::new(0x0102, 0x0304, 0x0506, 0x0708))
        );
    }

    #[test]
    fn test_release_returns_bus() {
        let trace = Trace::new();
        let mut sensor = driver(MockBus::new(trace.clone()), &trace);
        sensor.set_gain(Gain(0x02)).unwrap();

        let (bus, _delay) = sensor.release();
        assert_eq!(bus.release().register(Register::Control), 0x02);
    }
}
