// src/harness.rs

//! Polling session on top of a [`SensorBinding`].
//!
//! Brings the sensor up the way a bench test program would (initialize,
//! optionally reset, apply gain and integration time) and then polls the bulk
//! read at a fixed interval until the bus gives out.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::binding::SensorBinding;
use crate::common::{
    error::Tcs34725Error,
    hal_traits::RegisterBus,
    timing,
    types::{ColorSample, EnableState, Gain, IntegrationTime},
};

/// Setup and pacing of a polling session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Written to CONTROL after initialization.
    pub gain: Gain,
    /// Written to ATIME after initialization.
    pub integration_time: IntegrationTime,
    /// Run a Reset between Initialize and the setters.
    pub reset_after_init: bool,
    /// Sleep after each delivered sample.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            gain: Gain::X1,
            integration_time: IntegrationTime::MAX,
            reset_after_init: true,
            poll_interval: timing::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport<E: core::fmt::Debug> {
    /// Samples handed to the callback.
    pub samples: usize,
    /// False if Initialize itself failed and polling never started.
    pub initialized: bool,
    /// The error that stopped the session.
    pub error: Tcs34725Error<E>,
}

/// Runs a session until a ReadAll fails.
///
/// Initialize failing ends the session immediately. Reset, SetGain and
/// SetIntegrationTime failures are logged and skipped, leaving the sensor
/// on whatever settings it had. Every successful sample goes to `on_sample`,
/// followed by a `poll_interval` sleep on `delay`.
///
/// Never returns while the sensor keeps answering.
pub fn run_session<M, BUS, D, W>(
    binding: &SensorBinding<M, BUS, D>,
    config: &SessionConfig,
    delay: &mut W,
    mut on_sample: impl FnMut(ColorSample),
) -> SessionReport<BUS::Error>
where
    M: RawMutex,
    BUS: RegisterBus,
    D: DelayNs,
    W: DelayNs,
{
    info!("session: initializing");
    if let Err(error) = binding.initialize() {
        warn!("session: initialize failed: {}", error.label());
        return SessionReport {
            samples: 0,
            initialized: false,
            error,
        };
    }

    if config.reset_after_init {
        if let Err(error) = binding.reset() {
            warn!("session: reset failed: {}", error.label());
        }
    }
    if let Err(error) = binding.set_gain(config.gain) {
        warn!("session: set gain failed: {}", error.label());
    }
    if let Err(error) = binding.set_integration_time(config.integration_time) {
        warn!("session: set integration time failed: {}", error.label());
    }

    if !binding.enable_state().is_some_and(EnableState::is_acquiring) {
        warn!("session: polling without the ADC enabled");
    }
    info!("session: polling");
    let poll_ms = timing::as_delay_ms(config.poll_interval);
    let mut samples = 0;
    loop {
        match binding.read_all() {
            Ok(sample) => {
                debug!(
                    "sample c={} r={} g={} b={}",
                    sample.clear,
                    sample.red,
                    sample.green,
                    sample.blue
                );
                on_sample(sample);
                samples += 1;
                delay.delay_ms(poll_ms);
            }
            Err(error) => {
                warn!("session: read failed after {} samples: {}", samples, error.label());
                return SessionReport {
                    samples,
                    initialized: true,
                    error,
                };
            }
        }
    }
}

/// Takes `N` bulk reads, `poll_interval` apart.
///
/// No setup is done; the sensor is expected to be bound and configured. The
/// first failed read discards the batch and returns its error.
pub fn collect_samples<const N: usize, M, BUS, D, W>(
    binding: &SensorBinding<M, BUS, D>,
    poll_interval: Duration,
    delay: &mut W,
) -> Result<heapless::Vec<ColorSample, N>, Tcs34725Error<BUS::Error>>
where
    M: RawMutex,
    BUS: RegisterBus,
    D: DelayNs,
    W: DelayNs,
{
    let poll_ms = timing::as_delay_ms(poll_interval);
    let mut batch = heapless::Vec::new();
    for index in 0..N {
        if index > 0 {
            delay.delay_ms(poll_ms);
        }
        let sample = binding.read_all()?;
        if batch.push(sample).is_err() {
            break;
        }
    }
    Ok(batch)
}
