// src/binding/mod.rs

//! Lifecycle and locking around one [`Tcs34725`].
//!
//! A [`SensorBinding`] is either Unbound or holds exactly one driver. Every
//! entry point takes the binding's mutex for its whole duration, Initialize's
//! five-second settle included, so operations on one sensor never interleave
//! on the bus. The lock is scoped to a closure and released on every exit
//! path.
//!
//! The mutex flavour is a type parameter, and it is held for the full
//! command. Pick it with that in mind:
//!
//! - `NoopRawMutex` when the binding lives in one task or context.
//! - `ThreadModeRawMutex` to share it between thread-mode tasks on
//!   Cortex-M. Interrupts keep running; calling from an interrupt panics.
//! - `CriticalSectionRawMutex` masks interrupts (on firmware) or blocks every
//!   other critical section in the process (on hosted `std`) for the whole
//!   command: 5 s for Initialize, 720 ms for `bind`. Only use it where that
//!   is acceptable, such as host-side tests. On hosted builds that share a
//!   sensor between threads, a `std::sync::Mutex<Tcs34725<..>>` around the
//!   bare driver gives the same serialization without a global lock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_hal::delay::DelayNs;

use crate::common::{
    command::{Command, Reply},
    error::Tcs34725Error,
    hal_traits::RegisterBus,
    types::{Channel, ColorSample, EnableState, Gain, IntegrationTime},
};
use crate::driver::Tcs34725;

/// Whether a sensor is attached.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingState {
    Unbound,
    Bound,
}

/// A failed [`SensorBinding::bind`]: the probe error plus the driver, handed
/// back so the caller keeps its bus.
#[derive(Debug)]
pub struct BindError<BUS: RegisterBus, D> {
    pub driver: Tcs34725<BUS, D>,
    pub error: Tcs34725Error<BUS::Error>,
}

/// Shared, serialized access to at most one bound sensor.
pub struct SensorBinding<M: RawMutex, BUS, D> {
    slot: Mutex<M, RefCell<Option<Tcs34725<BUS, D>>>>,
}

impl<M: RawMutex, BUS, D> SensorBinding<M, BUS, D> {
    /// An Unbound binding. `const` so it can live in a `static`.
    pub const fn new() -> Self {
        SensorBinding {
            slot: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<M: RawMutex, BUS, D> Default for SensorBinding<M, BUS, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, BUS, D> SensorBinding<M, BUS, D>
where
    M: RawMutex,
    BUS: RegisterBus,
    D: DelayNs,
{
    // --- Lifecycle ---

    /// Probes the sensor behind `driver` and, on success, makes it the bound
    /// sensor.
    ///
    /// The probe powers the part on and writes 1x gain and 700 ms
    /// integration, then waits one integration cycle. If any step fails the
    /// binding is left as it was and the driver comes back inside the
    /// error. On success a previously bound driver, if any, is returned.
    pub fn bind(
        &self,
        mut driver: Tcs34725<BUS, D>,
    ) -> Result<Option<Tcs34725<BUS, D>>, BindError<BUS, D>> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            match driver.probe() {
                Ok(()) => {
                    info!("sensor bound");
                    Ok(slot.replace(driver))
                }
                Err(error) => {
                    warn!("sensor probe failed: {}", error.label());
                    Err(BindError { driver, error })
                }
            }
        })
    }

    /// Detaches the bound driver. Later operations return `NotBound`.
    pub fn unbind(&self) -> Option<Tcs34725<BUS, D>> {
        self.slot.lock(|slot| {
            let driver = slot.borrow_mut().take();
            if driver.is_some() {
                info!("sensor unbound");
            }
            driver
        })
    }

    pub fn state(&self) -> BindingState {
        self.slot.lock(|slot| match *slot.borrow() {
            Some(_) => BindingState::Bound,
            None => BindingState::Unbound,
        })
    }

    pub fn is_bound(&self) -> bool {
        self.state() == BindingState::Bound
    }

    /// Tracked enable state of the bound sensor. `None` when Unbound or
    /// before any ENABLE write.
    pub fn enable_state(&self) -> Option<EnableState> {
        self.slot
            .lock(|slot| slot.borrow().as_ref().and_then(Tcs34725::enable_state))
    }

    // --- Dispatch ---

    /// Runs `f` on the bound driver with the lock held.
    fn with_driver<R>(
        &self,
        f: impl FnOnce(&mut Tcs34725<BUS, D>) -> Result<R, Tcs34725Error<BUS::Error>>,
    ) -> Result<R, Tcs34725Error<BUS::Error>> {
        self.slot.lock(|slot| match slot.borrow_mut().as_mut() {
            Some(driver) => f(driver),
            None => {
                debug!("rejected: no sensor bound");
                Err(Tcs34725Error::NotBound)
            }
        })
    }

    pub fn dispatch(&self, command: Command) -> Result<Reply, Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| driver.execute(&command))
    }

    /// Decodes a raw command code and dispatches it.
    ///
    /// The bound check comes first. A code outside the table then fails with
    /// `InvalidOperation` without reaching the bus.
    pub fn dispatch_code(&self, code: u32, arg: u8) -> Result<Reply, Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| {
            let command = Command::from_code(code, arg).map_err(|unknown| {
                warn!("rejected command code {}", unknown.0);
                Tcs34725Error::from(unknown)
            })?;
            driver.execute(&command)
        })
    }

    /// Like [`dispatch_code`](Self::dispatch_code) for a full ioctl request
    /// number.
    pub fn dispatch_ioctl(
        &self,
        request: u32,
        arg: u8,
    ) -> Result<Reply, Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| {
            let command = Command::from_ioctl(request, arg).map_err(|unknown| {
                warn!("rejected ioctl request {}", unknown.0);
                Tcs34725Error::from(unknown)
            })?;
            driver.execute(&command)
        })
    }

    // --- Typed entry points ---

    pub fn read_channel(&self, channel: Channel) -> Result<u16, Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| driver.read_channel(channel))
    }

    pub fn read_all(&self) -> Result<ColorSample, Tcs34725Error<BUS::Error>> {
        self.with_driver(Tcs34725::read_all)
    }

    pub fn reset(&self) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.with_driver(Tcs34725::reset)
    }

    pub fn set_gain(&self, gain: Gain) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| driver.set_gain(gain))
    }

    pub fn set_integration_time(
        &self,
        atime: IntegrationTime,
    ) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| driver.set_integration_time(atime))
    }

    pub fn set_enable(&self, value: u8) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.with_driver(|driver| driver.set_enable(value))
    }

    pub fn status(&self) -> Result<u8, Tcs34725Error<BUS::Error>> {
        self.with_driver(Tcs34725::status)
    }

    /// Holds the lock for the full 5 s settle. With `CriticalSectionRawMutex`
    /// that is a 5 s critical section.
    pub fn initialize(&self) -> Result<(), Tcs34725Error<BUS::Error>> {
        self.with_driver(Tcs34725::initialize)
    }
}
