// src/mock.rs

//! Recording mocks for tests.
//!
//! [`MockBus`] plays the sensor on an `embedded_hal::i2c::I2c` bus and
//! [`MockDelay`] stands in for the sleep primitive. Both append to one shared
//! [`Trace`], so a test can assert the exact interleaving of register
//! traffic and settle delays an operation produced.

#![cfg(any(test, feature = "std"))]

use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::common::register::Register;

/// One observable bus-side event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Single-byte register read at a wire address.
    Read { address: u8 },
    /// Single-byte register write at a wire address.
    Write { address: u8, value: u8 },
    /// A blocking delay.
    Delay { ms: u32 },
}

impl BusEvent {
    pub fn is_transaction(&self) -> bool {
        !matches!(self, BusEvent::Delay { .. })
    }
}

/// Shared, ordered event log.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<BusEvent>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<BusEvent>> {
        // A panicking test thread must not hide the log from the others.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, event: BusEvent) {
        self.guard().push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<BusEvent> {
        self.guard().clone()
    }

    /// Bus transactions only, delays filtered out.
    pub fn transactions(&self) -> Vec<BusEvent> {
        self.guard()
            .iter()
            .copied()
            .filter(BusEvent::is_transaction)
            .collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.guard().iter().filter(|e| e.is_transaction()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}

/// Error returned by the mock once fault injection kicks in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockBusError(pub ErrorKind);

impl MockBusError {
    pub const NACK: MockBusError =
        MockBusError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
}

impl embedded_hal::i2c::Error for MockBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// A TCS34725 stand-in with a 256-byte register file indexed by wire address.
///
/// Understands exactly the two SMBus shapes the driver uses: a one-byte
/// write followed by a one-byte read (read byte data) and a two-byte write
/// (write byte data). Anything else fails with `ErrorKind::Other`.
#[derive(Debug)]
pub struct MockBus {
    trace: Trace,
    registers: [u8; 256],
    transactions: usize,
    fail_from: Option<usize>,
    yield_between: bool,
}

impl MockBus {
    pub fn new(trace: Trace) -> Self {
        MockBus {
            trace,
            registers: [0; 256],
            transactions: 0,
            fail_from: None,
            yield_between: false,
        }
    }

    /// Preloads a register (command bit applied, like the driver addresses it).
    pub fn set_register(&mut self, register: Register, value: u8) {
        self.registers[register.address() as usize] = value;
    }

    pub fn register(&self, register: Register) -> u8 {
        self.registers[register.address() as usize]
    }

    /// Preloads a channel's low/high pair.
    pub fn set_word(&mut self, low: Register, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.registers[low.address() as usize] = lo;
        self.registers[low.address() as usize + 1] = hi;
    }

    /// Every transaction with ordinal `n` (0-based) or later NACKs, like a
    /// sensor that dropped off the bus. Failed attempts are still traced.
    pub fn fail_from(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    /// Yield the thread after every transaction to widen race windows.
    pub fn yield_between_transactions(mut self) -> Self {
        self.yield_between = true;
        self
    }

    fn next_ordinal_fails(&mut self) -> bool {
        let ordinal = self.transactions;
        self.transactions += 1;
        matches!(self.fail_from, Some(n) if ordinal >= n)
    }
}

impl ErrorType for MockBus {
    type Error = MockBusError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = match operations {
            [Operation::Write(bytes), Operation::Read(buffer)]
                if bytes.len() == 1 && buffer.len() == 1 =>
            {
                let address = bytes[0];
                self.trace.push(BusEvent::Read { address });
                if self.next_ordinal_fails() {
                    Err(MockBusError::NACK)
                } else {
                    buffer[0] = self.registers[address as usize];
                    Ok(())
                }
            }
            [Operation::Write(bytes)] if bytes.len() == 2 => {
                let (address, value) = (bytes[0], bytes[1]);
                self.trace.push(BusEvent::Write { address, value });
                if self.next_ordinal_fails() {
                    Err(MockBusError::NACK)
                } else {
                    self.registers[address as usize] = value;
                    Ok(())
                }
            }
            _ => Err(MockBusError(ErrorKind::Other)),
        };
        if self.yield_between {
            std::thread::yield_now();
        }
        result
    }
}

/// Records delays instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: Trace) -> Self {
        MockDelay { trace }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.push(BusEvent::Delay { ms: ns.div_ceil(1_000_000) });
    }

    fn delay_us(&mut self, us: u32) {
        self.trace.push(BusEvent::Delay { ms: us.div_ceil(1_000) });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace.push(BusEvent::Delay { ms });
    }
}
