// src/common/error.rs

use embedded_hal::i2c::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Tcs34725Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// No sensor is bound; nothing was sent on the bus.
    #[error("No sensor bound")]
    NotBound,

    /// Underlying bus failure (NACK, arbitration loss, timeout, absent device).
    /// Passed through untouched from the bus implementation.
    #[error("Bus transaction failed: {0:?}")]
    Transaction(E),

    /// Command code or ioctl request number outside the supported table.
    #[error("Unsupported command code {0:#x}")]
    InvalidOperation(u32),
}

impl<E: core::fmt::Debug> Tcs34725Error<E> {
    /// Short, allocation-free label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Tcs34725Error::NotBound => "not bound",
            Tcs34725Error::Transaction(_) => "transaction",
            Tcs34725Error::InvalidOperation(_) => "invalid operation",
        }
    }

    /// True for bus-level failures the caller may retry as a whole operation.
    pub const fn is_transaction(&self) -> bool {
        matches!(self, Tcs34725Error::Transaction(_))
    }
}

impl<E> Tcs34725Error<E>
where
    E: embedded_hal::i2c::Error,
{
    /// embedded-hal classification of a transaction failure.
    ///
    /// Only classifies; the wrapped error is still the one the bus returned.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Tcs34725Error::Transaction(e) => Some(e.kind()),
            _ => None,
        }
    }
}
