// src/common/timing.rs

use core::time::Duration;

// Physical settle and integration times. The sequencer always waits the full
// duration; none of them is configurable.

// === Power sequencing ===

/// Wait after each ENABLE write in the power cycle (oscillator start-up).
pub const POWER_SETTLE: Duration = Duration::from_millis(10);

// === Integration ===

/// Wait at the end of a probe: one full 700 ms integration cycle (ATIME = 0x00).
pub const PROBE_SETTLE: Duration = Duration::from_millis(700);
/// Wait at the end of Initialize before the first valid reading.
pub const INIT_SETTLE: Duration = Duration::from_millis(5000);

// === Polling session ===

/// Default gap between ReadAll polls in a polling session.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Converts a timing constant into the millisecond argument `DelayNs` takes.
/// Saturates instead of wrapping for absurdly long durations.
#[inline]
pub fn as_delay_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
