//! Decoding for resistor-ladder keypads read through a single ADC input.
//!
//! Each key on a ladder keypad grounds the sense line through a different
//! divider, so every key maps to one expected ADC count. The
//! [`table::AnalogKeypad`] owns that mapping and resolves raw samples back to
//! key names. Where the samples come from is abstracted behind
//! [`AnalogSource`], so the table works the same against a real ADC channel
//! (see the `adc` module) or a scripted source in tests.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "stm32f0x1")]
pub mod adc;
pub mod table;

/// Capacity of the key table, enough for a 5x5 pad
pub const MAX_KEYS: usize = 25;

/// Top of the 10-bit conversion range. A reading of 0 or at/above this value
/// means the sense line is parked at a rail, i.e. no key is down, so neither
/// bound can be registered as a key value.
pub const ADC_MAX: u16 = 1023;

/// Validation failures reported by key registration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// The key name was empty
    NameEmpty,
    /// The key value was 0 or at/above `ADC_MAX`
    ForbiddenValue,
    /// Batch registration was given name and value lists of differing length
    NotSameLength,
    /// The table already holds `MAX_KEYS` entries
    SizeExceeded,
}

/// A single analog input that can be sampled on demand
///
/// Implementations must return counts in `0..=ADC_MAX`; the table treats
/// anything at or beyond `ADC_MAX` as a no-key boundary reading.
pub trait AnalogSource {
    fn read(&mut self) -> u16;
}

/// Adapter exposing a closure as an [`AnalogSource`]
///
/// Useful for simulations and tests, where readings come from a script
/// rather than hardware.
pub struct FnSource<F>(pub F);

impl<F> AnalogSource for FnSource<F>
where
    F: FnMut() -> u16,
{
    fn read(&mut self) -> u16 {
        (self.0)()
    }
}
