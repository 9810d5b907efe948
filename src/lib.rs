#![no_std]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

#[cfg(test)]
extern crate std;

use core::sync::atomic::{AtomicBool, Ordering};

use crate::regs::{GpioRegs, UarteRegs};

pub mod console;
mod fmt;
mod regs;
mod uarte;

pub use uarte::{Config, Uarte};

/// Error returned by [`init`] when initialization fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum InitError {
    /// [`init`] has already been called.
    AlreadyInitialized,
    /// A base address is zero.
    NullAddress,
    /// A base address is not word-aligned.
    BadAlignment,
    /// The configured TXD pin number is 32 or above.
    InvalidPin,
}

/// Error returned by [`Uarte::print`].
///
/// Truncation and unrecognized escape identifiers are deliberately not
/// errors; they are reported through [`PrintReport`] and the prefix that
/// fits is still transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PrintError {
    /// The configured spin limit elapsed before the hardware raised ENDTX.
    TransmitTimeout,
}

/// Outcome of one successful [`Uarte::print`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct PrintReport {
    /// Number of bytes handed to the transmitter.
    pub bytes_sent: usize,
    /// The rendered message exceeded the line buffer and was cut short.
    pub truncated: bool,
    /// An escape used an identifier other than `d`, `x` or `X` and
    /// substituted nothing.
    pub unsupported_format: bool,
}

/// Brings up the UARTE at `uarte_base` and returns the driver instance.
///
/// Must be called exactly once; the instance owns the line buffer and the
/// peripheral for the rest of the program. The bring-up writes are absolute,
/// so a hypothetical re-run would be harmless, but the guard rejects it
/// anyway to keep the register blocks unaliased.
///
/// # Errors
///
/// - [`InitError::AlreadyInitialized`]: called more than once.
/// - [`InitError::NullAddress`]: `uarte_base` or the GPIO base is zero.
/// - [`InitError::BadAlignment`]: a base address is not word-aligned.
/// - [`InitError::InvalidPin`]: the TXD pin number does not fit its port.
pub fn init(uarte_base: usize, config: Config) -> Result<Uarte, InitError> {
    static INITIALIZED: AtomicBool = AtomicBool::new(false);

    if uarte_base == 0 || config.gpio_base == 0 {
        return Err(InitError::NullAddress);
    }
    if !uarte_base.is_multiple_of(align_of::<u32>())
        || !config.gpio_base.is_multiple_of(align_of::<u32>())
    {
        return Err(InitError::BadAlignment);
    }
    if config.txd_pin >= 32 {
        return Err(InitError::InvalidPin);
    }

    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(InitError::AlreadyInitialized);
    }

    // SAFETY: The addresses are validated above and the atomic swap
    // guarantees the register blocks are constructed exactly once, so no
    // aliasing access to the peripherals exists.
    let uarte = unsafe { UarteRegs::new(uarte_base) };
    let gpio = unsafe { GpioRegs::new(config.gpio_base) };

    Ok(Uarte::bring_up(uarte, gpio, &config))
}
