//! Optional process-wide console over the single [`Uarte`] instance.
//!
//! The driver itself is single-owner; code that needs to print from several
//! contexts hands the instance to [`install`] and goes through the free
//! functions here instead. Each operation runs inside a critical section,
//! which is the external mutual exclusion the core driver requires of
//! multi-context callers. Note that the whole blocking transfer happens
//! inside that critical section.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::{PrintError, PrintReport, Uarte};

static CONSOLE: Mutex<RefCell<Option<Uarte>>> = Mutex::new(RefCell::new(None));

/// Error returned by the console free functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ConsoleError {
    /// [`install`] has not been called yet.
    NotInstalled,
    /// The transfer did not complete within the configured spin limit.
    TransmitTimeout,
}

impl From<PrintError> for ConsoleError {
    fn from(e: PrintError) -> Self {
        match e {
            PrintError::TransmitTimeout => ConsoleError::TransmitTimeout,
        }
    }
}

/// Hands the driver instance to the console.
pub fn install(uarte: Uarte) {
    critical_section::with(|cs| {
        CONSOLE.borrow(cs).replace(Some(uarte));
    });
}

fn with_console<T>(
    f: impl FnOnce(&mut Uarte) -> Result<T, ConsoleError>,
) -> Result<T, ConsoleError> {
    critical_section::with(|cs| {
        let mut slot = CONSOLE.borrow(cs).borrow_mut();
        let uarte = slot.as_mut().ok_or(ConsoleError::NotInstalled)?;
        f(uarte)
    })
}

/// Formats and transmits one message; see [`Uarte::print`].
pub fn print(template: &str, arg: i32) -> Result<PrintReport, ConsoleError> {
    with_console(|uarte| uarte.print(template, arg).map_err(ConsoleError::from))
}

/// Enables the ENDTX interrupt on the installed instance.
pub fn enable_endtx_interrupt() -> Result<(), ConsoleError> {
    with_console(|uarte| {
        uarte.enable_endtx_interrupt();
        Ok(())
    })
}

/// Disables the ENDTX interrupt on the installed instance.
pub fn disable_endtx_interrupt() -> Result<(), ConsoleError> {
    with_console(|uarte| {
        uarte.disable_endtx_interrupt();
        Ok(())
    })
}
