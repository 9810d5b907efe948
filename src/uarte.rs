//! The UARTE driver instance: pin and peripheral bring-up, blocking
//! formatted transmit, and the ENDTX interrupt toggles.

use crate::fmt::LineBuffer;
use crate::regs::{self, GpioRegs, UarteRegs};
use crate::{PrintError, PrintReport};

/// Board wiring and driver options consumed by [`crate::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Config {
    /// Base address of the GPIO port carrying the TXD pin.
    pub gpio_base: usize,
    /// GPIO port number routed into PSEL.TXD.
    pub txd_port: u32,
    /// Pin number of the TXD line, below 32.
    pub txd_pin: u32,
    /// Maximum number of ENDTX polls before a transfer is abandoned with
    /// [`PrintError::TransmitTimeout`]. `None` polls forever, which is the
    /// behavior the test harness relies on.
    pub tx_spin_limit: Option<u32>,
}

impl Config {
    /// Board wiring with no spin limit.
    pub const fn new(gpio_base: usize, txd_port: u32, txd_pin: u32) -> Self {
        Config {
            gpio_base,
            txd_port,
            txd_pin,
            tx_spin_limit: None,
        }
    }

    /// Caps the ENDTX busy-poll at `limit` iterations.
    pub const fn with_tx_spin_limit(mut self, limit: u32) -> Self {
        self.tx_spin_limit = Some(limit);
        self
    }

    /// Wiring for the nRF5340 application core test harness.
    #[cfg(feature = "nrf5340-app")]
    pub const fn nrf5340_app() -> Self {
        Config::new(0x4084_2500, 0, if cfg!(feature = "ipc") { 25 } else { 20 })
    }

    /// Wiring for the nRF9160 test harness.
    #[cfg(feature = "nrf9160")]
    pub const fn nrf9160() -> Self {
        Config::new(0x4084_2500, 0, if cfg!(feature = "ipc") { 1 } else { 29 })
    }
}

/// A brought-up UARTE transmitter with its owned line buffer.
///
/// There is at most one instance per program execution ([`crate::init`]
/// enforces this), and all operations take `&mut self`: concurrent prints
/// would race on the line buffer and the single peripheral, so exclusivity
/// is pushed into the type. Multi-context callers go through
/// [`crate::console`] instead.
pub struct Uarte {
    regs: UarteRegs,
    line: LineBuffer,
    spin_limit: Option<u32>,
}

impl Uarte {
    /// Configures the TXD pin and the peripheral, consuming the register
    /// blocks. All writes are absolute, so the sequence is idempotent.
    pub(crate) fn bring_up(uarte: UarteRegs, gpio: GpioRegs, config: &Config) -> Self {
        // Drive the pin high before handing it to the peripheral, so the
        // line idles at the UART rest level.
        gpio.outset(1 << config.txd_pin);

        // Rewrite PIN_CNF, preserving only the MCU-select bits.
        let cnf = gpio.pin_cnf(config.txd_pin) & regs::PIN_CNF_MCUSEL_MASK;
        gpio.set_pin_cnf(config.txd_pin, cnf | regs::PIN_CNF_TXD);

        uarte.set_baudrate(regs::BAUDRATE_115200);
        uarte.set_psel_rts(regs::PSEL_DISCONNECTED);
        uarte.set_psel_cts(regs::PSEL_DISCONNECTED);
        uarte.set_psel_txd(regs::psel_txd_connected(config.txd_port, config.txd_pin));
        uarte.set_config(regs::CONFIG_DEFAULT);
        uarte.set_enable(regs::ENABLE_ENABLED);

        Uarte {
            regs: uarte,
            line: LineBuffer::new(),
            spin_limit: config.tx_spin_limit,
        }
    }

    /// Formats one message and transmits it, blocking until the hardware
    /// raises ENDTX.
    ///
    /// `template` supports one `%d`/`%x`/`%X` substitution of `arg` and
    /// expands `\n` to `\n\r`. Output beyond 256 bytes is truncated and the
    /// prefix that fits is still sent; truncation and unrecognized escape
    /// identifiers are reported in the [`PrintReport`], not as errors.
    ///
    /// Without a spin limit in [`Config`], hardware that never completes
    /// the transfer blocks this call forever.
    pub fn print(&mut self, template: &str, arg: i32) -> Result<PrintReport, PrintError> {
        let info = self.line.render(template, arg);
        self.transmit()?;
        Ok(PrintReport {
            bytes_sent: self.line.len(),
            truncated: info.truncated,
            unsupported_format: info.unsupported_format,
        })
    }

    fn transmit(&mut self) -> Result<(), PrintError> {
        // EasyDMA reads straight out of the line buffer. The buffer cannot
        // be rewritten before ENDTX: the poll below does not return until
        // the transfer is done, and on timeout the transmitter is stopped.
        self.regs.set_txd_ptr(self.line.as_ptr().expose_provenance() as u32);
        self.regs.set_txd_maxcnt(self.line.len() as u32);

        self.regs.clear_endtx();
        self.regs.start_tx();

        match self.spin_limit {
            None => while !self.regs.endtx() {},
            Some(limit) => {
                let mut spins = 0;
                while !self.regs.endtx() {
                    spins += 1;
                    if spins >= limit {
                        self.regs.stop_tx();
                        return Err(PrintError::TransmitTimeout);
                    }
                }
            }
        }
        Ok(())
    }

    /// Enables the ENDTX interrupt.
    pub fn enable_endtx_interrupt(&mut self) {
        self.regs.int_enable(regs::INT_ENDTX);
    }

    /// Disables the ENDTX interrupt.
    pub fn disable_endtx_interrupt(&mut self) {
        self.regs.int_disable(regs::INT_ENDTX);
    }

    #[cfg(test)]
    pub(crate) fn rendered(&self) -> &[u8] {
        self.line.as_bytes()
    }
}
