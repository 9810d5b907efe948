//! Typed register blocks for the UARTE peripheral and its GPIO port.
//!
//! Each block is a thin wrapper over a validated base address; every access
//! is a volatile read or write of a word-aligned 32-bit register through an
//! exposed-provenance pointer. Blocks are constructed exactly once, at
//! initialization, and never aliased.

use core::ptr::{with_exposed_provenance, with_exposed_provenance_mut};

// UARTE register offsets.
pub(crate) const TASKS_STARTTX: usize = 0x008;
pub(crate) const TASKS_STOPTX: usize = 0x00C;
pub(crate) const EVENTS_ENDTX: usize = 0x120;
pub(crate) const INTENSET: usize = 0x304;
pub(crate) const INTENCLR: usize = 0x308;
pub(crate) const ENABLE: usize = 0x500;
pub(crate) const PSEL_RTS: usize = 0x508;
pub(crate) const PSEL_TXD: usize = 0x50C;
pub(crate) const PSEL_CTS: usize = 0x510;
pub(crate) const BAUDRATE: usize = 0x524;
pub(crate) const TXD_PTR: usize = 0x544;
pub(crate) const TXD_MAXCNT: usize = 0x548;
pub(crate) const CONFIG: usize = 0x56C;

// GPIO register offsets.
pub(crate) const OUTSET: usize = 0x008;
pub(crate) const PIN_CNF: usize = 0x200;

/// BAUDRATE value for 115200 baud.
pub(crate) const BAUDRATE_115200: u32 = 0x01D6_0000;
/// ENABLE value that turns the UARTE on.
pub(crate) const ENABLE_ENABLED: u32 = 0x8;
/// PSEL value for a disconnected signal.
pub(crate) const PSEL_DISCONNECTED: u32 = 0xFFFF_FFFF;
/// ENDTX bit in INTENSET/INTENCLR.
pub(crate) const INT_ENDTX: u32 = 1 << 8;
/// CONFIG value: no flow control, no parity, one stop bit.
pub(crate) const CONFIG_DEFAULT: u32 = 0;

/// MCU-select bits of PIN_CNF, owned by the secure configuration and
/// preserved across pin bring-up.
pub(crate) const PIN_CNF_MCUSEL_MASK: u32 = 0x7 << 28;
/// PIN_CNF value for the TXD pin: dir=output, input buffer disconnected.
/// PULL, DRIVE and SENSE fields are left at their zero values (no pull,
/// standard drive, sensing disabled).
pub(crate) const PIN_CNF_TXD: u32 = (1 << 0) | (1 << 1);

/// PSEL.TXD value routing the transmit signal to `port`/`pin`.
///
/// Bit 31 (CONNECT) is left clear, which means "connected".
pub(crate) const fn psel_txd_connected(port: u32, pin: u32) -> u32 {
    (port << 5) | (pin & 0x1F)
}

/// The UARTE peripheral register block.
pub(crate) struct UarteRegs {
    base: usize,
}

impl UarteRegs {
    /// # Safety
    ///
    /// `base` must be the word-aligned base address of a UARTE instance, and
    /// no other code may access that instance while this value lives.
    pub(crate) const unsafe fn new(base: usize) -> Self {
        UarteRegs { base }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` guarantees `base` addresses a live register block
        // with exclusive access; all offsets used are word-aligned registers
        // within it.
        unsafe { with_exposed_provenance::<u32>(self.base + offset).read_volatile() }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: As in `read`.
        unsafe { with_exposed_provenance_mut::<u32>(self.base + offset).write_volatile(value) }
    }

    pub(crate) fn set_baudrate(&self, value: u32) {
        self.write(BAUDRATE, value);
    }

    pub(crate) fn set_psel_rts(&self, value: u32) {
        self.write(PSEL_RTS, value);
    }

    pub(crate) fn set_psel_cts(&self, value: u32) {
        self.write(PSEL_CTS, value);
    }

    pub(crate) fn set_psel_txd(&self, value: u32) {
        self.write(PSEL_TXD, value);
    }

    pub(crate) fn set_config(&self, value: u32) {
        self.write(CONFIG, value);
    }

    pub(crate) fn set_enable(&self, value: u32) {
        self.write(ENABLE, value);
    }

    pub(crate) fn set_txd_ptr(&self, value: u32) {
        self.write(TXD_PTR, value);
    }

    pub(crate) fn set_txd_maxcnt(&self, value: u32) {
        self.write(TXD_MAXCNT, value);
    }

    pub(crate) fn clear_endtx(&self) {
        self.write(EVENTS_ENDTX, 0);
    }

    pub(crate) fn endtx(&self) -> bool {
        self.read(EVENTS_ENDTX) != 0
    }

    pub(crate) fn start_tx(&self) {
        self.write(TASKS_STARTTX, 1);
    }

    pub(crate) fn stop_tx(&self) {
        self.write(TASKS_STOPTX, 1);
    }

    pub(crate) fn int_enable(&self, mask: u32) {
        self.write(INTENSET, mask);
    }

    pub(crate) fn int_disable(&self, mask: u32) {
        self.write(INTENCLR, mask);
    }
}

/// The GPIO port register block, used only during pin bring-up.
pub(crate) struct GpioRegs {
    base: usize,
}

impl GpioRegs {
    /// # Safety
    ///
    /// `base` must be the word-aligned base address of a GPIO port, and no
    /// other code may reconfigure the TXD pin while this value lives.
    pub(crate) const unsafe fn new(base: usize) -> Self {
        GpioRegs { base }
    }

    pub(crate) fn outset(&self, mask: u32) {
        // SAFETY: `new` guarantees `base` addresses a live register block.
        unsafe {
            with_exposed_provenance_mut::<u32>(self.base + OUTSET).write_volatile(mask);
        }
    }

    pub(crate) fn pin_cnf(&self, pin: u32) -> u32 {
        // SAFETY: As in `outset`; `pin` is below 32 so the offset stays
        // within the PIN_CNF array.
        unsafe {
            with_exposed_provenance::<u32>(self.base + PIN_CNF + 4 * pin as usize).read_volatile()
        }
    }

    pub(crate) fn set_pin_cnf(&self, pin: u32, value: u32) {
        // SAFETY: As in `pin_cnf`.
        unsafe {
            with_exposed_provenance_mut::<u32>(self.base + PIN_CNF + 4 * pin as usize)
                .write_volatile(value);
        }
    }
}
