// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Platform support over memory-mapped registers
//!
//! Peripherals are generic over [Register] so the firmware binds them to
//! [Mmio] addresses while tests substitute in-memory registers.

use core::cell::Cell;

use crate::{
    engine::{ByteIo, Driver, EntropySource},
    helpers::words_to_bytes,
};

/// LED register bits
pub const LED_RED: u32 = 1 << 2;
pub const LED_GREEN: u32 = 1 << 1;
pub const LED_BLUE: u32 = 1 << 0;

/// TRNG status ready bit
pub const TRNG_READY: u32 = 1 << 0;

/// Touch sensor event bit
pub const TOUCH_EVENT: u32 = 1 << 0;

/// Touch status polls between LED toggles
pub const FLASH_POLLS: u32 = 100_000;

/// 32-bit device register
pub trait Register {
    fn read(&self) -> u32;

    fn write(&self, value: u32);
}

impl<R: Register> Register for &R {
    fn read(&self) -> u32 {
        R::read(self)
    }

    fn write(&self, value: u32) {
        R::write(self, value)
    }
}

/// In-memory register
impl Register for Cell<u32> {
    fn read(&self) -> u32 {
        self.get()
    }

    fn write(&self, value: u32) {
        self.set(value)
    }
}

/// Volatile memory-mapped register
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Mmio(*mut u32);

impl Mmio {
    /// Bind a register at a fixed address
    ///
    /// # Safety
    /// `addr` must be a valid, aligned device register for the lifetime of
    /// the returned handle.
    pub const unsafe fn new(addr: usize) -> Self {
        Self(addr as *mut u32)
    }
}

impl Register for Mmio {
    fn read(&self) -> u32 {
        // Safety: address validity is a construction precondition
        unsafe { core::ptr::read_volatile(self.0) }
    }

    fn write(&self, value: u32) {
        unsafe { core::ptr::write_volatile(self.0, value) }
    }
}

/// UART byte link
pub struct Uart<R: Register> {
    pub rx_status: R,
    pub rx_data: R,
    pub tx_status: R,
    pub tx_data: R,
}

impl<R: Register> ByteIo for Uart<R> {
    fn read_byte(&mut self) -> u8 {
        while self.rx_status.read() == 0 {}
        self.rx_data.read() as u8
    }

    fn write_byte(&mut self, b: u8) {
        while self.tx_status.read() == 0 {}
        self.tx_data.write(b as u32)
    }
}

/// True random number generator
pub struct Trng<R: Register> {
    pub status: R,
    pub entropy: R,
}

impl<R: Register> EntropySource for Trng<R> {
    fn entropy_word(&mut self) -> u32 {
        while self.status.read() & TRNG_READY == 0 {}
        self.entropy.read()
    }
}

/// Touch sensor, flashing the LED while waiting
pub struct Touch<R: Register> {
    pub status: R,
    pub led: R,
    /// LED colour to flash while waiting
    pub colour: u32,
}

impl<R: Register> Touch<R> {
    /// Block until the sensor is touched
    ///
    /// Stale events are acknowledged before waiting, the LED is restored
    /// on return.
    pub fn wait(&self) {
        let prior = self.led.read();
        let mut polls = 0u32;
        let mut lit = true;

        self.status.write(0);
        self.led.write(self.colour);

        loop {
            if self.status.read() & TOUCH_EVENT != 0 {
                self.status.write(0);
                break;
            }

            polls += 1;
            if polls == FLASH_POLLS {
                lit = !lit;
                self.led.write(if lit { self.colour } else { 0 });
                polls = 0;
            }
        }

        self.led.write(prior);
    }
}

/// Consecutive read-only identity words
pub struct Words<R: Register, const N: usize>(pub [R; N]);

impl<R: Register, const N: usize> Words<R, N> {
    /// Read words as little-endian bytes
    pub fn bytes<const M: usize>(&self) -> [u8; M] {
        let mut w = [0u32; N];
        for (v, r) in w.iter_mut().zip(self.0.iter()) {
            *v = r.read();
        }
        words_to_bytes(&w)
    }
}

/// Device driver over identity registers and the touch sensor
pub struct TkDriver<R: Register> {
    pub cdi: Words<R, 8>,
    pub udi: Words<R, 2>,
    pub touch: Touch<R>,
}

impl<R: Register> Driver for TkDriver<R> {
    fn cdi(&self) -> [u8; 32] {
        self.cdi.bytes()
    }

    fn udi(&self) -> [u8; 8] {
        self.udi.bytes()
    }

    fn wait_for_confirmation(&mut self) {
        #[cfg(feature = "log")]
        log::debug!("waiting for touch");

        self.touch.wait()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, collections::VecDeque, vec::Vec};

    use super::*;

    /// Register returning scripted reads, then the last written value
    #[derive(Default)]
    struct Fake {
        script: RefCell<VecDeque<u32>>,
        value: Cell<u32>,
        writes: RefCell<Vec<u32>>,
    }

    impl Fake {
        fn scripted(reads: &[u32]) -> Self {
            Self {
                script: RefCell::new(reads.iter().copied().collect()),
                ..Default::default()
            }
        }

        fn value(v: u32) -> Self {
            Self {
                value: Cell::new(v),
                ..Default::default()
            }
        }
    }

    impl Register for Fake {
        fn read(&self) -> u32 {
            self.script.borrow_mut().pop_front().unwrap_or(self.value.get())
        }

        fn write(&self, value: u32) {
            self.value.set(value);
            self.writes.borrow_mut().push(value);
        }
    }

    #[test]
    fn uart_waits_for_ready() {
        let mut u = Uart {
            rx_status: Fake::scripted(&[0, 0, 1]),
            rx_data: Fake::value(0x1a5),
            tx_status: Fake::scripted(&[0, 1]),
            tx_data: Fake::default(),
        };

        // Data register truncated to a byte
        assert_eq!(u.read_byte(), 0xa5);
        assert!(u.rx_status.script.borrow().is_empty());

        u.write_byte(0x5a);
        assert_eq!(*u.tx_data.writes.borrow(), [0x5a]);
    }

    #[test]
    fn trng_waits_for_ready() {
        let mut t = Trng {
            status: Fake::scripted(&[0, 0, TRNG_READY]),
            entropy: Fake::value(0xdead_beef),
        };

        assert_eq!(t.entropy_word(), 0xdead_beef);
        assert!(t.status.script.borrow().is_empty());
    }

    #[test]
    fn touch_acknowledges_events() {
        let t = Touch {
            status: Fake::scripted(&[0, 0, TOUCH_EVENT]),
            led: Fake::value(LED_BLUE),
            colour: LED_GREEN,
        };

        t.wait();

        // Stale event cleared, then the confirming event
        assert_eq!(*t.status.writes.borrow(), [0, 0]);
        assert_eq!(*t.led.writes.borrow(), [LED_GREEN, LED_BLUE]);
    }

    #[test]
    fn identity_words() {
        let d = TkDriver {
            cdi: Words([
                Cell::new(0x0403_0201),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0xffee_ddcc),
            ]),
            udi: Words([Cell::new(0x1122_3344), Cell::new(0x5566_7788)]),
            touch: Touch {
                status: Cell::new(0),
                led: Cell::new(0),
                colour: LED_RED,
            },
        };

        let cdi = d.cdi();
        assert_eq!(&cdi[..4], &[1, 2, 3, 4]);
        assert_eq!(&cdi[28..], &[0xcc, 0xdd, 0xee, 0xff]);

        assert_eq!(d.udi(), [0x44, 0x33, 0x22, 0x11, 0x88, 0x77, 0x66, 0x55]);
    }
}
