//! Joypad matrix functions and structures.

use crate::{consts::P1_ADDR, mmu::BusComponent, warnln};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// The eight physical buttons of the Game Boy, pushed into the
/// core by the host input layer as press/release events.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PadKey {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    A,
    B,
}

/// The joypad matrix state, the two select lines written by the CPU
/// into P1 and the edge detector that drives the joypad interrupt.
///
/// Both select lines and the matrix output are active-low, a zero
/// bit means selected/pressed.
pub struct Pad {
    down: bool,
    up: bool,
    left: bool,
    right: bool,
    start: bool,
    select: bool,
    b: bool,
    a: bool,

    /// The raw value of the P1 select bits (bits 4 and 5) as last
    /// written by the CPU, both lines may be active at once.
    selection: u8,

    /// The matrix output bits (3-0) produced by the previous update,
    /// used to detect high to low transitions.
    prev_matrix: u8,

    int_pad: bool,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            down: false,
            up: false,
            left: false,
            right: false,
            start: false,
            select: false,
            b: false,
            a: false,
            selection: 0x30,
            prev_matrix: 0x0f,
            int_pad: false,
        }
    }

    pub fn reset(&mut self) {
        self.down = false;
        self.up = false;
        self.left = false;
        self.right = false;
        self.start = false;
        self.select = false;
        self.b = false;
        self.a = false;
        self.selection = 0x30;
        self.prev_matrix = 0x0f;
        self.int_pad = false;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // 0xFF00 — P1: bits 7-6 always read high, bits 5-4 echo
            // the written select lines, bits 3-0 are the matrix output
            P1_ADDR => 0xc0 | self.selection | self.matrix(),
            _ => {
                warnln!("Reading from unknown Pad location 0x{:04x}", addr);
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            P1_ADDR => {
                self.selection = value & 0x30;
                self.refresh();
            }
            _ => warnln!("Writing to unknown Pad location 0x{:04x}", addr),
        }
    }

    pub fn key_press(&mut self, key: PadKey) {
        self.set_key(key, true);
    }

    pub fn key_lift(&mut self, key: PadKey) {
        self.set_key(key, false);
    }

    #[inline(always)]
    pub fn int_pad(&self) -> bool {
        self.int_pad
    }

    #[inline(always)]
    pub fn set_int_pad(&mut self, value: bool) {
        self.int_pad = value;
    }

    #[inline(always)]
    pub fn ack_pad(&mut self) {
        self.set_int_pad(false);
    }

    /// Computes the active-low matrix output for the currently
    /// selected lines, a key pressed in any selected group clears
    /// the corresponding bit.
    fn matrix(&self) -> u8 {
        let mut value = 0x0f;
        if self.selection & 0x20 == 0x00 {
            if self.start {
                value &= !0x08;
            }
            if self.select {
                value &= !0x04;
            }
            if self.b {
                value &= !0x02;
            }
            if self.a {
                value &= !0x01;
            }
        }
        if self.selection & 0x10 == 0x00 {
            if self.down {
                value &= !0x08;
            }
            if self.up {
                value &= !0x04;
            }
            if self.left {
                value &= !0x02;
            }
            if self.right {
                value &= !0x01;
            }
        }
        value
    }

    fn set_key(&mut self, key: PadKey, pressed: bool) {
        match key {
            PadKey::Up => self.up = pressed,
            PadKey::Down => self.down = pressed,
            PadKey::Left => self.left = pressed,
            PadKey::Right => self.right = pressed,
            PadKey::Start => self.start = pressed,
            PadKey::Select => self.select = pressed,
            PadKey::A => self.a = pressed,
            PadKey::B => self.b = pressed,
        }
        self.refresh();
    }

    /// Re-derives the matrix output and latches the joypad interrupt
    /// on any high to low output transition.
    fn refresh(&mut self) {
        let matrix = self.matrix();
        if self.prev_matrix & !matrix & 0x0f != 0x00 {
            self.int_pad = true;
        }
        self.prev_matrix = matrix;
    }
}

impl BusComponent for Pad {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}
