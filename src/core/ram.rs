use crate::consts;
use crate::utils;

#[derive(Debug)]
pub struct Ram {
    pub buffer: [u8; consts::RAM_BYTES],
}

impl Default for Ram {
    fn default() -> Self {
        Ram {
            buffer: [0; consts::RAM_BYTES],
        }
    }
}

impl Ram {
    pub fn read(&self, addr: u16) -> u8 {
        self.buffer[utils::wrap_addr(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.buffer[utils::wrap_addr(addr)] = value;
    }

    /// Big-endian instruction word at `addr`; both bytes wrap independently.
    pub fn read_word(&self, addr: u16) -> u16 {
        utils::word_from_bytes(self.read(addr), self.read(addr.wrapping_add(1)))
    }
}

/// Row-major 64x32 grid of 0/1 cells plus the "changed since last read" flag.
#[derive(Debug)]
pub struct DisplayBuffer {
    pub buffer: [u8; consts::DISPLAY_CELLS],
    pub changed: bool,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        DisplayBuffer {
            buffer: [0; consts::DISPLAY_CELLS],
            changed: false,
        }
    }
}

impl DisplayBuffer {
    pub fn clear(&mut self) {
        self.buffer = [0; consts::DISPLAY_CELLS];
        self.changed = true;
    }

    /// XORs one cell and returns true when a lit pixel was turned off.
    pub fn flip(&mut self, cell: usize) -> bool {
        let collided = self.buffer[cell] == 1;
        self.buffer[cell] ^= 1;
        collided
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.buffer[y * consts::CHIP8_WIDTH + x]
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct KeyboardBuffer {
    pub buffer: [bool; consts::KEYBOARD_SIZE],
}

impl KeyboardBuffer {
    pub fn is_pressed(&self, key: u8) -> bool {
        self.buffer[(key & 0x0F) as usize]
    }

    /// Highest pressed key index, if any key is held.
    pub fn last_pressed(&self) -> Option<u8> {
        self.buffer.iter().rposition(|&k| k).map(|i| i as u8)
    }
}
