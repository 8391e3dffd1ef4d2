use crate::consts;

/// Splits an instruction word into its four nibbles, most significant first.
pub fn nibble_split(word: u16) -> (u8, u8, u8, u8) {
    (
        ((word & 0xF000) >> 12) as u8,
        ((word & 0x0F00) >> 8) as u8,
        ((word & 0x00F0) >> 4) as u8,
        (word & 0x000F) as u8,
    )
}

pub fn word_from_bytes(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Folds any 16-bit address into the 4K address space.
pub fn wrap_addr(addr: u16) -> usize {
    (addr & consts::ADDR_MASK) as usize
}
