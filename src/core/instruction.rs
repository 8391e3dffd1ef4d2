use std::fmt;

use crate::core::error::EngineError;
use crate::utils;

/// A decoded instruction word. Register operands are nibble indices (0x0-0xF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqImm { x: u8, nn: u8 },
    SkipNeImm { x: u8, nn: u8 },
    SkipEqReg { x: u8, y: u8 },
    LoadImm { x: u8, nn: u8 },
    AddImm { x: u8, nn: u8 },
    Move { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddReg { x: u8, y: u8 },
    SubReg { x: u8, y: u8 },
    ShiftRight { x: u8, y: u8 },
    SubNeg { x: u8, y: u8 },
    ShiftLeft { x: u8, y: u8 },
    SkipNeReg { x: u8, y: u8 },
    LoadIndex(u16),
    JumpV0(u16),
    Random { x: u8, nn: u8 },
    Draw { x: u8, y: u8, n: u8 },
    SkipKeyPressed { x: u8 },
    SkipKeyReleased { x: u8 },
    LoadDelay { x: u8 },
    WaitKey { x: u8 },
    SetDelay { x: u8 },
    SetSound { x: u8 },
    AddIndex { x: u8 },
    LoadFont { x: u8 },
    StoreBcd { x: u8 },
    StoreRegs { x: u8 },
    LoadRegs { x: u8 },
}

impl Instruction {
    pub fn decode(word: u16) -> Result<Self, EngineError> {
        let (opcode, x, y, n) = utils::nibble_split(word);
        let nn = (word & 0x00FF) as u8;
        let nnn = word & 0x0FFF;

        let instr = match (opcode, x, y, n) {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Jump(nnn),
            (2, _, _, _) => Instruction::Call(nnn),
            (3, _, _, _) => Instruction::SkipEqImm { x, nn },
            (4, _, _, _) => Instruction::SkipNeImm { x, nn },
            (5, _, _, 0) => Instruction::SkipEqReg { x, y },
            (6, _, _, _) => Instruction::LoadImm { x, nn },
            (7, _, _, _) => Instruction::AddImm { x, nn },
            (8, _, _, 0) => Instruction::Move { x, y },
            (8, _, _, 1) => Instruction::Or { x, y },
            (8, _, _, 2) => Instruction::And { x, y },
            (8, _, _, 3) => Instruction::Xor { x, y },
            (8, _, _, 4) => Instruction::AddReg { x, y },
            (8, _, _, 5) => Instruction::SubReg { x, y },
            (8, _, _, 6) => Instruction::ShiftRight { x, y },
            (8, _, _, 7) => Instruction::SubNeg { x, y },
            (8, _, _, 0xE) => Instruction::ShiftLeft { x, y },
            (9, _, _, 0) => Instruction::SkipNeReg { x, y },
            (0xA, _, _, _) => Instruction::LoadIndex(nnn),
            (0xB, _, _, _) => Instruction::JumpV0(nnn),
            (0xC, _, _, _) => Instruction::Random { x, nn },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 9, 0xE) => Instruction::SkipKeyPressed { x },
            (0xE, _, 0xA, 1) => Instruction::SkipKeyReleased { x },
            (0xF, _, 0, 7) => Instruction::LoadDelay { x },
            (0xF, _, 0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 1, 5) => Instruction::SetDelay { x },
            (0xF, _, 1, 8) => Instruction::SetSound { x },
            (0xF, _, 1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 2, 9) => Instruction::LoadFont { x },
            (0xF, _, 3, 3) => Instruction::StoreBcd { x },
            (0xF, _, 5, 5) => Instruction::StoreRegs { x },
            (0xF, _, 6, 5) => Instruction::LoadRegs { x },
            // 0NNN machine routines and every unlisted secondary field
            (_, _, _, _) => return Err(EngineError::UnknownOpcode(word)),
        };
        Ok(instr)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(nnn) => write!(f, "JP {:#05X}", nnn),
            Instruction::Call(nnn) => write!(f, "CALL {:#05X}", nnn),
            Instruction::SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Instruction::SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Instruction::AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Instruction::Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubReg { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Instruction::SubNeg { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Instruction::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex(nnn) => write!(f, "LD I, {:#05X}", nnn),
            Instruction::JumpV0(nnn) => write!(f, "JP V0, {:#05X}", nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            Instruction::LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
