//! CHIP-8 CPU engine: memory, registers, stack, timers and framebuffer of
//! the 64x32 interpreter, advanced one instruction at a time by
//! [`Processor::step`].

pub mod consts;
pub mod core;
pub mod utils;

pub use crate::core::error::EngineError;
pub use crate::core::instruction::Instruction;
pub use crate::core::processor::{CycleStatus, Processor};
pub use crate::core::rom::Rom;
