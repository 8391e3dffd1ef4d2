use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unknown opcode: {0:#06X}")]
    UnknownOpcode(u16),

    #[error("could not read ROM: {0}")]
    Io(#[from] std::io::Error),
}
