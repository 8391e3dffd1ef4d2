use std::fs;
use std::path::Path;

use crate::consts;
use crate::core::error::EngineError;

/// A program image that is known to fit above the interpreter area.
#[derive(Debug, Clone, Default)]
pub struct Rom {
    buffer: Vec<u8>,
}

impl Rom {
    pub fn from_bytes(buffer: Vec<u8>) -> Result<Self, EngineError> {
        check_size(buffer.len())?;
        Ok(Rom { buffer })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let buffer = fs::read(path)?;
        Self::from_bytes(buffer)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

pub(crate) fn check_size(size: usize) -> Result<(), EngineError> {
    if size > consts::MAX_ROM_BYTES {
        return Err(EngineError::RomTooLarge {
            size,
            max: consts::MAX_ROM_BYTES,
        });
    }
    Ok(())
}
