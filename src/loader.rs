//! Binary loader: copies a flat file into memory at a fixed linear
//! address. No header is parsed; the caller decides where the bytes land
//! (e.g. 0x7C00 for a boot sector).

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::memory::{Memory, MEMORY_SIZE};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is {size} bytes, which would not fit at linear address 0x{addr:05x}")]
    FileTooLarge { path: String, size: usize, addr: u32 },
}

/// Loads `path` verbatim into `memory` starting at `linear_addr`, rejecting
/// it outright if it would not fit within the 1MB address space. Returns
/// the number of bytes copied.
pub fn load(path: &Path, linear_addr: u32, memory: &mut Memory) -> Result<usize, LoaderError> {
    let bytes = fs::read(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    if linear_addr as usize + bytes.len() > MEMORY_SIZE {
        return Err(LoaderError::FileTooLarge {
            path: path.display().to_string(),
            size: bytes.len(),
            addr: linear_addr,
        });
    }
    memory.load(linear_addr, &bytes);
    Ok(bytes.len())
}
