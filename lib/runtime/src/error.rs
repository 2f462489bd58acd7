use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
	/// An access or source range falls outside the accessible bytes.
	/// `bound` is the index of the last byte the check allowed.
	#[error("out of bounds memory access: offset {offset} + length {length} exceeds boundary {bound}")]
	OutOfBounds { offset: u32, length: u32, bound: u32 },
	/// The address-space reservation or a protection change failed.
	#[error("memory mapping failed: {0}")]
	System(#[from] io::Error),
}
