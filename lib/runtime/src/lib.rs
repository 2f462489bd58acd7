#[macro_use]
extern crate log;

pub mod error;
pub mod memory;
pub mod region;
pub mod types;

pub use error::MemoryError;
pub use memory::{MemInst, PAGE_SIZE};
pub use types::{FType, Val};
