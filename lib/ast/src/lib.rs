#![no_std]

#[macro_use]
extern crate alloc;
#[macro_use]
extern crate log;

pub mod binary;
pub mod error;
pub mod syntax;

pub use binary::decode;
pub use error::DecodeError;
pub use syntax::instructions::{Expr, Instr};
