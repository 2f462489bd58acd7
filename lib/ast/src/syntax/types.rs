use alloc::vec::Vec;
use core::convert::TryFrom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValType {
	I32 = 0x7F,
	I64 = 0x7E,
	F32 = 0x7D,
	F64 = 0x7C,
}
impl TryFrom<u8> for ValType {
	type Error = &'static str;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0x7F => Ok(ValType::I32),
			0x7E => Ok(ValType::I64),
			0x7D => Ok(ValType::F32),
			0x7C => Ok(ValType::F64),
			_ => Err("invalid ValType"),
		}
	}
}

/// Type of a block's implicit signature: empty, or a single result. The
/// one-byte encoding can express nothing richer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockType(pub Option<ValType>);

/// Structural function signature, owned by the module's type table.
#[derive(Debug, PartialEq)]
pub struct FuncType {
	pub params: Vec<ValType>,
	pub results: Vec<ValType>,
}

/// Limit descriptor supplied by the module loader: declared minimum page
/// count plus an optional ceiling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
	pub min: u32,
	pub max: Option<u32>,
}
impl Limits {
	pub fn has_max(&self) -> bool {
		self.max.is_some()
	}
}
