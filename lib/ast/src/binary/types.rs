use crate::{
	binary::PResult,
	error::{BinError, ErrorKind},
	syntax::types::{BlockType, ValType},
};
use core::convert::TryFrom;
use nom::number::complete::le_u8;

pub fn blocktype(input: &[u8]) -> PResult<BlockType> {
	let (i, byte) = le_u8(input)?;
	let ret = match byte {
		0x40 => BlockType(None),
		_ => match ValType::try_from(byte) {
			Ok(typ) => BlockType(Some(typ)),
			// Not 0x40 and not a value type: unrecognized in this position.
			Err(_) => return BinError::err(input, ErrorKind::InvalidOpcode(byte)),
		},
	};
	Ok((i, ret))
}
