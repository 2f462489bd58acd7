use crate::{
	error::{BinError, DecodeError, ErrorKind},
	syntax::instructions::Expr,
};
use nom::IResult;

pub mod instructions;
pub mod opcodes;
pub mod types;
pub mod values;

pub type PResult<'a, T> = IResult<&'a [u8], T, BinError<'a>>;

/// Decode a complete expression: an instruction sequence followed by its End
/// opcode, consuming the whole buffer.
pub fn decode(bytes: &[u8]) -> Result<Expr, DecodeError> {
	let err = match instructions::expr(bytes) {
		Ok((rem, expr)) if rem.is_empty() => return Ok(expr),
		// Bytes after the terminating End are not part of any instruction.
		Ok((rem, _)) => DecodeError {
			kind: ErrorKind::InvalidOpcode(rem[0]),
			offset: bytes.len() - rem.len(),
		},
		Err(err) => DecodeError::locate(err, bytes.len()),
	};
	error!("expression decode failed: {}", err);
	Err(err)
}
