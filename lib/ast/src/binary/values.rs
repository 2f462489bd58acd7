use crate::{
	binary::PResult,
	error::{BinError, ErrorKind},
};
use alloc::vec::Vec;
use nom::{
	multi::count,
	number::complete::{le_f32, le_f64, le_u8},
};

pub fn u32(mut i: &[u8]) -> PResult<u32> {
	let mut result = 0;
	let mut shift = 0;
	for idx in 0.. {
		let (rem, byte) = le_u8(i)?;
		// A 32-bit varint fits in 5 groups; the unused bits of the final
		// group must be zero.
		if idx == 4 && byte > 0xF {
			return BinError::err(i, ErrorKind::IntegerRepresentationTooLong);
		}
		i = rem;
		let byte = byte as u32;
		result |= (byte & 0x7F) << shift;
		if byte & 0x80 == 0 {
			break;
		}
		shift += 7;
	}
	Ok((i, result))
}

pub fn i32(mut i: &[u8]) -> PResult<i32> {
	let mut result = 0;
	let mut shift = 0;
	for idx in 0.. {
		let (rem, byte) = le_u8(i)?;
		if idx == 4 && (byte & 0x80 != 0 || !valid_signed_end(byte, 4)) {
			return BinError::err(i, ErrorKind::IntegerRepresentationTooLong);
		}
		i = rem;
		let byte = byte as i32;

		result |= (byte & 0x7F) << shift;
		shift += 7;
		if byte & 0x80 == 0 {
			if shift < 32 && byte & 0x40 > 0 {
				result |= !0 << shift;
			}
			break;
		}
	}
	Ok((i, result))
}

pub fn i64(mut i: &[u8]) -> PResult<i64> {
	let mut result = 0;
	let mut shift = 0;
	for idx in 0.. {
		let (rem, byte) = le_u8(i)?;
		if idx == 9 && (byte & 0x80 != 0 || !valid_signed_end(byte, 1)) {
			return BinError::err(i, ErrorKind::IntegerRepresentationTooLong);
		}
		i = rem;
		let byte = byte as i64;

		result |= (byte & 0x7F) << shift;
		shift += 7;
		if byte & 0x80 == 0 {
			if shift < 64 && byte & 0x40 > 0 {
				result |= !0 << shift;
			}
			break;
		}
	}
	Ok((i, result))
}

// The unused bits of a final varint group must all equal the sign bit.
fn valid_signed_end(b: u8, used_bits: i8) -> bool {
	let sign_and_unused = (b << 1) as i8 >> used_bits;
	sign_and_unused == 0 || sign_and_unused == -1
}

/// Raw little-endian IEEE-754 bit pattern, 4 bytes.
pub fn f32(i: &[u8]) -> PResult<f32> {
	le_f32(i)
}

/// Raw little-endian IEEE-754 bit pattern, 8 bytes.
pub fn f64(i: &[u8]) -> PResult<f64> {
	le_f64(i)
}

pub fn vec<'a, B>(parser: impl Fn(&'a [u8]) -> PResult<'a, B>) -> impl Fn(&'a [u8]) -> PResult<'a, Vec<B>> {
	move |i| {
		let (i, size) = u32(i)?;
		count(|i| parser(i), size as _)(i)
	}
}
