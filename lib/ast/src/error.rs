use core::fmt;
use nom::{
	error::{ErrorKind as NomKind, ParseError},
	Err,
};

/// What went wrong while decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// Fewer bytes remain than the field requires.
	Truncated,
	/// Byte outside the recognized opcode set in the current context.
	InvalidOpcode(u8),
	/// Varint used more continuation groups than its bit width allows.
	IntegerRepresentationTooLong,
	/// Reserved byte present but not the required constant.
	MalformedSentinel(u8),
	/// Anything nom reports that the cases above don't cover.
	Nom(NomKind),
}
impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ErrorKind::Truncated => write!(f, "unexpected end of input"),
			ErrorKind::InvalidOpcode(op) => write!(f, "invalid opcode {:#04x}", op),
			ErrorKind::IntegerRepresentationTooLong => write!(f, "integer representation too long"),
			ErrorKind::MalformedSentinel(b) => write!(f, "reserved byte must be 0x00, found {:#04x}", b),
			ErrorKind::Nom(kind) => write!(f, "parse error: {:?}", kind),
		}
	}
}

/// Parser-level error: the unconsumed input at the failure point plus the
/// failure kind. Borrowed while parsing; [`DecodeError`] is the owned form
/// handed to callers.
#[derive(Debug, PartialEq)]
pub struct BinError<'a> {
	pub input: &'a [u8],
	pub kind: ErrorKind,
}
impl<'a> BinError<'a> {
	pub fn new(input: &'a [u8], kind: ErrorKind) -> Self {
		BinError { input, kind }
	}

	/// Shorthand for failing a parser at `input`.
	pub fn err<T>(input: &'a [u8], kind: ErrorKind) -> Result<T, Err<Self>> {
		Err(Err::Error(BinError::new(input, kind)))
	}
}
impl<'a> ParseError<&'a [u8]> for BinError<'a> {
	fn from_error_kind(input: &'a [u8], kind: NomKind) -> Self {
		let kind = match kind {
			NomKind::Eof | NomKind::Complete => ErrorKind::Truncated,
			kind => ErrorKind::Nom(kind),
		};
		BinError { input, kind }
	}

	fn append(_input: &'a [u8], _kind: NomKind, other: Self) -> Self {
		other
	}
}

/// Decode failure with the absolute byte offset it occurred at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeError {
	pub kind: ErrorKind,
	pub offset: usize,
}
impl DecodeError {
	/// Convert a parser error into the owned form, turning the unconsumed
	/// remainder into an offset from the start of the buffer.
	pub(crate) fn locate(err: Err<BinError>, total: usize) -> Self {
		match err {
			Err::Error(e) | Err::Failure(e) => DecodeError { kind: e.kind, offset: total - e.input.len() },
			Err::Incomplete(_) => DecodeError { kind: ErrorKind::Truncated, offset: total },
		}
	}
}
impl fmt::Display for DecodeError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} at offset {}", self.kind, self.offset)
	}
}
