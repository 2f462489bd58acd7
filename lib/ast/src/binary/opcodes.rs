/// Category and decode shape of an opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
	/// Unreachable, nop, return; no immediates.
	Ctrl,
	Block,
	Loop,
	If,
	/// Terminator of an if's then-branch; never a standalone node.
	Else,
	/// Terminator of every instruction sequence; never a standalone node.
	End,
	Br,
	BrIf,
	BrTable,
	Call,
	CallIndirect,
	/// Drop, select; no immediates.
	Parametric,
	/// Local/global get/set/tee; one index.
	Variable,
	/// Loads and stores; alignment hint plus byte offset.
	MemAccess,
	/// memory.size, memory.grow; one reserved zero byte.
	MemSizeGrow,
	I32Const,
	I64Const,
	F32Const,
	F64Const,
	/// Comparisons, arithmetic, conversions; no immediates.
	Numeric,
	/// Outside the recognized set; aborts decoding, no resynchronization.
	Invalid,
}

pub fn classify(opcode: u8) -> Class {
	match opcode {
		0x00 | 0x01 | 0x0F => Class::Ctrl,
		0x02 => Class::Block,
		0x03 => Class::Loop,
		0x04 => Class::If,
		0x05 => Class::Else,
		0x0B => Class::End,
		0x0C => Class::Br,
		0x0D => Class::BrIf,
		0x0E => Class::BrTable,
		0x10 => Class::Call,
		0x11 => Class::CallIndirect,
		0x1A | 0x1B => Class::Parametric,
		0x20..=0x24 => Class::Variable,
		0x28..=0x3E => Class::MemAccess,
		0x3F | 0x40 => Class::MemSizeGrow,
		0x41 => Class::I32Const,
		0x42 => Class::I64Const,
		0x43 => Class::F32Const,
		0x44 => Class::F64Const,
		0x45..=0xBF => Class::Numeric,
		_ => Class::Invalid,
	}
}
