use crate::{
	binary::{
		opcodes::{classify, Class},
		types::blocktype,
		values::{f32, f64, i32, i64, u32, vec},
		PResult,
	},
	error::{BinError, ErrorKind},
	syntax::instructions::{Expr, FuncIdx, GlobalIdx, Instr, LabelIdx, LocalIdx, MemArg, TypeIdx},
};
use alloc::vec::Vec;
use nom::{combinator::map, number::complete::le_u8};

/// Which sentinel opcode ended an instruction sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminator {
	End,
	Else,
}

pub fn instr(input: &[u8]) -> PResult<Instr> {
	let (i, opcode) = le_u8(input)?;
	let ret = match classify(opcode) {
		Class::Ctrl => {
			let instr = match opcode {
				0x00 => Instr::Unreachable,
				0x01 => Instr::Nop,
				0x0F => Instr::Return,
				_ => unreachable!(),
			};
			(i, instr)
		},
		Class::Block | Class::Loop => {
			let (i, typ) = blocktype(i)?;
			let (i, (instrs, _)) = instr_seq(i, false)?;
			let instr = match opcode {
				0x02 => Instr::Block(typ, instrs),
				0x03 => Instr::Loop(typ, instrs),
				_ => unreachable!(),
			};
			(i, instr)
		},
		Class::If => {
			let (i, typ) = blocktype(i)?;
			let (i, (then, term)) = instr_seq(i, true)?;
			match term {
				Terminator::End => (i, Instr::If(typ, then, vec![])),
				Terminator::Else => {
					let (i, (els, _)) = instr_seq(i, false)?;
					(i, Instr::If(typ, then, els))
				},
			}
		},
		Class::Br | Class::BrIf => {
			let (i, l) = labelidx(i)?;
			let instr = match opcode {
				0x0C => Instr::Br(l),
				0x0D => Instr::BrIf(l),
				_ => unreachable!(),
			};
			(i, instr)
		},
		Class::BrTable => {
			let (i, ls) = vec(labelidx)(i)?;
			let (i, ln) = labelidx(i)?;
			(i, Instr::BrTable(ls, ln))
		},
		Class::Call => {
			let (i, x) = funcidx(i)?;
			(i, Instr::Call(x))
		},
		Class::CallIndirect => {
			let (i, x) = typeidx(i)?;
			// The reserved table byte only has to be present; a non-zero
			// value is left for the validation phase to reject.
			let (i, table) = le_u8(i)?;
			(i, Instr::CallIndirect(x, table))
		},
		Class::Parametric => {
			let instr = match opcode {
				0x1A => Instr::Drop,
				0x1B => Instr::Select,
				_ => unreachable!(),
			};
			(i, instr)
		},
		Class::Variable => {
			let (i, x) = u32(i)?;
			let instr = match opcode {
				0x20 => Instr::LocalGet(LocalIdx(x)),
				0x21 => Instr::LocalSet(LocalIdx(x)),
				0x22 => Instr::LocalTee(LocalIdx(x)),
				0x23 => Instr::GlobalGet(GlobalIdx(x)),
				0x24 => Instr::GlobalSet(GlobalIdx(x)),
				_ => unreachable!(),
			};
			(i, instr)
		},
		Class::MemAccess => {
			let (i, m) = memarg(i)?;
			(i, mem_instr(opcode, m))
		},
		Class::MemSizeGrow => {
			let (rem, byte) = le_u8(i)?;
			if byte != 0x00 {
				return BinError::err(i, ErrorKind::MalformedSentinel(byte));
			}
			let instr = match opcode {
				0x3F => Instr::MemorySize,
				0x40 => Instr::MemoryGrow,
				_ => unreachable!(),
			};
			(rem, instr)
		},
		Class::I32Const => {
			let (i, n) = i32(i)?;
			(i, Instr::I32Const(n))
		},
		Class::I64Const => {
			let (i, n) = i64(i)?;
			(i, Instr::I64Const(n))
		},
		Class::F32Const => {
			let (i, z) = f32(i)?;
			(i, Instr::F32Const(z))
		},
		Class::F64Const => {
			let (i, z) = f64(i)?;
			(i, Instr::F64Const(z))
		},
		Class::Numeric => (i, numeric(opcode)),
		Class::Else | Class::End | Class::Invalid => {
			return BinError::err(input, ErrorKind::InvalidOpcode(opcode));
		},
	};
	Ok(ret)
}

/// Decode instructions until a terminator opcode. End always terminates;
/// Else additionally terminates when `in_then` (decoding an if's
/// then-branch). The terminator byte is consumed. Bodies are not
/// length-prefixed, so running out of input before a terminator is a
/// truncation failure, and any invalid opcode aborts the whole run.
pub fn instr_seq(mut i: &[u8], in_then: bool) -> PResult<(Vec<Instr>, Terminator)> {
	let mut instrs = Vec::new();
	loop {
		match i.first() {
			None => return BinError::err(i, ErrorKind::Truncated),
			Some(&0x0B) => return Ok((&i[1..], (instrs, Terminator::End))),
			Some(&0x05) if in_then => return Ok((&i[1..], (instrs, Terminator::Else))),
			Some(_) => {
				let (rem, ins) = instr(i)?;
				i = rem;
				instrs.push(ins);
			},
		}
	}
}

pub fn expr(i: &[u8]) -> PResult<Expr> {
	let (i, (instrs, _)) = instr_seq(i, false)?;
	Ok((i, Expr { instrs }))
}

fn labelidx(i: &[u8]) -> PResult<LabelIdx> {
	map(u32, LabelIdx)(i)
}

fn funcidx(i: &[u8]) -> PResult<FuncIdx> {
	map(u32, FuncIdx)(i)
}

fn typeidx(i: &[u8]) -> PResult<TypeIdx> {
	map(u32, TypeIdx)(i)
}

fn memarg(i: &[u8]) -> PResult<MemArg> {
	let (i, align) = u32(i)?;
	let (i, offset) = u32(i)?;
	Ok((i, MemArg { align, offset }))
}

fn mem_instr(opcode: u8, m: MemArg) -> Instr {
	match opcode {
		0x28 => Instr::I32Load(m),
		0x29 => Instr::I64Load(m),
		0x2A => Instr::F32Load(m),
		0x2B => Instr::F64Load(m),
		0x2C => Instr::I32Load8S(m),
		0x2D => Instr::I32Load8U(m),
		0x2E => Instr::I32Load16S(m),
		0x2F => Instr::I32Load16U(m),
		0x30 => Instr::I64Load8S(m),
		0x31 => Instr::I64Load8U(m),
		0x32 => Instr::I64Load16S(m),
		0x33 => Instr::I64Load16U(m),
		0x34 => Instr::I64Load32S(m),
		0x35 => Instr::I64Load32U(m),
		0x36 => Instr::I32Store(m),
		0x37 => Instr::I64Store(m),
		0x38 => Instr::F32Store(m),
		0x39 => Instr::F64Store(m),
		0x3A => Instr::I32Store8(m),
		0x3B => Instr::I32Store16(m),
		0x3C => Instr::I64Store8(m),
		0x3D => Instr::I64Store16(m),
		0x3E => Instr::I64Store32(m),
		_ => unreachable!(),
	}
}

fn numeric(opcode: u8) -> Instr {
	match opcode {
		0x45 => Instr::I32Eqz,
		0x46 => Instr::I32Eq,
		0x47 => Instr::I32Ne,
		0x48 => Instr::I32LtS,
		0x49 => Instr::I32LtU,
		0x4A => Instr::I32GtS,
		0x4B => Instr::I32GtU,
		0x4C => Instr::I32LeS,
		0x4D => Instr::I32LeU,
		0x4E => Instr::I32GeS,
		0x4F => Instr::I32GeU,
		0x50 => Instr::I64Eqz,
		0x51 => Instr::I64Eq,
		0x52 => Instr::I64Ne,
		0x53 => Instr::I64LtS,
		0x54 => Instr::I64LtU,
		0x55 => Instr::I64GtS,
		0x56 => Instr::I64GtU,
		0x57 => Instr::I64LeS,
		0x58 => Instr::I64LeU,
		0x59 => Instr::I64GeS,
		0x5A => Instr::I64GeU,
		0x5B => Instr::F32Eq,
		0x5C => Instr::F32Ne,
		0x5D => Instr::F32Lt,
		0x5E => Instr::F32Gt,
		0x5F => Instr::F32Le,
		0x60 => Instr::F32Ge,
		0x61 => Instr::F64Eq,
		0x62 => Instr::F64Ne,
		0x63 => Instr::F64Lt,
		0x64 => Instr::F64Gt,
		0x65 => Instr::F64Le,
		0x66 => Instr::F64Ge,
		0x67 => Instr::I32Clz,
		0x68 => Instr::I32Ctz,
		0x69 => Instr::I32Popcnt,
		0x6A => Instr::I32Add,
		0x6B => Instr::I32Sub,
		0x6C => Instr::I32Mul,
		0x6D => Instr::I32DivS,
		0x6E => Instr::I32DivU,
		0x6F => Instr::I32RemS,
		0x70 => Instr::I32RemU,
		0x71 => Instr::I32And,
		0x72 => Instr::I32Or,
		0x73 => Instr::I32Xor,
		0x74 => Instr::I32Shl,
		0x75 => Instr::I32ShrS,
		0x76 => Instr::I32ShrU,
		0x77 => Instr::I32Rotl,
		0x78 => Instr::I32Rotr,
		0x79 => Instr::I64Clz,
		0x7A => Instr::I64Ctz,
		0x7B => Instr::I64Popcnt,
		0x7C => Instr::I64Add,
		0x7D => Instr::I64Sub,
		0x7E => Instr::I64Mul,
		0x7F => Instr::I64DivS,
		0x80 => Instr::I64DivU,
		0x81 => Instr::I64RemS,
		0x82 => Instr::I64RemU,
		0x83 => Instr::I64And,
		0x84 => Instr::I64Or,
		0x85 => Instr::I64Xor,
		0x86 => Instr::I64Shl,
		0x87 => Instr::I64ShrS,
		0x88 => Instr::I64ShrU,
		0x89 => Instr::I64Rotl,
		0x8A => Instr::I64Rotr,
		0x8B => Instr::F32Abs,
		0x8C => Instr::F32Neg,
		0x8D => Instr::F32Ceil,
		0x8E => Instr::F32Floor,
		0x8F => Instr::F32Trunc,
		0x90 => Instr::F32Nearest,
		0x91 => Instr::F32Sqrt,
		0x92 => Instr::F32Add,
		0x93 => Instr::F32Sub,
		0x94 => Instr::F32Mul,
		0x95 => Instr::F32Div,
		0x96 => Instr::F32Min,
		0x97 => Instr::F32Max,
		0x98 => Instr::F32Copysign,
		0x99 => Instr::F64Abs,
		0x9A => Instr::F64Neg,
		0x9B => Instr::F64Ceil,
		0x9C => Instr::F64Floor,
		0x9D => Instr::F64Trunc,
		0x9E => Instr::F64Nearest,
		0x9F => Instr::F64Sqrt,
		0xA0 => Instr::F64Add,
		0xA1 => Instr::F64Sub,
		0xA2 => Instr::F64Mul,
		0xA3 => Instr::F64Div,
		0xA4 => Instr::F64Min,
		0xA5 => Instr::F64Max,
		0xA6 => Instr::F64Copysign,
		0xA7 => Instr::I32WrapI64,
		0xA8 => Instr::I32TruncF32S,
		0xA9 => Instr::I32TruncF32U,
		0xAA => Instr::I32TruncF64S,
		0xAB => Instr::I32TruncF64U,
		0xAC => Instr::I64ExtendI32S,
		0xAD => Instr::I64ExtendI32U,
		0xAE => Instr::I64TruncF32S,
		0xAF => Instr::I64TruncF32U,
		0xB0 => Instr::I64TruncF64S,
		0xB1 => Instr::I64TruncF64U,
		0xB2 => Instr::F32ConvertI32S,
		0xB3 => Instr::F32ConvertI32U,
		0xB4 => Instr::F32ConvertI64S,
		0xB5 => Instr::F32ConvertI64U,
		0xB6 => Instr::F32DemoteF64,
		0xB7 => Instr::F64ConvertI32S,
		0xB8 => Instr::F64ConvertI32U,
		0xB9 => Instr::F64ConvertI64S,
		0xBA => Instr::F64ConvertI64U,
		0xBB => Instr::F64PromoteF32,
		0xBC => Instr::I32ReinterpretF32,
		0xBD => Instr::I64ReinterpretF64,
		0xBE => Instr::F32ReinterpretI32,
		0xBF => Instr::F64ReinterpretI64,
		_ => unreachable!(),
	}
}
