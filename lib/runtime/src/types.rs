use std::os::raw::c_void;
use wasm_ast::syntax::types::ValType;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Val {
	I32(i32),
	I64(i64),
	F32(f32),
	F64(f64),
}
impl Val {
	pub fn from_type(typ: ValType) -> Self {
		match typ {
			ValType::I32 => Val::I32(0),
			ValType::I64 => Val::I64(0),
			ValType::F32 => Val::F32(0.0),
			ValType::F64 => Val::F64(0.0),
		}
	}

	pub fn as_i32(self) -> i32 {
		match self {
			Val::I32(x) => x,
			_ => panic!("not an i32"),
		}
	}

	pub fn as_i64(self) -> i64 {
		match self {
			Val::I64(x) => x,
			_ => panic!("not an i64"),
		}
	}

	pub fn as_f32(self) -> f32 {
		match self {
			Val::F32(x) => x,
			_ => panic!("not an f32"),
		}
	}

	pub fn as_f64(self) -> f64 {
		match self {
			Val::F64(x) => x,
			_ => panic!("not an f64"),
		}
	}

	pub fn to_bits(self) -> u64 {
		match self {
			Val::I32(x) => x as _,
			Val::I64(x) => x as _,
			Val::F32(x) => x.to_bits() as _,
			Val::F64(x) => x.to_bits(),
		}
	}

	pub fn typ(self) -> ValType {
		match self {
			Val::I32(_) => ValType::I32,
			Val::I64(_) => ValType::I64,
			Val::F32(_) => ValType::F32,
			Val::F64(_) => ValType::F64,
		}
	}
}

/// Trampoline for invoking natively compiled code: the callee, its argument
/// array, and the return-value array.
pub type Wrapper = unsafe extern "C" fn(func: *mut c_void, args: *const Val, rets: *mut Val);

/// Function type of a module instance: structural signature plus the
/// optional trampoline bound when the function has a native build.
#[derive(Clone, Debug)]
pub struct FType {
	pub params: Vec<ValType>,
	pub results: Vec<ValType>,
	symbol: Option<Wrapper>,
}
impl FType {
	pub fn new(params: Vec<ValType>, results: Vec<ValType>) -> Self {
		FType { params, results, symbol: None }
	}

	pub fn symbol(&self) -> Option<Wrapper> {
		self.symbol
	}

	pub fn set_symbol(&mut self, symbol: Wrapper) {
		self.symbol = Some(symbol);
	}
}
