use std::convert::TryFrom;
use wasm_ast::syntax::types::{FuncType, ValType};

#[test]
fn value_type_bytes() {
	assert_eq!(ValType::try_from(0x7F), Ok(ValType::I32));
	assert_eq!(ValType::try_from(0x7E), Ok(ValType::I64));
	assert_eq!(ValType::try_from(0x7D), Ok(ValType::F32));
	assert_eq!(ValType::try_from(0x7C), Ok(ValType::F64));
	assert!(ValType::try_from(0x7B).is_err());
	assert!(ValType::try_from(0x40).is_err());
}

#[test]
fn function_signatures() {
	let unary = FuncType { params: vec![ValType::I32], results: vec![] };
	assert_eq!(unary, FuncType { params: vec![ValType::I32], results: vec![] });

	// Signatures are structural: any difference in either list distinguishes.
	assert_ne!(unary, FuncType { params: vec![ValType::I64], results: vec![] });
	assert_ne!(unary, FuncType { params: vec![ValType::I32], results: vec![ValType::I32] });
}
