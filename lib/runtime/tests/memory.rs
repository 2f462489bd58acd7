use std::{os::raw::c_void, ptr, ptr::NonNull};
use wasm_ast::syntax::types::{Limits, ValType};
use wasm_runtime::{
	error::MemoryError,
	memory::MemInst,
	types::{FType, Val},
};

fn mem(min: u32, max: Option<u32>) -> MemInst {
	let _ = simple_logger::init();
	MemInst::new(&Limits { min, max }).unwrap()
}

#[test]
fn limits() {
	let m = mem(1, Some(3));
	assert_eq!(m.page_count(), 1);
	assert_eq!(m.min(), 1);
	assert_eq!(m.max(), Some(3));
	assert!(m.has_max());
	assert_eq!(m.bound_idx(), 65535);

	let m = mem(0, None);
	assert_eq!(m.page_count(), 0);
	assert!(!m.has_max());
	assert_eq!(m.bound_idx(), 0);
}

#[test]
fn oversized_minimum() {
	// A declared minimum past the reservation is a constructor error, not a
	// panic or a fault.
	let _ = simple_logger::init();
	let err = MemInst::new(&Limits { min: 131073, max: None }).unwrap_err();
	assert!(matches!(err, MemoryError::System(_)));
}

#[test]
fn bounds() {
	let m = mem(1, None);
	assert!(m.check_bounds(0, 65536));
	assert!(m.check_bounds(65535, 1));
	assert!(!m.check_bounds(65535, 2));
	assert!(!m.check_bounds(0, 65537));
	// Zero-length accesses validate the offset alone.
	assert!(m.check_bounds(65536, 0));
	assert!(!m.check_bounds(65537, 0));
	// 32-bit offset + 32-bit length can't wrap the check.
	assert!(!m.check_bounds(u32::MAX, u32::MAX));
}

#[test]
fn grow_against_declared_max() {
	let mut m = mem(1, Some(3));
	assert!(m.grow(2));
	assert_eq!(m.page_count(), 3);
	// Over the ceiling: rejected with no state change.
	assert!(!m.grow(1));
	assert_eq!(m.page_count(), 3);
	assert!(m.grow(0));
}

#[test]
fn grow_against_architectural_cap() {
	let mut m = mem(0, None);
	assert!(!m.grow(65537));
	assert_eq!(m.page_count(), 0);

	// A declared max above the cap doesn't raise it.
	let mut m = mem(0, Some(70000));
	assert!(!m.grow(65537));
	assert!(!m.grow(70000));
	assert_eq!(m.page_count(), 0);
}

#[test]
fn grow_preserves_data_and_base() {
	let mut m = mem(1, None);
	m.set_bytes(&[0xAA, 0xBB, 0xCC], 100, 0, 3).unwrap();
	let base = m.get_pointer::<u8>(0, 1).unwrap();

	assert!(m.get_bytes(65536, 4).is_err());
	assert!(m.grow(1));
	assert_eq!(m.page_count(), 2);

	// Old data intact, new pages accessible, base unmoved.
	assert_eq!(m.get_bytes(100, 3).unwrap(), &[0xAA, 0xBB, 0xCC]);
	assert_eq!(m.get_bytes(65536, 4).unwrap(), &[0, 0, 0, 0]);
	m.set_bytes(&[0x11], 2 * 65536 - 1, 0, 1).unwrap();
	assert!(m.get_bytes(2 * 65536 - 1, 2).is_err());
	assert_eq!(m.get_pointer::<u8>(0, 1).unwrap(), base);
}

#[test]
fn byte_ranges() {
	let mut m = mem(1, None);
	m.set_bytes(&[1, 2, 3, 4], 10, 1, 3).unwrap();
	assert_eq!(m.get_bytes(10, 3).unwrap(), &[2, 3, 4]);

	// Zero-length operations still validate bounds.
	assert!(m.get_bytes(65536, 0).is_ok());
	assert!(m.get_bytes(65537, 0).is_err());
	m.set_bytes(&[], 0, 0, 0).unwrap();

	// The source range is validated independently of the destination.
	let err = m.set_bytes(&[1, 2], 0, 1, 2).unwrap_err();
	assert!(matches!(err, MemoryError::OutOfBounds { offset: 1, length: 2, bound: 1 }));
	assert!(m.set_bytes(&[1, 2], 0, 2, 0).is_err());

	// Destination failure reports the committed boundary.
	let err = m.set_bytes(&[1, 2], 65535, 0, 2).unwrap_err();
	assert!(matches!(err, MemoryError::OutOfBounds { bound: 65535, .. }));
}

#[test]
fn arrays_and_reversal() {
	let mut m = mem(1, None);
	m.set_array(&[1, 2, 3, 4], 0, false).unwrap();
	assert_eq!(m.get_bytes(0, 4).unwrap(), &[1, 2, 3, 4]);

	let mut buf = [0; 4];
	m.get_array(&mut buf, 0, false).unwrap();
	assert_eq!(buf, [1, 2, 3, 4]);
	m.get_array(&mut buf, 0, true).unwrap();
	assert_eq!(buf, [4, 3, 2, 1]);

	m.set_array(&[1, 2, 3, 4], 4, true).unwrap();
	assert_eq!(m.get_bytes(4, 4).unwrap(), &[4, 3, 2, 1]);

	let mut buf = [0; 4];
	assert!(m.get_array(&mut buf, 65533, false).is_err());
	m.get_array(&mut [], 65536, false).unwrap();
}

#[test]
fn typed_round_trips() {
	let mut m = mem(1, None);

	m.store_value(0xDEAD_BEEFu32, 0, 4).unwrap();
	assert_eq!(m.load_value::<u32>(0, 4).unwrap(), 0xDEAD_BEEF);

	m.store_value(-123456i32, 5, 4).unwrap();
	assert_eq!(m.load_value::<i32>(5, 4).unwrap(), -123456);

	m.store_value(-112233445566i64, 9, 8).unwrap();
	assert_eq!(m.load_value::<i64>(9, 8).unwrap(), -112233445566);

	m.store_value(u64::MAX, 17, 8).unwrap();
	assert_eq!(m.load_value::<u64>(17, 8).unwrap(), u64::MAX);

	m.store_value(-3.25f32, 25, 4).unwrap();
	assert_eq!(m.load_value::<f32>(25, 4).unwrap(), -3.25);

	m.store_value(3.141592653589793f64, 29, 8).unwrap();
	assert_eq!(m.load_value::<f64>(29, 8).unwrap(), 3.141592653589793);
}

#[test]
fn narrow_integer_extension() {
	let mut m = mem(1, None);

	// 0x80 loaded as one signed byte is -128; unsigned, 128.
	m.store_value(0x80u32, 0, 1).unwrap();
	assert_eq!(m.load_value::<i32>(0, 1).unwrap(), -128);
	assert_eq!(m.load_value::<u32>(0, 1).unwrap(), 128);
	assert_eq!(m.load_value::<i64>(0, 1).unwrap(), -128);

	// A clear high bit in the widest loaded byte zero-extends.
	m.store_value(0x0080u32, 4, 2).unwrap();
	assert_eq!(m.load_value::<i32>(4, 2).unwrap(), 128);

	// Wrap-around store: only the low bytes are written.
	m.store_value(-1i64, 8, 4).unwrap();
	assert_eq!(m.get_bytes(8, 5).unwrap(), &[0xFF, 0xFF, 0xFF, 0xFF, 0x00]);
}

#[test]
fn typed_length_checks() {
	let mut m = mem(1, None);

	// Length above the type's width.
	assert!(m.load_value::<u32>(0, 5).is_err());
	assert!(m.store_value(0u32, 0, 5).is_err());

	// Floats take no narrowing.
	assert!(m.load_value::<f32>(0, 2).is_err());
	assert!(m.store_value(1.0f32, 0, 2).is_err());

	// Committed-bounds failures.
	assert!(m.load_value::<u32>(65533, 4).is_err());
	assert!(m.store_value(0u32, 65533, 4).is_err());
	assert!(m.load_value::<u32>(65532, 4).is_ok());
}

#[test]
fn pointers() {
	let m = mem(1, None);

	let base = m.get_pointer::<u8>(0, 1).unwrap();
	let at_16 = m.get_pointer::<u8>(16, 1).unwrap();
	assert_eq!(at_16.as_ptr() as usize - base.as_ptr() as usize, 16);

	// Count is scaled by the element width.
	assert!(m.get_pointer::<u32>(65532, 1).is_some());
	assert!(m.get_pointer::<u32>(65533, 1).is_none());
	assert!(m.get_pointer::<u8>(0, 65537).is_none());

	// Offset 0 is the "no pointer" sentinel.
	assert!(m.get_pointer_or_null::<u8>(0).is_none());
	assert!(m.get_pointer_or_null::<u8>(8).is_some());
	assert!(m.get_pointer_or_null::<u8>(70000).is_none());

	// Writes through a pointer land in the instance's data.
	unsafe { *at_16.as_ptr() = 0x5A };
	assert_eq!(m.get_bytes(16, 1).unwrap(), &[0x5A]);
}

#[test]
fn symbol_binding() {
	let mut m = mem(1, Some(4));
	let mut slot: *mut u8 = ptr::null_mut();
	unsafe { m.set_symbol(NonNull::new(&mut slot).unwrap()) };

	let base = m.get_pointer::<u8>(0, 1).unwrap().as_ptr();
	assert_eq!(slot, base);
	assert!(m.symbol().is_some());

	// Growth never relocates the region, so the slot stays current.
	assert!(m.grow(3));
	assert_eq!(slot, m.get_pointer::<u8>(0, 1).unwrap().as_ptr());
	assert_eq!(slot, base);
}

#[test]
fn instances_are_independent() {
	let mut a = mem(1, None);
	let b = mem(1, None);
	assert_ne!(
		a.get_pointer::<u8>(0, 1).unwrap(),
		b.get_pointer::<u8>(0, 1).unwrap()
	);
	a.set_bytes(&[7], 0, 0, 1).unwrap();
	assert_eq!(b.get_bytes(0, 1).unwrap(), &[0]);
}

unsafe extern "C" fn nop_wrapper(_func: *mut c_void, _args: *const Val, _rets: *mut Val) {}

#[test]
fn function_types() {
	let mut typ = FType::new(vec![ValType::I32, ValType::I64], vec![ValType::F64]);
	assert!(typ.symbol().is_none());
	typ.set_symbol(nop_wrapper);
	assert!(typ.symbol().is_some());

	assert_eq!(Val::from_type(ValType::I64), Val::I64(0));
	assert_eq!(Val::I32(-1).typ(), ValType::I32);
	assert_eq!(Val::I32(5).to_bits(), 5);
	assert_eq!(Val::F32(2.0).to_bits(), (2.0f32).to_bits() as u64);
	assert_eq!(Val::F32(2.0).as_f32(), 2.0);
}
