use crate::{error::MemoryError, region::Region};
use std::{convert::TryInto, mem::size_of, ptr::NonNull};
use wasm_ast::syntax::types::Limits;

/// Fixed unit of linear memory growth.
pub const PAGE_SIZE: u64 = 65536;
/// Architectural cap: a 32-bit address space, 65536 pages.
const K4G: u64 = 0x1_0000_0000;
/// Reservation size: twice the cap, so the upper half is a standing guard
/// region and committed pages never border unmapped address space.
const K8G: u64 = 0x2_0000_0000;

/// Sandboxed, growable linear memory of one module instance.
///
/// The whole 8 GiB span is reserved at construction and the base address
/// never changes afterwards; growth only flips protection on the next pages.
/// Compiled and host code may therefore cache the base pointer across grow
/// operations.
#[derive(Debug)]
pub struct MemInst {
	min: u32,
	max: Option<u32>,
	curr: u32,
	region: Region,
	symbol: Option<NonNull<*mut u8>>,
}

// Safety: the region is exclusively owned and `grow` needs `&mut self`, so
// shared references can only read committed pages. The symbol slot's
// lifetime is the binder's responsibility, declared unsafe at the call site.
unsafe impl Send for MemInst {}
unsafe impl Sync for MemInst {}

impl MemInst {
	pub fn new(lim: &Limits) -> Result<MemInst, MemoryError> {
		let mut region = Region::reserve(K8G as usize)?;
		region.permit(0..lim.min as usize * PAGE_SIZE as usize)?;
		Ok(MemInst { min: lim.min, max: lim.max, curr: lim.min, region, symbol: None })
	}

	/// Committed size in pages. Monotonically non-decreasing.
	pub fn page_count(&self) -> u32 {
		self.curr
	}

	pub fn has_max(&self) -> bool {
		self.max.is_some()
	}

	pub fn min(&self) -> u32 {
		self.min
	}

	pub fn max(&self) -> Option<u32> {
		self.max
	}

	/// Whether `[offset, offset + length)` lies within the committed pages.
	/// Computed in 64 bits so no combination of 32-bit offset and length
	/// can wrap.
	pub fn check_bounds(&self, offset: u32, length: u32) -> bool {
		offset as u64 + length as u64 <= self.curr as u64 * PAGE_SIZE
	}

	/// Index of the last accessible byte, 0 when nothing is committed.
	/// Diagnostic companion of [`MemInst::check_bounds`].
	pub fn bound_idx(&self) -> u32 {
		if self.curr > 0 {
			(self.curr as u64 * PAGE_SIZE - 1) as u32
		} else {
			0
		}
	}

	/// Commit `count` more pages. Fails without state change when the new
	/// total would exceed the declared maximum or the architectural cap.
	/// Failure is an ordinary outcome the caller turns into a sentinel
	/// value, not an error.
	pub fn grow(&mut self, count: u32) -> bool {
		let cap = match self.max {
			Some(max) => max.min((K4G / PAGE_SIZE) as u32),
			None => (K4G / PAGE_SIZE) as u32,
		};
		if count as u64 + self.curr as u64 > cap as u64 {
			return false;
		}
		let start = self.curr as usize * PAGE_SIZE as usize;
		let length = count as usize * PAGE_SIZE as usize;
		if self.region.permit(start..start + length).is_err() {
			return false;
		}
		self.curr += count;
		true
	}

	/// Borrow `data[offset..offset + length]`.
	pub fn get_bytes(&self, offset: u32, length: u32) -> Result<&[u8], MemoryError> {
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		Ok(unsafe { self.region.slice(offset as usize, length as usize) })
	}

	/// Replace `data[offset..]` with `slice[start..start + length]`. The
	/// source range is validated against `slice` independently of the
	/// destination check.
	pub fn set_bytes(&mut self, slice: &[u8], offset: u32, start: u32, length: u32) -> Result<(), MemoryError> {
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		if (!slice.is_empty() && start as usize >= slice.len()) || start as u64 + length as u64 > slice.len() as u64 {
			let err = MemoryError::OutOfBounds {
				offset: start,
				length,
				bound: slice.len().saturating_sub(1) as u32,
			};
			error!("{}", err);
			return Err(err);
		}
		if length > 0 {
			let src = &slice[start as usize..start as usize + length as usize];
			unsafe { self.region.slice_mut(offset as usize, length as usize) }.copy_from_slice(src);
		}
		Ok(())
	}

	/// Copy `data[offset..offset + arr.len()]` into `arr`, optionally
	/// reversing byte order for endianness adaptation.
	pub fn get_array(&self, arr: &mut [u8], offset: u32, reverse: bool) -> Result<(), MemoryError> {
		let length = self.arr_len(arr.len(), offset)?;
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		if length > 0 {
			arr.copy_from_slice(unsafe { self.region.slice(offset as usize, length as usize) });
			if reverse {
				arr.reverse();
			}
		}
		Ok(())
	}

	/// Replace `data[offset..offset + arr.len()]` with `arr`, optionally
	/// reversing byte order.
	pub fn set_array(&mut self, arr: &[u8], offset: u32, reverse: bool) -> Result<(), MemoryError> {
		let length = self.arr_len(arr.len(), offset)?;
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		if length > 0 {
			let dst = unsafe { self.region.slice_mut(offset as usize, length as usize) };
			dst.copy_from_slice(arr);
			if reverse {
				dst.reverse();
			}
		}
		Ok(())
	}

	/// Load up to `size_of::<T>()` bytes at `offset` into a value. Integer
	/// types sign- or zero-extend bytes beyond `length`; float types
	/// require the full width and take the bit pattern as is.
	pub fn load_value<T: WasmValue>(&self, offset: u32, length: u32) -> Result<T, MemoryError> {
		if length as usize > size_of::<T>() || (T::IS_FLOAT && (length as usize) < size_of::<T>()) {
			return Err(self.oob(offset, length));
		}
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		let mut bits = 0u64;
		if length > 0 {
			let bytes = unsafe { self.region.slice(offset as usize, length as usize) };
			for (idx, byte) in bytes.iter().enumerate() {
				bits |= (*byte as u64) << (idx * 8);
			}
			if T::SIGNED && bytes[length as usize - 1] & 0x80 != 0 {
				for idx in length as usize..8 {
					bits |= 0xFF << (idx * 8);
				}
			}
		}
		Ok(T::from_bits(bits))
	}

	/// Store the low `length` bytes of a value's little-endian
	/// representation at `offset`. Float types require the full width.
	pub fn store_value<T: WasmValue>(&mut self, value: T, offset: u32, length: u32) -> Result<(), MemoryError> {
		if length as usize > size_of::<T>() || (T::IS_FLOAT && (length as usize) < size_of::<T>()) {
			return Err(self.oob(offset, length));
		}
		if !self.check_bounds(offset, length) {
			return Err(self.oob(offset, length));
		}
		if length > 0 {
			let bits = value.to_bits();
			let dst = unsafe { self.region.slice_mut(offset as usize, length as usize) };
			for (idx, byte) in dst.iter_mut().enumerate() {
				*byte = (bits >> (idx * 8)) as u8;
			}
		}
		Ok(())
	}

	/// Location-stable pointer to `count` values of `T` at `offset`, or
	/// None when the range is out of bounds. Valid as long as the caller
	/// respects the single-owner discipline: no concurrent `grow`.
	pub fn get_pointer<T>(&self, offset: u32, count: u32) -> Option<NonNull<T>> {
		let length = size_of::<T>() as u64 * count as u64;
		if offset as u64 + length > self.curr as u64 * PAGE_SIZE {
			return None;
		}
		NonNull::new(unsafe { self.region.base().add(offset as usize) } as *mut T)
	}

	/// Like [`MemInst::get_pointer`] for a single value, but offset 0 is
	/// the format's "no pointer" sentinel and yields None.
	pub fn get_pointer_or_null<T>(&self, offset: u32) -> Option<NonNull<T>> {
		if offset == 0 {
			return None;
		}
		self.get_pointer(offset, 1)
	}

	/// Attach an external slot that mirrors the region's base address. The
	/// base never moves, so the slot needs no refresh after `grow`.
	///
	/// # Safety
	/// `slot` must stay writable for as long as it remains attached.
	pub unsafe fn set_symbol(&mut self, slot: NonNull<*mut u8>) {
		*slot.as_ptr() = self.region.base();
		self.symbol = Some(slot);
	}

	pub fn symbol(&self) -> Option<NonNull<*mut u8>> {
		self.symbol
	}

	fn arr_len(&self, len: usize, offset: u32) -> Result<u32, MemoryError> {
		len.try_into().map_err(|_| self.oob(offset, u32::MAX))
	}

	fn oob(&self, offset: u32, length: u32) -> MemoryError {
		let err = MemoryError::OutOfBounds { offset, length, bound: self.bound_idx() };
		error!("{}", err);
		err
	}
}

/// Fixed-width numeric types that marshal through linear memory.
pub trait WasmValue: Copy {
	const SIGNED: bool;
	const IS_FLOAT: bool;

	/// Build a value from little-endian bits already extended to 64 bits.
	fn from_bits(bits: u64) -> Self;
	/// The value's bit pattern, sign-extended to 64 bits for integers.
	fn to_bits(self) -> u64;
}

impl WasmValue for u32 {
	const SIGNED: bool = false;
	const IS_FLOAT: bool = false;

	fn from_bits(bits: u64) -> Self {
		bits as u32
	}

	fn to_bits(self) -> u64 {
		self as u64
	}
}

impl WasmValue for i32 {
	const SIGNED: bool = true;
	const IS_FLOAT: bool = false;

	fn from_bits(bits: u64) -> Self {
		bits as i32
	}

	fn to_bits(self) -> u64 {
		self as i64 as u64
	}
}

impl WasmValue for u64 {
	const SIGNED: bool = false;
	const IS_FLOAT: bool = false;

	fn from_bits(bits: u64) -> Self {
		bits
	}

	fn to_bits(self) -> u64 {
		self
	}
}

impl WasmValue for i64 {
	const SIGNED: bool = true;
	const IS_FLOAT: bool = false;

	fn from_bits(bits: u64) -> Self {
		bits as i64
	}

	fn to_bits(self) -> u64 {
		self as u64
	}
}

impl WasmValue for f32 {
	const SIGNED: bool = false;
	const IS_FLOAT: bool = true;

	fn from_bits(bits: u64) -> Self {
		f32::from_bits(bits as u32)
	}

	fn to_bits(self) -> u64 {
		self.to_bits() as u64
	}
}

impl WasmValue for f64 {
	const SIGNED: bool = false;
	const IS_FLOAT: bool = true;

	fn from_bits(bits: u64) -> Self {
		f64::from_bits(bits)
	}

	fn to_bits(self) -> u64 {
		self.to_bits()
	}
}
