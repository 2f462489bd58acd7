use std::{io, ops::Range, ptr, slice};

/// Contiguous span of virtual address space reserved in a single mmap
/// request. The base address is fixed for the lifetime of the region and
/// nothing here ever remaps or copies it; pages only become accessible
/// through [`Region::permit`], everything else stays access-forbidden so a
/// wild pointer faults instead of corrupting memory.
#[derive(Debug)]
pub struct Region {
	base: ptr::NonNull<u8>,
	len: usize,
}

// Safety: the mapping is owned by the region and carries no thread affinity.
// Shared references only hand out reads of committed pages; all protection
// changes go through `&mut self`.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Region {
	/// Reserve `len` bytes of address space with all access forbidden.
	pub fn reserve(len: usize) -> io::Result<Region> {
		let base = unsafe {
			libc::mmap(
				ptr::null_mut(),
				len,
				libc::PROT_NONE,
				libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
				-1,
				0,
			)
		};
		if base == libc::MAP_FAILED {
			return Err(io::Error::last_os_error());
		}
		match ptr::NonNull::new(base as *mut u8) {
			Some(base) => Ok(Region { base, len }),
			None => Err(io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping")),
		}
	}

	/// Permit reads and writes on `range`, given as byte offsets from the
	/// base. Offsets must be multiples of the system page size and the range
	/// must lie within the reservation.
	pub fn permit(&mut self, range: Range<usize>) -> io::Result<()> {
		if range.end > self.len {
			return Err(io::Error::new(io::ErrorKind::InvalidInput, "range outside the reservation"));
		}
		let ret = unsafe {
			libc::mprotect(
				self.base.as_ptr().add(range.start) as *mut libc::c_void,
				range.end - range.start,
				libc::PROT_READ | libc::PROT_WRITE,
			)
		};
		if ret != 0 {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}

	pub fn base(&self) -> *mut u8 {
		self.base.as_ptr()
	}

	/// View `length` bytes starting at `offset`.
	///
	/// # Safety
	/// The whole range must have been permitted and the caller must not let
	/// the slice outlive the region.
	pub unsafe fn slice(&self, offset: usize, length: usize) -> &[u8] {
		slice::from_raw_parts(self.base.as_ptr().add(offset), length)
	}

	/// Mutable view of `length` bytes starting at `offset`.
	///
	/// # Safety
	/// Same contract as [`Region::slice`].
	pub unsafe fn slice_mut(&mut self, offset: usize, length: usize) -> &mut [u8] {
		slice::from_raw_parts_mut(self.base.as_ptr().add(offset), length)
	}
}

impl Drop for Region {
	fn drop(&mut self) {
		unsafe {
			libc::munmap(self.base.as_ptr() as *mut libc::c_void, self.len);
		}
	}
}
