//! The allocator interface and the general-purpose heap allocator
//!
//! Everything in this crate acquires memory through the [`Allocator`]
//! trait so that containers can be backed either by the process heap
//! ([`HeapAllocator`]) or by a linear [`Arena`](crate::arena::Arena).
//! Reallocation is the one genuinely optional capability; allocators
//! that cannot extend in place advertise that via
//! [`Allocator::supports_realloc`] and trap if reallocation is
//! attempted anyway.

use std::alloc::{alloc, alloc_zeroed, dealloc, realloc, Layout};
use std::ptr::NonNull;

/// Alignment of every allocation made through this crate.
pub const ALIGNMENT: usize = 8;

/// Round `size` up to the next multiple of [`ALIGNMENT`], failing on
/// overflow.
pub(crate) fn align_up(size: usize) -> Option<usize> {
    size.checked_add(ALIGNMENT - 1).map(|s| s & !(ALIGNMENT - 1))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// Zero-sized or overflowing request
    BadRequest,
    /// The backing store is exhausted
    OOM,
}

/// Capability interface for acquiring and releasing raw memory.
///
/// All methods take `&self`; implementors that need to advance state on
/// allocation (the arena) use interior mutability. The capability is
/// passed around as a shared borrow, so the implementor must outlive
/// every container it backs.
pub trait Allocator {
    /// Allocate `size` bytes, aligned to [`ALIGNMENT`].
    fn alloc_bytes(&self, size: usize) -> Result<NonNull<u8>, AllocError>;

    /// Allocate `size` bytes and fill them with zeroes.
    fn alloc_bytes_zeroed(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.alloc_bytes(size)?;
        // SAFETY: alloc_bytes returned a live allocation of `size` bytes
        unsafe {
            ptr.as_ptr().write_bytes(0, size);
        }
        Ok(ptr)
    }

    /// Extend or shrink an allocation in place or by moving it.
    ///
    /// `old_size` must be the size originally requested for `ptr`.
    /// Calling this on an allocator for which [`supports_realloc`]
    /// returns false is a contract violation and panics rather than
    /// returning an error.
    ///
    /// [`supports_realloc`]: Allocator::supports_realloc
    fn realloc_bytes(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Whether [`realloc_bytes`](Allocator::realloc_bytes) may be called.
    fn supports_realloc(&self) -> bool;

    /// Release an allocation. `size` must be the size originally
    /// requested for `ptr`. A no-op for bulk-reclaim allocators.
    fn free_bytes(&self, ptr: NonNull<u8>, size: usize);
}

/// Allocator backed by the process heap via `std::alloc`.
///
/// Supports all operations. Exhaustion surfaces as
/// [`AllocError::OOM`], never as an abort.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeapAllocator;

impl HeapAllocator {
    pub fn new() -> Self {
        HeapAllocator
    }

    fn layout(size: usize) -> Result<Layout, AllocError> {
        if size == 0 {
            return Err(AllocError::BadRequest);
        }
        let rounded = align_up(size).ok_or(AllocError::BadRequest)?;
        Layout::from_size_align(rounded, ALIGNMENT).map_err(|_| AllocError::BadRequest)
    }
}

impl Allocator for HeapAllocator {
    fn alloc_bytes(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let layout = Self::layout(size)?;
        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OOM)
    }

    fn alloc_bytes_zeroed(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let layout = Self::layout(size)?;
        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(AllocError::OOM)
    }

    fn realloc_bytes(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let old_layout = Self::layout(old_size)?;
        let new_layout = Self::layout(new_size)?;
        // SAFETY: ptr was allocated through this allocator with
        // old_layout and the new size is non-zero
        let moved = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
        NonNull::new(moved).ok_or(AllocError::OOM)
    }

    fn supports_realloc(&self) -> bool {
        true
    }

    fn free_bytes(&self, ptr: NonNull<u8>, size: usize) {
        if let Ok(layout) = Self::layout(size) {
            // SAFETY: ptr was allocated through this allocator with the
            // same size and therefore the same layout
            unsafe { dealloc(ptr.as_ptr(), layout) }
        }
    }
}
