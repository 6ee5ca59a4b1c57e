//! Blocks of memory acquired from the OS allocator
//!
//! A [`Block`] is one contiguous buffer obtained upfront from the
//! process heap. The arena reserves exactly one of these and hands out
//! offsets into it.

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

use crate::alloc::{align_up, AllocError, ALIGNMENT};

/// A single buffer from the OS / upstream allocator.
///
/// The requested size is rounded up to [`ALIGNMENT`]; the buffer is
/// released when the block is dropped.
#[derive(Debug, PartialEq)]
pub struct Block {
    /// Pointer to memory
    ptr: NonNull<u8>,
    /// Size of block (rounded)
    size: usize,
}

impl Block {
    pub fn new(size: usize) -> Result<Self, AllocError> {
        if size == 0 {
            return Err(AllocError::BadRequest);
        }
        let rounded = align_up(size).ok_or(AllocError::BadRequest)?;
        Ok(Block {
            ptr: Self::alloc_block(rounded)?,
            size: rounded,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    fn alloc_block(size: usize) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: size is non-zero and a multiple of ALIGNMENT
        unsafe {
            let ptr = alloc(Layout::from_size_align_unchecked(size, ALIGNMENT));
            NonNull::new(ptr).ok_or(AllocError::OOM)
        }
    }

    fn dealloc_block(ptr: NonNull<u8>, size: usize) {
        // SAFETY: layout matches the one used in alloc_block
        unsafe { dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(size, ALIGNMENT)) }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        Self::dealloc_block(self.ptr, self.size);
    }
}
