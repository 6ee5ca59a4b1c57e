//! Linear arena allocation over a single reserved block
//!
//! An [`Arena`] reserves its whole capacity once and then hands out
//! monotonically increasing offsets, each rounded up to
//! [`ALIGNMENT`](crate::alloc::ALIGNMENT). Individual release is not
//! tracked: `free_bytes` is a no-op and the whole region is reclaimed
//! at once by [`Arena::reset`] or teardown. Reallocation is
//! unsupported; attempting it is a programming error and panics.

use std::cell::Cell;
use std::ptr::NonNull;

use crate::alloc::{align_up, AllocError, Allocator};
use crate::block::Block;

/// A linear allocator over one pre-reserved buffer.
///
/// The capability is the arena itself: pass `&arena` wherever an
/// `A: Allocator` is expected. The `used` offset lives in a [`Cell`] so
/// allocation can advance it through a shared borrow.
///
/// Pointers returned before a [`reset`](Arena::reset) are logically
/// invalid afterwards; callers must not retain them across the reset,
/// and containers still backed by the arena must be dropped or rebuilt
/// before new allocations are made.
pub struct Arena {
    block: Option<Block>,
    used: Cell<usize>,
}

impl Arena {
    /// Reserve the backing buffer once, upfront.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Arena {
            block: Some(Block::new(capacity)?),
            used: Cell::new(0),
        })
    }

    /// Total reserved capacity in bytes (zero once destroyed).
    pub fn capacity(&self) -> usize {
        self.block.as_ref().map_or(0, Block::size)
    }

    /// Bytes handed out so far (after rounding).
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Rewind the arena to empty, retaining the buffer.
    ///
    /// Every previously returned pointer becomes dead without notice.
    /// Takes `&mut self` so a reset cannot race an allocation through
    /// an outstanding shared borrow.
    pub fn reset(&mut self) {
        self.used.set(0);
    }

    /// Release the backing buffer entirely.
    ///
    /// Capacity and used drop to zero; further allocation fails with
    /// [`AllocError::BadRequest`] until a fresh arena is created.
    pub fn destroy(&mut self) {
        self.block = None;
        self.used.set(0);
    }
}

impl Allocator for Arena {
    fn alloc_bytes(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        if size == 0 {
            return Err(AllocError::BadRequest);
        }
        let block = self.block.as_ref().ok_or(AllocError::BadRequest)?;
        let rounded = align_up(size).ok_or(AllocError::BadRequest)?;
        let used = self.used.get();
        if rounded > block.size() - used {
            return Err(AllocError::OOM);
        }
        // SAFETY: used + rounded <= block.size() so the offset stays
        // inside the reserved buffer
        let ptr = unsafe { NonNull::new_unchecked(block.as_mut_ptr().add(used)) };
        self.used.set(used + rounded);
        Ok(ptr)
    }

    fn realloc_bytes(
        &self,
        _ptr: NonNull<u8>,
        _old_size: usize,
        _new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        panic!("reallocation is not supported by arena allocators");
    }

    fn supports_realloc(&self) -> bool {
        false
    }

    fn free_bytes(&self, _ptr: NonNull<u8>, _size: usize) {
        // individual release is not tracked; reclaim happens via reset
    }
}

#[cfg(test)]
pub mod tests {

    use super::*;

    #[test]
    pub fn test_sequential_allocations_are_aligned_and_disjoint() {
        let arena = Arena::with_capacity(1024).unwrap();
        let a = arena.alloc_bytes(5).unwrap();
        let b = arena.alloc_bytes(17).unwrap();
        let c = arena.alloc_bytes(8).unwrap();

        for p in [a, b, c] {
            assert_eq!(p.as_ptr() as usize % 8, 0);
        }

        // rounded sizes are 8, 24, 8; regions must not overlap
        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 8);
        assert_eq!(c.as_ptr() as usize - b.as_ptr() as usize, 24);
        assert_eq!(arena.used(), 40);
    }

    #[test]
    pub fn test_exhaustion_leaves_used_unchanged() {
        let arena = Arena::with_capacity(64).unwrap();
        arena.alloc_bytes(48).unwrap();
        let used = arena.used();
        assert_eq!(arena.alloc_bytes(32), Err(AllocError::OOM));
        assert_eq!(arena.used(), used);
        // a fitting request still succeeds afterwards
        arena.alloc_bytes(16).unwrap();
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    pub fn test_reset_reuses_base_region() {
        let mut arena = Arena::with_capacity(128).unwrap();
        let first = arena.alloc_bytes(32).unwrap();
        arena.alloc_bytes(32).unwrap();
        arena.reset();
        assert_eq!(arena.used(), 0);
        let again = arena.alloc_bytes(16).unwrap();
        assert_eq!(first.as_ptr(), again.as_ptr());
    }

    #[test]
    pub fn test_destroy_zeroes_capacity() {
        let mut arena = Arena::with_capacity(128).unwrap();
        arena.alloc_bytes(8).unwrap();
        arena.destroy();
        assert_eq!(arena.capacity(), 0);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.alloc_bytes(8), Err(AllocError::BadRequest));
    }

    #[test]
    pub fn test_free_is_a_no_op() {
        let arena = Arena::with_capacity(64).unwrap();
        let p = arena.alloc_bytes(16).unwrap();
        arena.free_bytes(p, 16);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    #[should_panic(expected = "reallocation is not supported")]
    pub fn test_realloc_traps() {
        let arena = Arena::with_capacity(64).unwrap();
        let p = arena.alloc_bytes(16).unwrap();
        assert!(!arena.supports_realloc());
        let _ = arena.realloc_bytes(p, 16, 32);
    }

    #[test]
    pub fn test_whole_capacity_in_one_request() {
        let arena = Arena::with_capacity(64).unwrap();
        arena.alloc_bytes(64).unwrap();
        assert_eq!(arena.remaining(), 0);
        assert_eq!(arena.alloc_bytes(1), Err(AllocError::OOM));
    }
}
