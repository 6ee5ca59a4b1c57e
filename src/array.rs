//! A typed facade over the stride-erased vector
//!
//! [`Array<T>`] fixes the stride to `size_of::<T>()` and moves whole
//! values in and out, so most callers never touch element bytes. It is
//! a thin layer: storage, growth and the allocator contract are all
//! [`Vector`]'s. Element types must be `Copy` — the store moves raw
//! bytes and never runs drop glue.

use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr;

use crate::alloc::Allocator;
use crate::error::ContainerError;
use crate::vector::Vector;

pub struct Array<T: Copy> {
    raw: Vector,
    _marker: PhantomData<T>,
}

impl<T: Copy> Default for Array<T> {
    fn default() -> Self {
        Array::new()
    }
}

impl<T: Copy> Array<T> {
    /// An empty array.
    ///
    /// Panics for zero-sized element types, which the byte store cannot
    /// represent.
    pub fn new() -> Self {
        Array {
            raw: Vector::new(size_of::<T>()),
            _marker: PhantomData,
        }
    }

    /// Bulk construction; the buffer is sized exactly to `items`.
    pub fn from_slice<A: Allocator + ?Sized>(
        mem: &A,
        items: &[T],
    ) -> Result<Self, ContainerError> {
        // SAFETY: the slice covers items.len() * size_of::<T>() bytes
        let raw = unsafe {
            Vector::from_raw(mem, items.as_ptr() as *const u8, items.len(), size_of::<T>())
        }?;
        Ok(Array {
            raw,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Add an item at the end.
    pub fn push<A: Allocator + ?Sized>(&mut self, mem: &A, item: T) -> Result<(), ContainerError> {
        // SAFETY: item occupies exactly the vector's stride
        unsafe { self.raw.push_raw(mem, &item as *const T as *const u8) }
    }

    /// Remove and return the final item (if any).
    pub fn pop(&mut self) -> Option<T> {
        let item = self.top()?;
        let _ = self.raw.pop(None);
        Some(item)
    }

    /// The final item, without removing it.
    pub fn top(&self) -> Option<T> {
        if self.raw.is_empty() {
            None
        } else {
            self.get(self.raw.len() - 1)
        }
    }

    /// The item at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T> {
        self.raw
            .get(index)
            // SAFETY: the slot holds a T written by push/from_slice
            .map(|bytes| unsafe { ptr::read_unaligned(bytes.as_ptr() as *const T) })
    }

    /// Overwrite the item at `index`; false when out of bounds.
    pub fn set(&mut self, index: usize, item: T) -> bool {
        match self.raw.get_mut(index) {
            Some(bytes) => {
                // SAFETY: the slot spans exactly size_of::<T>() bytes
                unsafe { ptr::write_unaligned(bytes.as_mut_ptr() as *mut T, item) };
                true
            }
            None => false,
        }
    }

    /// Insert `item` at `index`, shifting later items right.
    pub fn insert<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        index: usize,
        item: T,
    ) -> Result<(), ContainerError> {
        let bytes = {
            // SAFETY: reading item's object representation as bytes for
            // the erased store
            unsafe {
                std::slice::from_raw_parts(&item as *const T as *const u8, size_of::<T>())
            }
        };
        self.raw.insert(mem, index, bytes)
    }

    /// Iterate by value.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.raw
            .iter()
            // SAFETY: every slot holds a T written by push/from_slice
            .map(|bytes| unsafe { ptr::read_unaligned(bytes.as_ptr() as *const T) })
    }

    /// Release the buffer through the allocator.
    pub fn free<A: Allocator + ?Sized>(&mut self, mem: &A) {
        self.raw.free(mem);
    }
}

#[cfg(test)]
pub mod tests {

    use super::*;
    use crate::alloc::HeapAllocator;
    use crate::arena::Arena;

    #[test]
    pub fn test_simple_array_ops() {
        let heap = HeapAllocator::new();
        let mut arr = Array::new();
        for i in 0..128 {
            arr.push(&heap, i).unwrap();
        }
        assert_eq!(arr.len(), 128);

        for _i in 0..64 {
            arr.pop();
        }
        assert_eq!(arr.top(), Some(63));
        arr.free(&heap);
    }

    #[test]
    pub fn test_from_slice_round_trip() {
        let heap = HeapAllocator::new();
        let source = [0i32, 1, 2, 3];
        let mut arr = Array::from_slice(&heap, &source).unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.capacity(), 4);
        for (i, x) in source.iter().enumerate() {
            assert_eq!(arr.get(i), Some(*x));
        }
        assert_eq!(arr.get(4), None);
        arr.free(&heap);
    }

    #[test]
    pub fn test_set_and_iter() {
        let heap = HeapAllocator::new();
        let mut arr = Array::from_slice(&heap, &[1u16, 2, 3]).unwrap();
        assert!(arr.set(1, 9));
        assert!(!arr.set(3, 9));
        let content: Vec<u16> = arr.iter().collect();
        assert_eq!(content, vec![1, 9, 3]);
        arr.free(&heap);
    }

    #[test]
    pub fn test_insert_into_arena_backed_array() {
        let arena = Arena::with_capacity(1024).unwrap();
        let mut arr = Array::new();
        for x in [10i64, 20, 40] {
            arr.push(&arena, x).unwrap();
        }
        arr.insert(&arena, 2, 30).unwrap();
        let content: Vec<i64> = arr.iter().collect();
        assert_eq!(content, vec![10, 20, 30, 40]);
    }

    #[test]
    pub fn test_pop_empty() {
        let mut arr: Array<u8> = Array::new();
        assert_eq!(arr.pop(), None);
    }
}
