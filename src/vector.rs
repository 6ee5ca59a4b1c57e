//! A stride-erased growable vector
//!
//! [`Vector`] stores elements of one fixed byte size ("stride") chosen
//! at construction, contiguously in a buffer acquired through an
//! [`Allocator`]. The allocator is threaded into each mutating call
//! rather than stored, so the same vector code serves heap- and
//! arena-backed use; callers must pass the same allocator for the whole
//! life of a vector.
//!
//! Growth policy: capacity doubles from a floor of 8 elements until the
//! requested minimum is met. The fast paths (push / insert / append) do
//! NOT release the superseded buffer — with an arena backing, old
//! buffers simply become garbage reclaimed at reset, and stale pointers
//! may still be read transiently. Only [`Vector::reserve`] releases the
//! prior buffer, since its contract is capacity-only resizing. With a
//! heap backing this means growth via the fast paths leaks unless
//! `reserve` or `free` is used; this asymmetry is deliberate.

use std::fmt;
use std::mem::size_of;
use std::ptr::{self, NonNull};
use std::slice;

use crate::alloc::{AllocError, Allocator};
use crate::error::ContainerError;

/// Growable sequence of fixed-stride elements.
///
/// `len <= cap` always; a buffer exists whenever `cap > 0`; live
/// elements occupy the first `len * stride` bytes of the buffer.
pub struct Vector {
    data: Option<NonNull<u8>>,
    len: usize,
    cap: usize,
    stride: usize,
}

impl Vector {
    /// An empty vector for elements of `stride` bytes.
    ///
    /// Panics if `stride` is zero.
    pub fn new(stride: usize) -> Self {
        assert!(stride > 0, "vector stride must be non-zero");
        Vector {
            data: None,
            len: 0,
            cap: 0,
            stride,
        }
    }

    /// Bulk construction from raw element bytes.
    ///
    /// The buffer is sized exactly to the element count (no headroom).
    /// `bytes.len()` must be a multiple of `stride`; empty input yields
    /// a valid empty vector with no buffer.
    pub fn from_bytes<A: Allocator + ?Sized>(
        mem: &A,
        bytes: &[u8],
        stride: usize,
    ) -> Result<Self, ContainerError> {
        assert!(stride > 0, "vector stride must be non-zero");
        assert!(
            bytes.len() % stride == 0,
            "byte length must be a multiple of stride"
        );
        let count = bytes.len() / stride;
        // SAFETY: the slice covers count * stride readable bytes
        unsafe { Self::from_raw(mem, bytes.as_ptr(), count, stride) }
    }

    /// Bulk construction from a raw source region.
    ///
    /// # Safety
    /// `src` must point to at least `count * stride` readable bytes.
    pub(crate) unsafe fn from_raw<A: Allocator + ?Sized>(
        mem: &A,
        src: *const u8,
        count: usize,
        stride: usize,
    ) -> Result<Self, ContainerError> {
        let mut v = Vector::new(stride);
        if count == 0 {
            return Ok(v);
        }
        let total = count
            .checked_mul(stride)
            .ok_or(ContainerError::FromSliceAlloc)?;
        let data = mem
            .alloc_bytes(total)
            .map_err(|_| ContainerError::FromSliceAlloc)?;
        ptr::copy_nonoverlapping(src, data.as_ptr(), total);
        v.data = Some(data);
        v.len = count;
        v.cap = count;
        Ok(v)
    }

    /// Bytes per element, fixed at construction.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current capacity in elements.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The live content as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        match self.data {
            // SAFETY: the first len * stride bytes are initialized
            Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.len * self.stride) },
            None => &[],
        }
    }

    /// Forget all elements; capacity and buffer are retained.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    /// A buffer must exist and `index` must be within capacity.
    unsafe fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index <= self.cap);
        self.data
            .expect("vector has no buffer")
            .as_ptr()
            .add(index * self.stride)
    }

    /// Grow-to-capacity: ensure room for at least `min_cap` elements.
    ///
    /// Returns the superseded buffer (pointer and byte size) when one
    /// was replaced, so that `reserve` can release it. The fast growth
    /// paths drop the return value on the floor deliberately. On
    /// failure the vector is untouched.
    fn grow<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        min_cap: usize,
    ) -> Result<Option<(NonNull<u8>, usize)>, AllocError> {
        if min_cap <= self.cap {
            return Ok(None);
        }
        let mut new_cap = if self.cap == 0 {
            8
        } else {
            self.cap.checked_mul(2).ok_or(AllocError::BadRequest)?
        };
        if new_cap < min_cap {
            new_cap = min_cap;
        }
        let new_bytes = new_cap
            .checked_mul(self.stride)
            .ok_or(AllocError::BadRequest)?;
        let new_data = mem.alloc_bytes(new_bytes)?;

        let old = self.data.map(|p| (p, self.cap * self.stride));
        if let Some((old_ptr, _)) = old {
            // SAFETY: the new buffer is a fresh allocation at least as
            // large as the live prefix of the old one
            unsafe {
                ptr::copy_nonoverlapping(old_ptr.as_ptr(), new_data.as_ptr(), self.len * self.stride);
            }
        }
        self.data = Some(new_data);
        self.cap = new_cap;
        Ok(old)
    }

    /// Grow and discard any superseded buffer (builder growth path).
    pub(crate) fn grow_for<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        min_cap: usize,
    ) -> Result<(), ContainerError> {
        self.grow(mem, min_cap)
            .map(|_| ())
            .map_err(|_| ContainerError::Grow)
    }

    /// Ensure capacity for `min_cap` elements, releasing the prior
    /// buffer through the allocator.
    ///
    /// On allocation failure the vector is left unchanged.
    pub fn reserve<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        min_cap: usize,
    ) -> Result<(), ContainerError> {
        let old = self.grow(mem, min_cap).map_err(|_| ContainerError::Grow)?;
        if let Some((ptr, bytes)) = old {
            mem.free_bytes(ptr, bytes);
        }
        Ok(())
    }

    /// Copy `stride` bytes from `src` into slot `len` and extend.
    ///
    /// # Safety
    /// `src` must point to at least `stride` readable bytes.
    pub(crate) unsafe fn push_raw<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        src: *const u8,
    ) -> Result<(), ContainerError> {
        if self.len == self.cap {
            self.grow(mem, self.len + 1)
                .map_err(|_| ContainerError::PushGrow)?;
        }
        self.slot_ptr(self.len)
            .copy_from_nonoverlapping(src, self.stride);
        self.len += 1;
        Ok(())
    }

    /// Append one element, growing if at capacity.
    ///
    /// `elem` must be exactly `stride` bytes (panics otherwise). On
    /// growth failure the vector is unchanged.
    pub fn push<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        elem: &[u8],
    ) -> Result<(), ContainerError> {
        assert_eq!(elem.len(), self.stride, "element length must equal stride");
        // SAFETY: just checked that elem covers stride bytes
        unsafe { self.push_raw(mem, elem.as_ptr()) }
    }

    /// Remove the last element, optionally copying it into `out`
    /// (which must be exactly `stride` bytes).
    pub fn pop(&mut self, out: Option<&mut [u8]>) -> Result<(), ContainerError> {
        if self.len == 0 {
            return Err(ContainerError::PopEmpty);
        }
        self.len -= 1;
        if let Some(out) = out {
            assert_eq!(out.len(), self.stride, "output length must equal stride");
            // SAFETY: slot len was live a moment ago and stays within
            // the buffer
            unsafe {
                ptr::copy_nonoverlapping(self.slot_ptr(self.len), out.as_mut_ptr(), self.stride);
            }
        }
        Ok(())
    }

    /// The element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len so the slot is initialized
        unsafe { Some(slice::from_raw_parts(self.slot_ptr(index), self.stride)) }
    }

    /// Mutable access to the element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len so the slot is initialized; &mut self
        // guarantees exclusivity
        unsafe { Some(slice::from_raw_parts_mut(self.slot_ptr(index), self.stride)) }
    }

    /// Insert `elem` at `index`, shifting later elements right.
    ///
    /// `index == len` is equivalent to a push; `index > len` fails with
    /// [`ContainerError::InsertOutOfBounds`] leaving the vector
    /// unchanged.
    pub fn insert<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        index: usize,
        elem: &[u8],
    ) -> Result<(), ContainerError> {
        assert_eq!(elem.len(), self.stride, "element length must equal stride");
        if index > self.len {
            return Err(ContainerError::InsertOutOfBounds);
        }
        if self.len == self.cap {
            self.grow(mem, self.len + 1)
                .map_err(|_| ContainerError::InsertGrow)?;
        }
        // SAFETY: capacity admits len + 1 elements; the shifted region
        // and the written slot stay within the buffer
        unsafe {
            let slot = self.slot_ptr(index);
            ptr::copy(slot, slot.add(self.stride), (self.len - index) * self.stride);
            slot.copy_from_nonoverlapping(elem.as_ptr(), self.stride);
        }
        self.len += 1;
        Ok(())
    }

    /// Copy raw element bytes onto the end (fast growth path).
    ///
    /// `bytes.len()` must be a multiple of `stride`.
    pub fn extend_from_bytes<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        bytes: &[u8],
    ) -> Result<(), ContainerError> {
        assert!(
            bytes.len() % self.stride == 0,
            "byte length must be a multiple of stride"
        );
        let count = bytes.len() / self.stride;
        if count == 0 {
            return Ok(());
        }
        let new_len = self.len + count;
        if new_len > self.cap {
            self.grow(mem, new_len)
                .map_err(|_| ContainerError::AppendGrow)?;
        }
        // SAFETY: capacity admits new_len elements and bytes covers
        // count * stride readable bytes
        unsafe {
            self.slot_ptr(self.len)
                .copy_from_nonoverlapping(bytes.as_ptr(), bytes.len());
        }
        self.len = new_len;
        Ok(())
    }

    /// Copy raw element bytes into spare capacity without growing.
    ///
    /// Fails (without partial writes) if capacity is insufficient.
    /// Used by the formatted-append render pass, which has already
    /// reserved exactly enough room.
    pub(crate) fn extend_within_capacity(&mut self, bytes: &[u8]) -> Result<(), ()> {
        debug_assert_eq!(self.stride, 1);
        let new_len = self.len + bytes.len();
        if new_len > self.cap {
            return Err(());
        }
        if !bytes.is_empty() {
            // SAFETY: new_len <= cap so the copy stays in the buffer
            unsafe {
                self.slot_ptr(self.len)
                    .copy_from_nonoverlapping(bytes.as_ptr(), bytes.len());
            }
        }
        self.len = new_len;
        Ok(())
    }

    /// Append another vector's content after this one's.
    ///
    /// Fails with [`ContainerError::StrideMismatch`] when the stride
    /// values differ; on growth failure the destination is unchanged.
    pub fn append<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        other: &Vector,
    ) -> Result<(), ContainerError> {
        if self.stride != other.stride {
            return Err(ContainerError::StrideMismatch {
                dest: self.stride,
                src: other.stride,
            });
        }
        self.extend_from_bytes(mem, other.as_bytes())
    }

    /// Release the buffer through the allocator and zero the fields.
    ///
    /// The vector returns to its freshly-initialized empty state.
    pub fn free<A: Allocator + ?Sized>(&mut self, mem: &A) {
        if let Some(ptr) = self.data.take() {
            mem.free_bytes(ptr, self.cap * self.stride);
        }
        self.len = 0;
        self.cap = 0;
    }

    /// Iterate over the live elements as stride-sized byte chunks.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.as_bytes().chunks_exact(self.stride)
    }

    /// The first `bytes` bytes of the buffer, regardless of `len`.
    ///
    /// # Safety
    /// Those bytes must have been initialized and `bytes` must not
    /// exceed the buffer size.
    pub(crate) unsafe fn initialized_prefix(&self, bytes: usize) -> &[u8] {
        debug_assert!(bytes <= self.cap * self.stride);
        slice::from_raw_parts(self.slot_ptr(0), bytes)
    }

    /// Typed push: append `value` as raw bytes.
    ///
    /// `size_of::<T>()` must equal the stride (panics otherwise). The
    /// `'static` bound keeps borrowing element types out of the erased
    /// store; use [`Array`](crate::array::Array) for those.
    pub fn push_value<A: Allocator + ?Sized, T: Copy + 'static>(
        &mut self,
        mem: &A,
        value: T,
    ) -> Result<(), ContainerError> {
        assert_eq!(size_of::<T>(), self.stride, "value size must equal stride");
        // SAFETY: value occupies stride readable bytes
        unsafe { self.push_raw(mem, &value as *const T as *const u8) }
    }

    /// Typed pop: remove and return the last element.
    pub fn pop_value<T: Copy + 'static>(&mut self) -> Result<T, ContainerError> {
        assert_eq!(size_of::<T>(), self.stride, "value size must equal stride");
        if self.len == 0 {
            return Err(ContainerError::PopEmpty);
        }
        self.len -= 1;
        // SAFETY: slot len was live a moment ago and holds a T written
        // by a typed push of the same stride
        Ok(unsafe { ptr::read_unaligned(self.slot_ptr(self.len) as *const T) })
    }

    /// Typed read of the element at `index`.
    pub fn get_value<T: Copy + 'static>(&self, index: usize) -> Option<T> {
        assert_eq!(size_of::<T>(), self.stride, "value size must equal stride");
        self.get(index)
            // SAFETY: the slot holds a T written by a typed push of the
            // same stride
            .map(|bytes| unsafe { ptr::read_unaligned(bytes.as_ptr() as *const T) })
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("len", &self.len)
            .field("cap", &self.cap)
            .field("stride", &self.stride)
            .finish()
    }
}
