//! String views and incremental string building
//!
//! [`StrView`] is an immutable, non-owning window over bytes owned
//! elsewhere — byte-oriented throughout, so embedded zero bytes are
//! ordinary content. [`StrBuf`] is the owning accumulator, a
//! stride-1 [`Vector`] with string-shaped append operations on top.

use std::fmt::{self, Write};

use crate::alloc::Allocator;
use crate::array::Array;
use crate::error::ContainerError;
use crate::vector::Vector;

/// An immutable (pointer, length) window over external bytes.
///
/// Views never outlive their source (enforced by the borrow) and make
/// no aliasing claims beyond what the caller arranges. All matching is
/// byte-exact and case-sensitive.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StrView<'a> {
    bytes: &'a [u8],
}

impl<'a> StrView<'a> {
    /// View over an explicit byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        StrView { bytes }
    }

    /// View over a string's bytes.
    pub fn from_str(s: &'a str) -> Self {
        StrView { bytes: s.as_bytes() }
    }

    /// View over a zero-terminated source: content runs up to the
    /// first zero byte, or the whole slice if none is present.
    pub fn from_terminated(bytes: &'a [u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        StrView {
            bytes: &bytes[..end],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The view as UTF-8 text, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    /// Index of the first occurrence of `needle`.
    ///
    /// An empty needle matches at index 0; a needle longer than the
    /// haystack never matches.
    pub fn find(&self, needle: StrView) -> Option<usize> {
        let n = needle.bytes.len();
        if n == 0 {
            return Some(0);
        }
        if n > self.bytes.len() {
            return None;
        }
        self.bytes.windows(n).position(|w| w == needle.bytes)
    }

    /// Whether `needle` occurs anywhere in the view.
    pub fn contains(&self, needle: StrView) -> bool {
        self.find(needle).is_some()
    }

    pub fn starts_with(&self, prefix: StrView) -> bool {
        self.bytes.starts_with(prefix.bytes)
    }

    pub fn ends_with(&self, suffix: StrView) -> bool {
        self.bytes.ends_with(suffix.bytes)
    }

    /// Drop leading ASCII whitespace, re-borrowing the same bytes.
    pub fn trim_start(&self) -> StrView<'a> {
        let start = self
            .bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(self.bytes.len());
        StrView {
            bytes: &self.bytes[start..],
        }
    }

    /// Drop trailing ASCII whitespace, re-borrowing the same bytes.
    pub fn trim_end(&self) -> StrView<'a> {
        let end = self
            .bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        StrView {
            bytes: &self.bytes[..end],
        }
    }

    pub fn trim(&self) -> StrView<'a> {
        self.trim_start().trim_end()
    }

    /// The sub-view `[start, end)`.
    ///
    /// Range violations are reported, never clamped, and the policy is
    /// the same in debug and release builds.
    pub fn substring(&self, start: usize, end: usize) -> Result<StrView<'a>, ContainerError> {
        if start > end || end > self.bytes.len() {
            return Err(ContainerError::RangeOutOfBounds {
                start,
                end,
                len: self.bytes.len(),
            });
        }
        Ok(StrView {
            bytes: &self.bytes[start..end],
        })
    }

    /// Partition into maximal runs separated by `delim`, appending each
    /// sub-view to `out`.
    ///
    /// Empty runs are preserved: consecutive delimiters and leading or
    /// trailing delimiters all contribute empty views. Fails only if
    /// appending to `out` fails.
    pub fn split<A: Allocator + ?Sized>(
        &self,
        delim: u8,
        mem: &A,
        out: &mut Array<StrView<'a>>,
    ) -> Result<(), ContainerError> {
        let mut start = 0;
        for (i, &b) in self.bytes.iter().enumerate() {
            if b == delim {
                out.push(mem, StrView::new(&self.bytes[start..i]))?;
                start = i + 1;
            }
        }
        out.push(mem, StrView::new(&self.bytes[start..]))
    }
}

impl fmt::Display for StrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.bytes))
    }
}

impl fmt::Debug for StrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrView({:?})", String::from_utf8_lossy(self.bytes))
    }
}

/// Length-only sink for the formatted-append dry run.
#[derive(Default)]
struct LenCounter {
    len: usize,
}

impl Write for LenCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len += s.len();
        Ok(())
    }
}

/// Render pass sink: copies into capacity reserved by the dry run.
struct TailWriter<'v> {
    buf: &'v mut Vector,
}

impl Write for TailWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf
            .extend_within_capacity(s.as_bytes())
            .map_err(|_| fmt::Error)
    }
}

/// An owning, growable byte accumulator for building strings.
///
/// Wraps a stride-1 [`Vector`]; the accumulated content is the first
/// `len` bytes and never includes a terminator unless the builder was
/// consumed by [`StrBuf::build`].
#[derive(Debug)]
pub struct StrBuf {
    bytes: Vector,
}

impl Default for StrBuf {
    fn default() -> Self {
        StrBuf::new()
    }
}

impl StrBuf {
    pub fn new() -> Self {
        StrBuf {
            bytes: Vector::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reset length to zero, keeping capacity. Idempotent.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// View over the current content.
    pub fn view(&self) -> StrView<'_> {
        StrView::new(self.bytes.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }

    pub fn push_byte<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        b: u8,
    ) -> Result<(), ContainerError> {
        self.bytes.push(mem, &[b])
    }

    /// Append raw bytes, growing as needed.
    pub fn append_bytes<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        bytes: &[u8],
    ) -> Result<(), ContainerError> {
        self.bytes.extend_from_bytes(mem, bytes)
    }

    pub fn append_str<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        s: &str,
    ) -> Result<(), ContainerError> {
        self.append_bytes(mem, s.as_bytes())
    }

    pub fn append_view<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        view: StrView,
    ) -> Result<(), ContainerError> {
        self.append_bytes(mem, view.as_bytes())
    }

    /// Append formatted text, e.g.
    /// `sb.append_format(&heap, format_args!("{n} items"))`.
    ///
    /// A dry run counts the exact rendered length first, room for
    /// exactly that many additional bytes is reserved, then the text is
    /// rendered straight into the reserved region. Fails with
    /// [`ContainerError::Format`] if either pass reports an encoding
    /// error, or with the grow error if reservation fails.
    pub fn append_format<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
        args: fmt::Arguments<'_>,
    ) -> Result<(), ContainerError> {
        let mut counter = LenCounter::default();
        fmt::write(&mut counter, args).map_err(|_| ContainerError::Format)?;
        if counter.len == 0 {
            return Ok(());
        }
        self.bytes.grow_for(mem, self.bytes.len() + counter.len)?;
        let mut writer = TailWriter {
            buf: &mut self.bytes,
        };
        fmt::write(&mut writer, args).map_err(|_| ContainerError::Format)
    }

    /// The content plus a trailing zero byte, without extending the
    /// logical length.
    ///
    /// A zero byte is written just past the content (appended then
    /// retracted, so capacity may be bumped as a side effect but `len`
    /// is unchanged). The returned slice is `len + 1` bytes ending in
    /// the terminator and is valid until the next mutating call.
    pub fn as_terminated_bytes<A: Allocator + ?Sized>(
        &mut self,
        mem: &A,
    ) -> Result<&[u8], ContainerError> {
        let len = self.bytes.len();
        self.bytes.push(mem, &[0])?;
        let _ = self.bytes.pop(None);
        // SAFETY: bytes [0, len] were just initialized, terminator
        // included
        Ok(unsafe { self.bytes.initialized_prefix(len + 1) })
    }

    /// Finalize: append a permanent terminator and hand the raw
    /// underlying buffer to the caller.
    ///
    /// The returned vector's length includes the terminator. Consuming
    /// `self` makes further use of the builder a compile error.
    pub fn build<A: Allocator + ?Sized>(mut self, mem: &A) -> Result<Vector, ContainerError> {
        self.bytes.push(mem, &[0])?;
        Ok(self.bytes)
    }
}
