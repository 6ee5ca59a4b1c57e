//! mallee - allocator-backed container toolkit
//!
//! A small toolkit for storing arbitrary data compactly under a
//! caller-chosen allocation strategy: a pluggable [`Allocator`]
//! capability, a linear [`Arena`] built on it, a stride-erased
//! growable [`Vector`] (with a typed [`Array`] facade), and string
//! utilities — the immutable [`StrView`] and the owning [`StrBuf`]
//! builder — layered on the vector.
//!
//! Failure is predictable throughout: allocation exhaustion surfaces
//! as a result, never a crash, and a failed growth leaves its
//! container in the prior valid state. Contract violations (arena
//! reallocation, stride/size mismatches) panic.
//!
//! ```
//! use mallee::{Arena, Array, StrBuf};
//!
//! let arena = Arena::with_capacity(64 * 1024).unwrap();
//!
//! let mut numbers = Array::new();
//! for i in 0..10i64 {
//!     numbers.push(&arena, i * i).unwrap();
//! }
//! assert_eq!(numbers.get(3), Some(9));
//!
//! let mut sb = StrBuf::new();
//! sb.append_str(&arena, "sum: ").unwrap();
//! sb.append_format(&arena, format_args!("{}", 285)).unwrap();
//! assert_eq!(sb.view().as_bytes(), b"sum: 285");
//! ```

pub mod alloc;
pub mod arena;
pub mod array;
pub mod block;
pub mod error;
pub mod string;
pub mod vector;

pub use crate::alloc::{AllocError, Allocator, HeapAllocator, ALIGNMENT};
pub use crate::arena::Arena;
pub use crate::array::Array;
pub use crate::block::Block;
pub use crate::error::ContainerError;
pub use crate::string::{StrBuf, StrView};
pub use crate::vector::Vector;
