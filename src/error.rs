//! Failure taxonomy for container operations
//!
//! Every fallible container operation returns a distinct
//! [`ContainerError`] variant; display strings are the human-readable
//! diagnostics, intended for logs rather than programmatic branching.
//! Contract violations (arena reallocation, slice/stride mismatches)
//! panic instead of returning one of these.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    #[error("vector grow could not allocate memory")]
    Grow,
    #[error("vector push could not grow vector")]
    PushGrow,
    #[error("vector is empty on pop")]
    PopEmpty,
    #[error("index out of bounds on vector insert")]
    InsertOutOfBounds,
    #[error("vector insert could not grow vector")]
    InsertGrow,
    #[error("vectors differ in stride values on append ({dest} vs {src})")]
    StrideMismatch { dest: usize, src: usize },
    #[error("vector append could not grow vector")]
    AppendGrow,
    #[error("bulk vector construction could not allocate memory")]
    FromSliceAlloc,
    #[error("substring range {start}..{end} out of bounds for view of length {len}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("formatted append failed to render")]
    Format,
}
