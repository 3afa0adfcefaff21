//! # Column Memory
//!
//! Allocation primitives shared by every generated container. Columns live
//! in [`AlignedVec`] buffers so that a scan over one field touches a dense,
//! cache-line-aligned run of memory with nothing from neighboring fields
//! interleaved.

mod avec;

pub use avec::AlignedVec;

/// Alignment target for column buffers, in bytes.
pub const CACHE_LINE: usize = 64;
