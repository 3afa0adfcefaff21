//! # Parcol - Structure-of-Arrays Containers
//!
//! Parcol turns a row declaration into a family of columnar
//! (structure-of-arrays) container types and layers zipping, selection
//! and transform machinery on top. The generated types prioritize:
//!
//! - **Zero-copy access**: views and row handles borrow the columns
//!   directly, no row is ever materialized to read it
//! - **Cache-friendly layout**: every column lives in its own
//!   contiguous 64-byte aligned buffer
//! - **Misuse resistance**: width mismatches and duplicate fields fail
//!   at compile time; length, family and bounds violations fail with
//!   typed errors
//!
//! ## Quick Start
//!
//! ```ignore
//! use parcol::{fields, soa, Selection, SelectionView, Zipped};
//!
//! fields! {
//!     pub Id: u64,
//!     pub Weight: f32,
//! }
//!
//! soa! {
//!     pub struct Hit {
//!         id: u64 => Id,
//!         weight: f32 => Weight,
//!     }
//! }
//!
//! let mut hits = HitVec::new();
//! hits.push((7, 0.25));
//! hits.push((9, 0.75));
//!
//! let hits = Zipped::new(hits);
//! let heavy: Selection = Selection::select(&hits, |row| *row.weight() > 0.5)?;
//! for row in SelectionView::new(&hits, &heavy)? {
//!     println!("hit {} weighs {}", row.id(), row.weight());
//! }
//! ```
//!
//! ## Architecture
//!
//! Parcol uses a layered architecture:
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │   fields! / soa!  (generated type family) │
//! ├──────────────────────┬────────────────────┤
//! │  Vec, Slices,        │  Zipped, Selection,│
//! │  SlicesMut, Ref, Mut │  SelectionView     │
//! ├──────────────────────┴────────────────────┤
//! │  view traits (Rows, RowAccess, Gather)    │
//! ├───────────────────────────────────────────┤
//! │  AlignedVec (64-byte aligned columns)     │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`mem`]: aligned, growable column buffers
//! - [`fields`]: field tags and type-level column lookup
//! - [`view`]: row-shape traits, width-wise zips, typed view errors
//! - [`zip`]: family identity, zipped containers, selections, transforms
//! - `macros`: the `fields!` and `soa!` generators

#[macro_use]
mod macros;

pub mod fields;
pub mod mem;
pub mod view;
pub mod zip;

pub use fields::{ColumnSource, FieldTag, Gather, Here, Left, Right};
pub use mem::{AlignedVec, CACHE_LINE};
pub use view::{
    project, zip2, zip3, AssignOverflow, ColumnLengthMismatch, RowAccess, RowSink, Rows, Zip2,
};
pub use zip::{
    semantic_zip2, semantic_zip3, transform, transform_selected, FamilyId, FamilyMismatch,
    RowIndex, Selection, SelectionIter, SelectionOutOfBounds, SelectionOverflow, SelectionView,
    UnsortedSelection, Zipped,
};

pub use eyre::Result;

#[doc(hidden)]
pub use eyre;
#[doc(hidden)]
pub use paste;

#[doc(hidden)]
pub mod __private {
    pub use smallvec::SmallVec;
}
