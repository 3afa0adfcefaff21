//! # Zips and Selections
//!
//! Cross-container composition for structure-of-arrays data. [`Zipped`]
//! brands a container with a [`FamilyId`]; [`semantic_zip2`] and
//! [`semantic_zip3`] join same-family containers width-wise into one
//! combined view; a [`Selection`] names a subset of a family's rows and
//! supports sorted-set algebra; a [`SelectionView`] reads the selected
//! rows without copying them; [`transform`] and [`transform_selected`]
//! build new row-aligned containers from old ones.
//!
//! Row positions only mean anything relative to one container lineage,
//! so every cross-container operation here checks family identity first
//! and reports a typed [`FamilyMismatch`] on disagreement. The
//! `unchecked-zip` feature downgrades that check to a debug assertion
//! for callers that manage families themselves.

pub mod family;
pub mod selection;
pub mod selection_view;
pub mod transform;
pub mod zipped;

pub use family::{FamilyId, FamilyMismatch};
pub use selection::{
    RowIndex, Selection, SelectionOutOfBounds, SelectionOverflow, UnsortedSelection,
};
pub use selection_view::{SelectionIter, SelectionView};
pub use transform::{transform, transform_selected};
pub use zipped::{semantic_zip2, semantic_zip3, Zipped};
