//! # Selections
//!
//! A [`Selection`] names a subset of one family's rows: an ascending,
//! duplicate-free list of row positions plus the family id it was made
//! against. Selections are immutable once built; the set operations
//! return new values and never disturb their operands, so a selection can
//! be shared freely (including across threads) once constructed.
//!
//! ## Design
//!
//! The index width is a type parameter with a `u32` default. Narrow
//! widths halve or quarter the footprint of large selections; the
//! constructors refuse (with a typed overflow error) to record a row
//! position the chosen width cannot hold, so a too-narrow selection fails
//! loudly instead of wrapping. All set algebra is a single merge pass over
//! the two sorted operands, O(n + m), and produces sorted, duplicate-free
//! output by construction.

use std::cmp::Ordering;
use std::fmt;

use eyre::{bail, Result};

use crate::view::{RowAccess, Rows};
use crate::zip::family::{check_same_family, FamilyId};
use crate::zip::zipped::Zipped;

/// Storage width for selection indices.
///
/// Implemented for `u16`, `u32`, `u64` and `usize`. Conversions are
/// checked on the way in (`from_usize`) and trusted on the way out:
/// a selection only ever holds values that originated as valid `usize`
/// row positions.
pub trait RowIndex: Copy + Ord + fmt::Debug + 'static {
    /// Type name used in overflow diagnostics.
    const TYPE_NAME: &'static str;

    /// Largest row position this width can address.
    const MAX_INDEX: usize;

    /// Converts a row position, or `None` when it does not fit.
    fn from_usize(at: usize) -> Option<Self>;

    /// Converts back to a row position.
    fn to_usize(self) -> usize;
}

macro_rules! row_index {
    ($($ty:ty),+) => {
        $(
            impl RowIndex for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const MAX_INDEX: usize = <$ty>::MAX as usize;

                #[inline]
                fn from_usize(at: usize) -> Option<Self> {
                    <$ty>::try_from(at).ok()
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )+
    };
}

row_index!(u16, u32, u64, usize);

/// Row position does not fit the selection's index width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOverflow {
    /// Rows in the host container.
    pub rows: usize,
    /// Largest row position the index type can hold.
    pub index_max: usize,
    /// Name of the index type, e.g. `"u16"`.
    pub index_type: &'static str,
}

impl fmt::Display for SelectionOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selection over {} rows overflows {} indices (max {})",
            self.rows, self.index_type, self.index_max
        )
    }
}

impl std::error::Error for SelectionOverflow {}

/// Selection addresses a row past the end of its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutOfBounds {
    pub index: usize,
    pub rows: usize,
}

impl fmt::Display for SelectionOutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selection index {} out of bounds for {} rows",
            self.index, self.rows
        )
    }
}

impl std::error::Error for SelectionOutOfBounds {}

/// Input to `from_sorted` broke the ascending, duplicate-free contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsortedSelection {
    /// Position in the input where the order breaks.
    pub position: usize,
}

impl fmt::Display for UnsortedSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selection indices not strictly ascending at position {}",
            self.position
        )
    }
}

impl std::error::Error for UnsortedSelection {}

/// An ascending, duplicate-free set of row positions in one family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection<I = u32> {
    family: FamilyId,
    indices: Vec<I>,
}

impl<I: RowIndex> Selection<I> {
    /// Selects every row of `host`.
    pub fn all<C: Rows>(host: &Zipped<C>) -> Result<Self> {
        let n = host.row_count();
        // One width check on the largest index covers every smaller one.
        if n > 0 && I::from_usize(n - 1).is_none() {
            bail!(SelectionOverflow {
                rows: n,
                index_max: I::MAX_INDEX,
                index_type: I::TYPE_NAME,
            });
        }
        Ok(Self {
            family: host.family(),
            indices: (0..n).filter_map(I::from_usize).collect(),
        })
    }

    /// Empty selection against `host`'s family.
    pub fn none<C>(host: &Zipped<C>) -> Self {
        Self {
            family: host.family(),
            indices: Vec::new(),
        }
    }

    /// Selects the rows of `host` for which `pred` holds.
    pub fn select<C, F>(host: &Zipped<C>, mut pred: F) -> Result<Self>
    where
        C: RowAccess,
        F: FnMut(C::Ref<'_>) -> bool,
    {
        let n = host.row_count();
        let mut indices = Vec::new();
        for at in 0..n {
            if pred(host.row_at(at)) {
                let Some(i) = I::from_usize(at) else {
                    bail!(SelectionOverflow {
                        rows: n,
                        index_max: I::MAX_INDEX,
                        index_type: I::TYPE_NAME,
                    });
                };
                indices.push(i);
            }
        }
        Ok(Self {
            family: host.family(),
            indices,
        })
    }

    /// Builds a selection from indices the caller already holds.
    ///
    /// The input must be strictly ascending (sorted, no duplicates) and
    /// in bounds for `host`; both are verified.
    pub fn from_sorted<C: Rows>(host: &Zipped<C>, indices: Vec<I>) -> Result<Self> {
        for (at, pair) in indices.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                bail!(UnsortedSelection { position: at + 1 });
            }
        }
        let rows = host.row_count();
        if let Some(&last) = indices.last() {
            if last.to_usize() >= rows {
                bail!(SelectionOutOfBounds {
                    index: last.to_usize(),
                    rows,
                });
            }
        }
        Ok(Self {
            family: host.family(),
            indices,
        })
    }

    /// Assembles a selection whose indices are already known to be
    /// strictly ascending and in bounds.
    pub(crate) fn from_parts(family: FamilyId, indices: Vec<I>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { family, indices }
    }

    /// Family this selection was made against.
    pub fn family(&self) -> FamilyId {
        self.family
    }

    /// The selected row positions, ascending.
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no row is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true if the row at `row` is selected.
    pub fn contains(&self, row: usize) -> bool {
        I::from_usize(row).is_some_and(|i| self.indices.binary_search(&i).is_ok())
    }

    /// Iterates the selected row positions as `usize`.
    pub fn row_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().map(|i| i.to_usize())
    }

    /// Rows selected by either operand.
    pub fn union(&self, other: &Self) -> Result<Self> {
        check_same_family(self.family, other.family, "selection union")?;
        let (xs, ys) = (&self.indices, &other.indices);
        let mut out = Vec::with_capacity(xs.len().max(ys.len()));
        let (mut a, mut b) = (0, 0);
        while a < xs.len() && b < ys.len() {
            match xs[a].cmp(&ys[b]) {
                Ordering::Less => {
                    out.push(xs[a]);
                    a += 1;
                }
                Ordering::Greater => {
                    out.push(ys[b]);
                    b += 1;
                }
                Ordering::Equal => {
                    out.push(xs[a]);
                    a += 1;
                    b += 1;
                }
            }
        }
        out.extend_from_slice(&xs[a..]);
        out.extend_from_slice(&ys[b..]);
        Ok(Self {
            family: self.family,
            indices: out,
        })
    }

    /// Rows selected by both operands.
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        check_same_family(self.family, other.family, "selection intersection")?;
        let (xs, ys) = (&self.indices, &other.indices);
        let mut out = Vec::with_capacity(xs.len().min(ys.len()));
        let (mut a, mut b) = (0, 0);
        while a < xs.len() && b < ys.len() {
            match xs[a].cmp(&ys[b]) {
                Ordering::Less => a += 1,
                Ordering::Greater => b += 1,
                Ordering::Equal => {
                    out.push(xs[a]);
                    a += 1;
                    b += 1;
                }
            }
        }
        Ok(Self {
            family: self.family,
            indices: out,
        })
    }

    /// Rows selected by `self` but not by `other`.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        check_same_family(self.family, other.family, "selection difference")?;
        let (xs, ys) = (&self.indices, &other.indices);
        let mut out = Vec::with_capacity(xs.len());
        let (mut a, mut b) = (0, 0);
        while a < xs.len() && b < ys.len() {
            match xs[a].cmp(&ys[b]) {
                Ordering::Less => {
                    out.push(xs[a]);
                    a += 1;
                }
                Ordering::Greater => b += 1,
                Ordering::Equal => {
                    a += 1;
                    b += 1;
                }
            }
        }
        out.extend_from_slice(&xs[a..]);
        Ok(Self {
            family: self.family,
            indices: out,
        })
    }

    /// Rows selected by exactly one operand.
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self> {
        check_same_family(self.family, other.family, "selection symmetric_difference")?;
        let (xs, ys) = (&self.indices, &other.indices);
        let mut out = Vec::with_capacity(xs.len() + ys.len());
        let (mut a, mut b) = (0, 0);
        while a < xs.len() && b < ys.len() {
            match xs[a].cmp(&ys[b]) {
                Ordering::Less => {
                    out.push(xs[a]);
                    a += 1;
                }
                Ordering::Greater => {
                    out.push(ys[b]);
                    b += 1;
                }
                Ordering::Equal => {
                    a += 1;
                    b += 1;
                }
            }
        }
        out.extend_from_slice(&xs[a..]);
        out.extend_from_slice(&ys[b..]);
        Ok(Self {
            family: self.family,
            indices: out,
        })
    }

    /// Returns true if every row selected by `other` is selected by
    /// `self`.
    pub fn is_superset(&self, other: &Self) -> Result<bool> {
        check_same_family(self.family, other.family, "selection is_superset")?;
        let xs = &self.indices;
        let mut a = 0;
        for y in &other.indices {
            while a < xs.len() && xs[a] < *y {
                a += 1;
            }
            if a == xs.len() || xs[a] != *y {
                return Ok(false);
            }
            a += 1;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRows(usize);

    impl Rows for FakeRows {
        fn row_count(&self) -> usize {
            self.0
        }
    }

    fn host(rows: usize) -> Zipped<FakeRows> {
        Zipped::new(FakeRows(rows))
    }

    fn sel(host: &Zipped<FakeRows>, indices: &[u32]) -> Selection<u32> {
        Selection::from_sorted(host, indices.to_vec()).unwrap()
    }

    #[test]
    fn all_and_none() {
        let h = host(4);
        let all: Selection<u32> = Selection::all(&h).unwrap();
        assert_eq!(all.indices(), &[0, 1, 2, 3]);
        let none: Selection<u32> = Selection::none(&h);
        assert!(none.is_empty());
        assert_eq!(all.family(), none.family());
    }

    #[test]
    fn from_sorted_validates_order() {
        let h = host(10);
        let err = Selection::<u32>::from_sorted(&h, vec![1, 3, 3, 5]).unwrap_err();
        let detail = err.downcast_ref::<UnsortedSelection>().unwrap();
        assert_eq!(detail.position, 2);

        let err = Selection::<u32>::from_sorted(&h, vec![4, 2]).unwrap_err();
        assert!(err.downcast_ref::<UnsortedSelection>().is_some());
    }

    #[test]
    fn from_sorted_validates_bounds() {
        let h = host(3);
        let err = Selection::<u32>::from_sorted(&h, vec![0, 5]).unwrap_err();
        let detail = err.downcast_ref::<SelectionOutOfBounds>().unwrap();
        assert_eq!(detail.index, 5);
        assert_eq!(detail.rows, 3);
    }

    #[test]
    fn narrow_width_overflows() {
        let h = host(70_000);
        let err = Selection::<u16>::all(&h).unwrap_err();
        let detail = err.downcast_ref::<SelectionOverflow>().unwrap();
        assert_eq!(detail.index_type, "u16");
        assert_eq!(detail.index_max, u16::MAX as usize);

        // The same rows fit a u32 selection.
        assert!(Selection::<u32>::all(&h).is_ok());

        // Exact boundary: the largest index must fit the width.
        let fits = host(u16::MAX as usize + 1);
        let full: Selection<u16> = Selection::all(&fits).unwrap();
        assert_eq!(full.len(), u16::MAX as usize + 1);
        assert!(Selection::<u16>::all(&host(u16::MAX as usize + 2)).is_err());
    }

    #[test]
    fn algebra_on_sorted_sets() {
        let h = host(10);
        let a = sel(&h, &[0, 2, 4, 6]);
        let b = sel(&h, &[1, 2, 3, 6, 9]);

        assert_eq!(a.union(&b).unwrap().indices(), &[0, 1, 2, 3, 4, 6, 9]);
        assert_eq!(a.intersection(&b).unwrap().indices(), &[2, 6]);
        assert_eq!(a.difference(&b).unwrap().indices(), &[0, 4]);
        assert_eq!(
            a.symmetric_difference(&b).unwrap().indices(),
            &[0, 1, 3, 4, 9]
        );
        assert!(a.is_superset(&a.intersection(&b).unwrap()).unwrap());
        assert!(!a.is_superset(&b).unwrap());
    }

    #[test]
    fn algebra_rejects_foreign_family() {
        let h1 = host(5);
        let h2 = host(5);
        let a = sel(&h1, &[0, 1]);
        let b = sel(&h2, &[1, 2]);
        #[cfg(not(feature = "unchecked-zip"))]
        {
            let err = a.union(&b).unwrap_err();
            assert!(err.downcast_ref::<crate::zip::family::FamilyMismatch>().is_some());
        }
        let _ = (a, b);
    }

    #[test]
    fn reconstruction_law() {
        // a == (a ∖ b) ∪ (a ∩ b)
        let h = host(20);
        let a = sel(&h, &[1, 5, 7, 11, 13]);
        let b = sel(&h, &[5, 6, 11, 19]);
        let rebuilt = a
            .difference(&b)
            .unwrap()
            .union(&a.intersection(&b).unwrap())
            .unwrap();
        assert_eq!(rebuilt, a);
    }

    #[test]
    fn contains_uses_binary_search() {
        let h = host(100);
        let s = sel(&h, &[3, 50, 99]);
        assert!(s.contains(50));
        assert!(!s.contains(51));
        assert!(!s.contains(1_000_000));
        assert_eq!(s.row_positions().collect::<Vec<_>>(), vec![3, 50, 99]);
    }
}
