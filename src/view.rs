//! # View Traits, Projection and Width-Wise Zips
//!
//! The generated `*Slices` and `*Vec` types all speak a small trait
//! vocabulary defined here: [`Rows`] for row counting, [`RowAccess`] for
//! positional row handles, and [`RowSink`] for building a container row by
//! row. Generic code (selections, transforms, user utilities) is written
//! against these traits and works with every generated family.
//!
//! ## Design
//!
//! [`project`] and [`zip2`]/[`zip3`] are the only two ways views are
//! combined. Both return an ordinary generated slice type and both are
//! zero-copy: the output's columns are the very slices of the inputs.
//! `project` narrows or reskins one source; `zip2` joins two row-aligned
//! sources width-wise through the [`Zip2`] combinator, which forwards
//! column lookups left or right by access path. A field reachable on both
//! sides makes the path ambiguous and the call fails to compile, so joined
//! field sets are disjoint by construction. Row counts are checked at
//! runtime; a mismatch is a typed error, never a silent truncation.

use std::fmt;

use eyre::{bail, Result};

use crate::fields::{ColumnSource, FieldTag, Gather, Left, Right};

/// Row-count interface shared by containers, views and selection views.
pub trait Rows {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Returns true if there are no rows.
    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

impl<S: Rows + ?Sized> Rows for &S {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }
}

impl<S: Rows + ?Sized> Rows for &mut S {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }
}

/// Positional access to shared row handles.
///
/// The handle type is a generic associated type so that every implementor
/// can return its own generated `*Ref` struct borrowing at the call site's
/// lifetime.
pub trait RowAccess: Rows {
    /// Shared row handle borrowing from `self`.
    type Ref<'r>
    where
        Self: 'r;

    /// Handle for the row at `at`. Panics when `at >= row_count()`, with
    /// slice-style index detail.
    fn row_at(&self, at: usize) -> Self::Ref<'_>;
}

impl<S: RowAccess> RowAccess for &S {
    type Ref<'r>
        = S::Ref<'r>
    where
        Self: 'r;

    fn row_at(&self, at: usize) -> Self::Ref<'_> {
        (**self).row_at(at)
    }
}

/// Row-by-row construction of an owning container.
///
/// Implemented by every generated `*Vec`; lets [`crate::zip::transform`]
/// and friends build any output family without naming it concretely.
pub trait RowSink {
    /// Detached row value consumed per push.
    type Row;

    /// New empty container with room for `n` rows in every column.
    fn with_row_capacity(n: usize) -> Self;

    /// Appends one row.
    fn push_row(&mut self, row: Self::Row);
}

/// Width-wise pairing of two column sources.
///
/// Carries no data beyond the two handles; column lookups are forwarded by
/// the [`Left`]/[`Right`] access paths. Built by [`zip2`]/[`zip3`], rarely
/// named directly.
#[derive(Clone, Copy, Debug)]
pub struct Zip2<A, B>(pub A, pub B);

impl<'a, F, P, A, B> ColumnSource<'a, F, Left<P>> for Zip2<A, B>
where
    F: FieldTag,
    A: ColumnSource<'a, F, P>,
    B: Copy,
{
    fn column(self) -> &'a [F::Value] {
        <A as ColumnSource<'a, F, P>>::column(self.0)
    }
}

impl<'a, F, P, A, B> ColumnSource<'a, F, Right<P>> for Zip2<A, B>
where
    F: FieldTag,
    B: ColumnSource<'a, F, P>,
    A: Copy,
{
    fn column(self) -> &'a [F::Value] {
        <B as ColumnSource<'a, F, P>>::column(self.1)
    }
}

/// Column length disagreement discovered while building or joining views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLengthMismatch {
    /// Field whose column broke the expectation, or `"zipped view"` when
    /// two whole views disagree.
    pub field: &'static str,
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for ColumnLengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column length mismatch for `{}`: expected {} rows, found {}",
            self.field, self.expected, self.got
        )
    }
}

impl std::error::Error for ColumnLengthMismatch {}

/// Bulk overwrite supplied more rows than the destination view holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOverflow {
    /// Rows available in the destination.
    pub rows: usize,
    /// Lower bound on the rows the caller supplied; counting stops at
    /// the first excess row so unbounded inputs still fail promptly.
    pub supplied: usize,
}

impl fmt::Display for AssignOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assignment of {} or more rows overflows view of {} rows",
            self.supplied, self.rows
        )
    }
}

impl std::error::Error for AssignOverflow {}

/// Rebuilds `src` as the view type `T` over the same storage.
///
/// `T` may drop fields, reorder them or use a different skin entirely; the
/// only requirement is that `src` can serve every field `T` declares. The
/// output's column slices are the input's slices, no element is copied.
///
/// ```ignore
/// let xy: PointSlices<'_> = project(hits.as_slices());
/// ```
pub fn project<'a, S, T, P>(src: S) -> T
where
    S: Copy,
    T: Gather<'a, S, P>,
{
    T::gather(src)
}

/// Joins two row-aligned views into one view `T` over the union of their
/// fields. No copy; fails when the row counts differ.
pub fn zip2<'a, A, B, T, P>(a: A, b: B) -> Result<T>
where
    A: Rows + Copy,
    B: Rows + Copy,
    T: Gather<'a, Zip2<A, B>, P>,
{
    if a.row_count() != b.row_count() {
        bail!(ColumnLengthMismatch {
            field: "zipped view",
            expected: a.row_count(),
            got: b.row_count(),
        });
    }
    Ok(T::gather(Zip2(a, b)))
}

/// Joins three row-aligned views into one view `T`, as [`zip2`] does for
/// two.
pub fn zip3<'a, A, B, C, T, P>(a: A, b: B, c: C) -> Result<T>
where
    A: Rows + Copy,
    B: Rows + Copy,
    C: Rows + Copy,
    T: Gather<'a, Zip2<Zip2<A, B>, C>, P>,
{
    if a.row_count() != b.row_count() {
        bail!(ColumnLengthMismatch {
            field: "zipped view",
            expected: a.row_count(),
            got: b.row_count(),
        });
    }
    if a.row_count() != c.row_count() {
        bail!(ColumnLengthMismatch {
            field: "zipped view",
            expected: a.row_count(),
            got: c.row_count(),
        });
    }
    Ok(T::gather(Zip2(Zip2(a, b), c)))
}
