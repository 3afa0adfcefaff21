//! # Family-Tagged Containers
//!
//! [`Zipped<C>`] pairs any container or view with a [`FamilyId`]. The
//! wrapper is transparent for everyday use (`Deref`/`DerefMut` expose the
//! wrapped value) and exists so that [`semantic_zip2`]/[`semantic_zip3`]
//! can refuse to join row spaces that merely happen to have the same
//! length. A successful semantic zip returns a zero-copy view wrapped with
//! the same family, so zip results compose with selections made against
//! any member of the family.

use std::ops::{Deref, DerefMut};

use eyre::{bail, Result};

use crate::fields::{ColumnSource, FieldTag, Gather};
use crate::view::{ColumnLengthMismatch, RowAccess, Rows, Zip2};
use crate::zip::family::{check_same_family, FamilyId};

/// A container or view tagged with the family it belongs to.
///
/// `Clone` copies the family: a clone stays row-aligned with its original
/// and remains zip-compatible with the rest of the family.
#[derive(Clone, Debug)]
pub struct Zipped<C> {
    family: FamilyId,
    inner: C,
}

impl<C> Zipped<C> {
    /// Wraps `inner` as the first member of a fresh family.
    pub fn new(inner: C) -> Self {
        Self {
            family: FamilyId::fresh(),
            inner,
        }
    }

    /// Wraps `inner` as a member of an explicitly chosen family.
    ///
    /// The caller asserts row alignment; nothing verifies that `inner`
    /// has the same row count as other members.
    pub fn with_family(inner: C, family: FamilyId) -> Self {
        Self { family, inner }
    }

    /// Wraps `inner` as a member of the family `member` belongs to.
    pub fn adopt<M>(inner: C, member: &Zipped<M>) -> Self {
        Self {
            family: member.family,
            inner,
        }
    }

    /// This member's family.
    pub fn family(&self) -> FamilyId {
        self.family
    }

    /// Unwraps the inner container, discarding the family tag.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C> Deref for Zipped<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C> DerefMut for Zipped<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Rows> Rows for Zipped<C> {
    fn row_count(&self) -> usize {
        self.inner.row_count()
    }
}

impl<C: RowAccess> RowAccess for Zipped<C> {
    type Ref<'r>
        = C::Ref<'r>
    where
        Self: 'r;

    fn row_at(&self, at: usize) -> Self::Ref<'_> {
        self.inner.row_at(at)
    }
}

impl<'a, F, P, C> ColumnSource<'a, F, P> for &'a Zipped<C>
where
    F: FieldTag,
    &'a C: ColumnSource<'a, F, P>,
{
    fn column(self) -> &'a [F::Value] {
        <&'a C as ColumnSource<'a, F, P>>::column(&self.inner)
    }
}

/// Joins two members of one family into a family-tagged view `T` over the
/// union of their fields.
///
/// Fails with [`FamilyMismatch`](crate::FamilyMismatch) when the operands
/// belong to different families and with
/// [`ColumnLengthMismatch`](crate::ColumnLengthMismatch) when their row
/// counts disagree. The returned view borrows the operands' storage and
/// carries their common family.
pub fn semantic_zip2<'a, A, B, T, P>(
    a: &'a Zipped<A>,
    b: &'a Zipped<B>,
) -> Result<Zipped<T>>
where
    A: Rows,
    B: Rows,
    T: Gather<'a, Zip2<&'a Zipped<A>, &'a Zipped<B>>, P>,
{
    check_same_family(a.family(), b.family(), "semantic zip")?;
    if a.row_count() != b.row_count() {
        bail!(ColumnLengthMismatch {
            field: "zipped view",
            expected: a.row_count(),
            got: b.row_count(),
        });
    }
    Ok(Zipped::with_family(T::gather(Zip2(a, b)), a.family()))
}

/// Joins three members of one family, as [`semantic_zip2`] does for two.
pub fn semantic_zip3<'a, A, B, C, T, P>(
    a: &'a Zipped<A>,
    b: &'a Zipped<B>,
    c: &'a Zipped<C>,
) -> Result<Zipped<T>>
where
    A: Rows,
    B: Rows,
    C: Rows,
    T: Gather<'a, Zip2<Zip2<&'a Zipped<A>, &'a Zipped<B>>, &'a Zipped<C>>, P>,
{
    check_same_family(a.family(), b.family(), "semantic zip")?;
    check_same_family(a.family(), c.family(), "semantic zip")?;
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
    Ok(Zipped::with_family(
        T::gather(Zip2(Zip2(a, b), c)),
        a.family(),
    ))
}
