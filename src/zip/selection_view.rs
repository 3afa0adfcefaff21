//! # Selection Views
//!
//! A [`SelectionView`] pairs a zipped container with a selection over it
//! and presents the selected rows as a dense, random-access sequence:
//! position `k` of the view is the `k`-th selected row of the host. No
//! rows are copied; the view is two references and is freely `Copy`.
//!
//! Construction validates that the selection and host share a family and
//! that every index is in bounds, so the accessors can index the host
//! directly afterwards.

use eyre::{bail, Result};

use crate::view::{RowAccess, Rows};
use crate::zip::family::{check_same_family, FamilyId};
use crate::zip::selection::{RowIndex, Selection, SelectionOutOfBounds};
use crate::zip::zipped::Zipped;

/// Borrowed, validated pairing of a zipped container and a selection.
#[derive(Debug)]
pub struct SelectionView<'a, C, I = u32> {
    host: &'a Zipped<C>,
    selection: &'a Selection<I>,
}

impl<C, I> Clone for SelectionView<'_, C, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, I> Copy for SelectionView<'_, C, I> {}

impl<'a, C, I> SelectionView<'a, C, I>
where
    C: Rows,
    I: RowIndex,
{
    /// Pairs `selection` with `host`.
    ///
    /// Fails if the two belong to different families or if the selection
    /// reaches past the host's current row count (a selection taken
    /// before rows were removed can go stale).
    pub fn new(host: &'a Zipped<C>, selection: &'a Selection<I>) -> Result<Self> {
        check_same_family(host.family(), selection.family(), "selection view")?;
        let rows = host.row_count();
        if let Some(last) = selection.indices().last() {
            if last.to_usize() >= rows {
                bail!(SelectionOutOfBounds {
                    index: last.to_usize(),
                    rows,
                });
            }
        }
        Ok(Self { host, selection })
    }
}

impl<'a, C, I> SelectionView<'a, C, I>
where
    I: RowIndex,
{
    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    /// Returns true if the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// The underlying selection.
    pub fn selection(&self) -> &'a Selection<I> {
        self.selection
    }

    /// Family shared by host and selection.
    pub fn family(&self) -> FamilyId {
        self.selection.family()
    }
}

impl<'a, C, I> SelectionView<'a, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    /// Row handle for the `at`-th selected row, or `None` past the end.
    pub fn get(&self, at: usize) -> Option<C::Ref<'a>> {
        let row = self.selection.indices().get(at)?.to_usize();
        Some(self.host.row_at(row))
    }

    /// Row handle for the `at`-th selected row.
    ///
    /// # Panics
    ///
    /// Panics if `at` is out of bounds.
    pub fn row(&self, at: usize) -> C::Ref<'a> {
        let n = self.len();
        match self.get(at) {
            Some(row) => row,
            None => panic!("selected position (is {at}) should be < selection length (is {n})"),
        }
    }

    /// Iterates the selected rows in ascending row order.
    pub fn iter(&self) -> SelectionIter<'a, C, I> {
        SelectionIter {
            host: self.host,
            indices: self.selection.indices().iter(),
        }
    }

    /// Narrows the selection to the selected rows for which `pred`
    /// holds, returning a new selection in the same family.
    pub fn refine<F>(&self, mut pred: F) -> Selection<I>
    where
        F: FnMut(C::Ref<'_>) -> bool,
    {
        let kept = self
            .selection
            .indices()
            .iter()
            .filter(|i| pred(self.host.row_at(i.to_usize())))
            .copied()
            .collect();
        Selection::from_parts(self.family(), kept)
    }
}

impl<C, I> Rows for SelectionView<'_, C, I>
where
    I: RowIndex,
{
    fn row_count(&self) -> usize {
        self.selection.len()
    }
}

impl<C, I> RowAccess for SelectionView<'_, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    type Ref<'r>
        = C::Ref<'r>
    where
        Self: 'r;

    fn row_at(&self, at: usize) -> Self::Ref<'_> {
        // Reborrow at the shorter lifetime before indexing so the
        // returned handle matches the signature exactly.
        let host: &Zipped<C> = self.host;
        host.row_at(self.selection.indices()[at].to_usize())
    }
}

impl<'a, C, I> IntoIterator for SelectionView<'a, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    type Item = C::Ref<'a>;
    type IntoIter = SelectionIter<'a, C, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, C, I> IntoIterator for &SelectionView<'a, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    type Item = C::Ref<'a>;
    type IntoIter = SelectionIter<'a, C, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rows a selection picks out of its host.
pub struct SelectionIter<'a, C, I> {
    host: &'a Zipped<C>,
    indices: std::slice::Iter<'a, I>,
}

impl<C, I> Clone for SelectionIter<'_, C, I> {
    fn clone(&self) -> Self {
        Self {
            host: self.host,
            indices: self.indices.clone(),
        }
    }
}

impl<'a, C, I> Iterator for SelectionIter<'a, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    type Item = C::Ref<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.indices.next()?.to_usize();
        Some(self.host.row_at(at))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<C, I> DoubleEndedIterator for SelectionIter<'_, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let at = self.indices.next_back()?.to_usize();
        Some(self.host.row_at(at))
    }
}

impl<C, I> ExactSizeIterator for SelectionIter<'_, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
}

impl<C, I> std::iter::FusedIterator for SelectionIter<'_, C, I>
where
    C: RowAccess,
    I: RowIndex,
{
}
