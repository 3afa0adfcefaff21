//! # Row Transforms
//!
//! Row-aligned production of one container from another. `transform` maps
//! every row of a zipped source through a closure and collects the
//! results into a fresh container of the same length; `transform_selected`
//! does the same for the rows a selection picks out and pads every other
//! position with a fill row. Both stamp the source's family onto the
//! result, because a row-aligned output describes the same rows as its
//! input and should zip and select against it directly.

use eyre::{bail, Result};

use crate::view::{RowAccess, RowSink, Rows};
use crate::zip::family::check_same_family;
use crate::zip::selection::{RowIndex, Selection, SelectionOutOfBounds};
use crate::zip::zipped::Zipped;

/// Maps every row of `src` into a freshly built container.
///
/// The output has exactly one row per source row and inherits the
/// source's family.
pub fn transform<C, O, F>(src: &Zipped<C>, mut op: F) -> Zipped<O>
where
    C: RowAccess,
    O: RowSink,
    F: FnMut(C::Ref<'_>) -> O::Row,
{
    let n = src.row_count();
    let mut out = O::with_row_capacity(n);
    for at in 0..n {
        out.push_row(op(src.row_at(at)));
    }
    Zipped::with_family(out, src.family())
}

/// Maps the selected rows of `src`; every unselected position receives a
/// clone of `fill`.
///
/// The output is row-aligned with `src` (same length, same family), so a
/// partial computation can still be zipped back against its source. Fails
/// if the selection belongs to another family or reaches past the end of
/// `src`.
pub fn transform_selected<C, O, F, I>(
    src: &Zipped<C>,
    selection: &Selection<I>,
    mut op: F,
    fill: O::Row,
) -> Result<Zipped<O>>
where
    C: RowAccess,
    O: RowSink,
    O::Row: Clone,
    F: FnMut(C::Ref<'_>) -> O::Row,
    I: RowIndex,
{
    check_same_family(src.family(), selection.family(), "selected transform")?;
    let rows = src.row_count();
    if let Some(last) = selection.indices().last() {
        if last.to_usize() >= rows {
            bail!(SelectionOutOfBounds {
                index: last.to_usize(),
                rows,
            });
        }
    }
    let mut out = O::with_row_capacity(rows);
    let mut picked = selection.indices().iter();
    let mut next = picked.next();
    for at in 0..rows {
        match next {
            Some(i) if i.to_usize() == at => {
                out.push_row(op(src.row_at(at)));
                next = picked.next();
            }
            _ => out.push_row(fill.clone()),
        }
    }
    Ok(Zipped::with_family(out, src.family()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Readings {
        vals: Vec<f32>,
    }

    impl Rows for Readings {
        fn row_count(&self) -> usize {
            self.vals.len()
        }
    }

    impl RowAccess for Readings {
        type Ref<'r>
            = &'r f32
        where
            Self: 'r;

        fn row_at(&self, at: usize) -> &f32 {
            &self.vals[at]
        }
    }

    impl RowSink for Readings {
        type Row = f32;

        fn with_row_capacity(rows: usize) -> Self {
            Readings {
                vals: Vec::with_capacity(rows),
            }
        }

        fn push_row(&mut self, row: f32) {
            self.vals.push(row);
        }
    }

    struct Flags {
        vals: Vec<bool>,
    }

    impl RowSink for Flags {
        type Row = bool;

        fn with_row_capacity(rows: usize) -> Self {
            Flags {
                vals: Vec::with_capacity(rows),
            }
        }

        fn push_row(&mut self, row: bool) {
            self.vals.push(row);
        }
    }

    fn readings(vals: &[f32]) -> Zipped<Readings> {
        Zipped::new(Readings {
            vals: vals.to_vec(),
        })
    }

    #[test]
    fn transform_is_row_aligned() {
        let src = readings(&[1.0, -2.0, 3.0]);
        let flags: Zipped<Flags> = transform(&src, |v| *v > 0.0);
        assert_eq!(flags.vals, vec![true, false, true]);
        assert_eq!(flags.family(), src.family());
    }

    #[test]
    fn selected_transform_pads_with_fill() {
        let src = readings(&[1.0, 2.0, 3.0, 4.0]);
        let picked = Selection::<u32>::from_sorted(&src, vec![1, 3]).unwrap();
        let scaled: Zipped<Readings> =
            transform_selected(&src, &picked, |v| *v * 10.0, 0.0).unwrap();
        assert_eq!(scaled.vals, vec![0.0, 20.0, 0.0, 40.0]);
        assert_eq!(scaled.family(), src.family());
    }

    #[test]
    fn selected_transform_handles_empty_selection() {
        let src = readings(&[5.0, 6.0]);
        let none = Selection::<u32>::none(&src);
        let out: Zipped<Readings> = transform_selected(&src, &none, |v| *v, -1.0).unwrap();
        assert_eq!(out.vals, vec![-1.0, -1.0]);
    }

    #[cfg(not(feature = "unchecked-zip"))]
    #[test]
    fn selected_transform_rejects_foreign_family() {
        use crate::zip::family::FamilyMismatch;

        let src = readings(&[1.0]);
        let other = readings(&[1.0]);
        let foreign = Selection::<u32>::from_sorted(&other, vec![0]).unwrap();
        let err = transform_selected::<_, Readings, _, _>(&src, &foreign, |v| *v, 0.0)
            .unwrap_err();
        assert!(err.downcast_ref::<FamilyMismatch>().is_some());
    }

    #[test]
    fn selected_transform_rejects_stale_selection() {
        let src = readings(&[1.0, 2.0, 3.0]);
        let picked = Selection::<u32>::from_sorted(&src, vec![2]).unwrap();
        let shrunk = Zipped::adopt(Readings { vals: vec![9.0] }, &src);
        let err = transform_selected::<_, Readings, _, _>(&shrunk, &picked, |v| *v, 0.0)
            .unwrap_err();
        let detail = err.downcast_ref::<SelectionOutOfBounds>().unwrap();
        assert_eq!(detail.index, 2);
        assert_eq!(detail.rows, 1);
    }
}
