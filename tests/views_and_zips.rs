//! # View and Zip Tests
//!
//! Covers the borrowed views over generated containers (shared and
//! mutable), the row handles they hand out, and the width-wise zips that
//! join disjoint skins into wider views without touching any row data.

use parcol::{fields, soa, project, zip2, zip3, AssignOverflow, ColumnLengthMismatch};

fields! {
    pub X: f64,
    pub Y: f64,
    pub TrackId: u32,
    pub Energy: f32,
    pub GateOpen: bool,
}

soa! {
    /// Spatial position of a hit.
    pub struct Point {
        x: f64 => X,
        y: f64 => Y,
    }
}

soa! {
    /// Bookkeeping attached to a hit.
    pub struct Meta {
        track: u32 => TrackId,
        energy: f32 => Energy,
    }
}

soa! {
    /// The zipped combination of [`Point`] and [`Meta`].
    pub struct Full {
        x: f64 => X,
        y: f64 => Y,
        track: u32 => TrackId,
        energy: f32 => Energy,
    }
}

soa! {
    /// Trigger decision per hit.
    pub struct Gate {
        open: bool => GateOpen,
    }
}

soa! {
    /// A narrow cross-section taken from three sources at once.
    pub struct Summary {
        x: f64 => X,
        track: u32 => TrackId,
        open: bool => GateOpen,
    }
}

fn sample_points(n: u32) -> PointVec {
    (0..n).map(|i| (f64::from(i), f64::from(i) * -1.0)).collect()
}

fn sample_meta(n: u32) -> MetaVec {
    (0..n).map(|i| (i * 10, i as f32 * 0.5)).collect()
}

// ============================================================================
// Shared views and row handles
// ============================================================================

#[test]
fn test_slices_new_validates_lengths() {
    let xs = [1.0, 2.0];
    let ys = [3.0, 4.0];
    let view = PointSlices::new(&xs, &ys).unwrap();
    assert_eq!(view.row_count(), 2);

    let short = [3.0];
    let err = PointSlices::new(&xs, &short).unwrap_err();
    let detail = err.downcast_ref::<ColumnLengthMismatch>().unwrap();
    assert_eq!(detail.field, "y");
    assert_eq!(detail.expected, 2);
    assert_eq!(detail.got, 1);
}

#[test]
fn test_row_handles_borrow_without_copying() {
    let points = sample_points(4);
    let view = points.as_slices();

    let handle = view.row(2);
    assert_eq!(handle.index(), 2);
    assert!(std::ptr::eq(handle.x(), &points.x()[2]));
    assert!(std::ptr::eq(handle.y(), &points.y()[2]));

    let owned = handle.to_owned();
    assert_eq!(owned, Point { x: 2.0, y: -2.0 });
}

#[test]
fn test_subview_shares_storage() {
    let points = sample_points(6);
    let view = points.as_slices();
    let middle = view.slice(2..5);

    assert_eq!(middle.row_count(), 3);
    assert_eq!(middle.x, &[2.0, 3.0, 4.0]);
    assert_eq!(middle.x.as_ptr(), points.x()[2..].as_ptr());

    assert_eq!(middle.first().unwrap().x(), &2.0);
    assert_eq!(middle.last().unwrap().x(), &4.0);
}

#[test]
#[should_panic(expected = "row index")]
fn test_row_panics_out_of_bounds() {
    let points = sample_points(2);
    let _ = points.as_slices().row(2);
}

#[test]
fn test_view_iteration_is_double_ended() {
    let points = sample_points(5);
    let view = points.as_slices();

    let forward: Vec<f64> = view.iter().map(|r| *r.x()).collect();
    assert_eq!(forward, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    let mut iter = view.iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(*iter.next().unwrap().x(), 0.0);
    assert_eq!(*iter.next_back().unwrap().x(), 4.0);
    assert_eq!(iter.len(), 3);
}

#[test]
fn test_handle_comparisons() {
    let points: PointVec = [(1.0, 1.0), (1.0, 1.0), (2.0, 0.0)].into_iter().collect();
    let view = points.as_slices();

    assert_eq!(view.row(0), view.row(1));
    assert_ne!(view.row(0), view.row(2));
    assert!(view.row(0) < view.row(2));

    let owned = Point { x: 1.0, y: 1.0 };
    assert_eq!(view.row(0), owned);
    assert_eq!(owned, view.row(1));
    assert!(view.row(2) > owned);
}

#[test]
fn test_to_vec_materializes_subview() {
    let points = sample_points(5);
    let copied = points.as_slices().slice(1..3).to_vec();
    assert_eq!(copied.x(), &[1.0, 2.0]);
    assert_eq!(copied.row_count(), 2);
}

// ============================================================================
// Mutable views
// ============================================================================

#[test]
fn test_mut_view_validates_lengths() {
    let mut xs = [1.0, 2.0];
    let mut short = [0.0];
    let err = PointSlicesMut::new(&mut xs, &mut short).unwrap_err();
    let detail = err.downcast_ref::<ColumnLengthMismatch>().unwrap();
    assert_eq!(detail.field, "y");
}

#[test]
fn test_mut_view_overwrites_in_place() {
    let mut points = sample_points(3);
    let mut view = points.as_slices_mut();

    view.set_row(0, Point { x: 9.0, y: -9.0 });
    view.swap_rows(0, 2);

    {
        let mut row = view.row_mut(1);
        row.set_x(5.5);
        *row.y_mut() = -5.5;
        assert_eq!(row.index(), 1);
        assert_eq!(row.to_owned(), Point { x: 5.5, y: -5.5 });
    }

    assert_eq!(points.x(), &[2.0, 5.5, 9.0]);
    assert_eq!(points.y(), &[-2.0, -5.5, -9.0]);
}

#[test]
fn test_mut_view_fill_and_assign() {
    let mut points = sample_points(4);
    let mut view = points.as_slices_mut();

    view.fill(Point { x: 0.0, y: 0.0 });
    assert_eq!(view.as_shared().row(3).x(), &0.0);

    // A shorter input overwrites a prefix and reports how far it got.
    let written = view.assign_from_iter([(1.0, 1.0), (2.0, 2.0)]).unwrap();
    assert_eq!(written, 2);
    assert_eq!(points.x(), &[1.0, 2.0, 0.0, 0.0]);
}

#[test]
fn test_assign_overflow_is_reported() {
    let mut points = sample_points(2);
    let mut view = points.as_slices_mut();

    let err = view
        .assign_from_iter([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)])
        .unwrap_err();
    let detail = err.downcast_ref::<AssignOverflow>().unwrap();
    assert_eq!(detail.rows, 2);
    // Counting stops at the first excess row; supplied is a lower bound.
    assert_eq!(detail.supplied, 3);

    // The prefix was written before the overflow was noticed.
    assert_eq!(points.x(), &[1.0, 2.0]);
}

#[test]
fn test_assign_from_unbounded_input_terminates() {
    let mut points = sample_points(3);
    let mut view = points.as_slices_mut();

    let err = view
        .assign_from_iter(std::iter::repeat((7.0, -7.0)))
        .unwrap_err();
    let detail = err.downcast_ref::<AssignOverflow>().unwrap();
    assert_eq!(detail.rows, 3);
    assert_eq!(detail.supplied, 4);

    assert_eq!(points.x(), &[7.0, 7.0, 7.0]);
}

#[test]
fn test_reborrow_allows_repeated_passes() {
    let mut points = sample_points(3);
    let mut view = points.as_slices_mut();

    for mut row in view.reborrow() {
        row.set_x(row.x() * 2.0);
    }
    for mut row in view.reborrow() {
        row.set_x(row.x() + 1.0);
    }

    assert_eq!(points.x(), &[1.0, 3.0, 5.0]);
}

#[test]
fn test_mut_iteration_from_both_ends() {
    let mut points = sample_points(4);
    let mut iter = points.iter_mut();

    iter.next().unwrap().set_y(100.0);
    iter.next_back().unwrap().set_y(-100.0);
    assert_eq!(iter.len(), 2);
    drop(iter);

    assert_eq!(points.y(), &[100.0, -1.0, -2.0, -100.0]);
}

// ============================================================================
// Width-wise zips and projections
// ============================================================================

#[test]
fn test_zip2_joins_disjoint_skins() {
    let points = sample_points(3);
    let meta = sample_meta(3);

    let full: FullSlices<'_> = zip2(points.as_slices(), meta.as_slices()).unwrap();
    assert_eq!(full.row_count(), 3);

    let row = full.row(1);
    assert_eq!(row.x(), &1.0);
    assert_eq!(row.track(), &10);
    assert_eq!(row.energy(), &0.5);

    // The zipped view aliases the source columns; nothing was copied.
    assert_eq!(full.x.as_ptr(), points.x().as_ptr());
    assert_eq!(full.track.as_ptr(), meta.track().as_ptr());
}

#[test]
fn test_zip2_rejects_row_count_mismatch() {
    let points = sample_points(3);
    let meta = sample_meta(2);

    let err = zip2::<_, _, FullSlices<'_>, _>(points.as_slices(), meta.as_slices()).unwrap_err();
    let detail = err.downcast_ref::<ColumnLengthMismatch>().unwrap();
    assert_eq!(detail.expected, 3);
    assert_eq!(detail.got, 2);
}

#[test]
fn test_zip3_can_narrow_while_joining() {
    let points = sample_points(4);
    let meta = sample_meta(4);
    let gates: GateVec = [(true,), (false,), (true,), (true,)].into_iter().collect();

    let summary: SummarySlices<'_> =
        zip3(points.as_slices(), meta.as_slices(), gates.as_slices()).unwrap();

    assert_eq!(summary.row_count(), 4);
    assert_eq!(summary.x, points.x());
    assert_eq!(summary.track, meta.track());
    assert_eq!(summary.open, &[true, false, true, true]);
}

#[test]
fn test_project_narrows_without_copying() {
    let full: FullVec = [
        (0.0, 0.5, 1u32, 1.0f32),
        (1.0, 1.5, 2, 2.0),
    ]
    .into_iter()
    .collect();

    let xy: PointSlices<'_> = project(full.as_slices());
    assert_eq!(xy.row_count(), 2);
    assert_eq!(xy.x.as_ptr(), full.x().as_ptr());
    assert_eq!(xy.y.as_ptr(), full.y().as_ptr());

    // Containers project directly through their reference.
    let meta_only: MetaSlices<'_> = project(&full);
    assert_eq!(meta_only.track, &[1, 2]);
}

#[test]
fn test_projection_field_order_is_free() {
    // Gathering goes by tag, not declaration order: Summary picks fields
    // out of a zip of three differently shaped sources.
    let points = sample_points(2);
    let meta = sample_meta(2);
    let gates: GateVec = [(false,), (true,)].into_iter().collect();

    let summary: SummarySlices<'_> =
        zip3(points.as_slices(), meta.as_slices(), gates.as_slices()).unwrap();
    let back: PointSlices<'_> = project(zip2::<_, _, FullSlices<'_>, _>(
        points.as_slices(),
        meta.as_slices(),
    )
    .unwrap());

    assert_eq!(summary.open, &[false, true]);
    assert_eq!(back.x.as_ptr(), points.x().as_ptr());
}
