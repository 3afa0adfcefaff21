//! Fuzz testing for selection set algebra.
//!
//! Builds selections from arbitrary index sets over one family and
//! checks every merge operation against `BTreeSet` on the same data,
//! then reads the merged selection back through a view.

#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use parcol::{fields, soa, Selection, SelectionView, Zipped};

fields! {
    pub Slot: u32,
}

soa! {
    pub struct Cell {
        slot: u32 => Slot,
    }
}

#[derive(Debug, Arbitrary)]
struct AlgebraInput {
    rows: u16,
    lhs: Vec<u16>,
    rhs: Vec<u16>,
}

fuzz_target!(|input: AlgebraInput| {
    let rows = (input.rows as usize).min(4096);
    let host = Zipped::new((0..rows as u32).map(|i| (i,)).collect::<CellVec>());

    let model_lhs: BTreeSet<u32> = input
        .lhs
        .iter()
        .map(|&v| u32::from(v))
        .filter(|&v| (v as usize) < rows)
        .collect();
    let model_rhs: BTreeSet<u32> = input
        .rhs
        .iter()
        .map(|&v| u32::from(v))
        .filter(|&v| (v as usize) < rows)
        .collect();

    let a = Selection::from_sorted(&host, model_lhs.iter().copied().collect()).unwrap();
    let b = Selection::from_sorted(&host, model_rhs.iter().copied().collect()).unwrap();

    let union = a.union(&b).unwrap();
    assert!(union
        .indices()
        .iter()
        .copied()
        .eq(model_lhs.union(&model_rhs).copied()));

    let inter = a.intersection(&b).unwrap();
    assert!(inter
        .indices()
        .iter()
        .copied()
        .eq(model_lhs.intersection(&model_rhs).copied()));

    let diff = a.difference(&b).unwrap();
    assert!(diff
        .indices()
        .iter()
        .copied()
        .eq(model_lhs.difference(&model_rhs).copied()));

    let sym = a.symmetric_difference(&b).unwrap();
    assert!(sym
        .indices()
        .iter()
        .copied()
        .eq(model_lhs.symmetric_difference(&model_rhs).copied()));

    assert_eq!(a.is_superset(&b).unwrap(), model_rhs.is_subset(&model_lhs));

    // Reading the merged selection back must hit exactly the rows it names.
    let view = SelectionView::new(&host, &union).unwrap();
    assert_eq!(view.len(), union.len());
    for (k, row) in view.iter().enumerate() {
        assert_eq!(*row.slot(), union.indices()[k]);
    }

    let evens = view.refine(|r| r.slot() % 2 == 0);
    assert!(evens.indices().iter().all(|i| i % 2 == 0));
    assert!(union.is_superset(&evens).unwrap());
});
