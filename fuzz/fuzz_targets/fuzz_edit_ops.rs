//! Fuzz testing for container editing.
//!
//! Drives a generated columnar container through arbitrary edit
//! sequences and checks it row for row against a plain `Vec` model.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use parcol::{fields, soa};

fields! {
    pub K: u16,
    pub V: i32,
}

soa! {
    pub struct Entry {
        key: u16 => K,
        value: i32 => V,
    }
}

#[derive(Debug, Arbitrary)]
enum EditOp {
    Push { key: u16, value: i32 },
    Pop,
    Insert { at: u16, key: u16, value: i32 },
    Remove { at: u16 },
    Truncate { keep: u16 },
    SetRow { at: u16, key: u16, value: i32 },
    SwapRows { a: u16, b: u16 },
    RemoveRange { start: u16, end: u16 },
}

fuzz_target!(|ops: Vec<EditOp>| {
    let mut subject = EntryVec::new();
    let mut model: Vec<Entry> = Vec::new();

    for op in ops {
        let n = model.len();
        match op {
            EditOp::Push { key, value } => {
                subject.push((key, value));
                model.push(Entry { key, value });
            }
            EditOp::Pop => {
                assert_eq!(subject.pop(), model.pop());
            }
            EditOp::Insert { at, key, value } => {
                let at = (at as usize) % (n + 1);
                subject.insert(at, (key, value));
                model.insert(at, Entry { key, value });
            }
            EditOp::Remove { at } if n > 0 => {
                let at = (at as usize) % n;
                assert_eq!(subject.remove(at), model.remove(at));
            }
            EditOp::Remove { .. } => {}
            EditOp::Truncate { keep } => {
                subject.truncate(keep as usize);
                model.truncate(keep as usize);
            }
            EditOp::SetRow { at, key, value } if n > 0 => {
                let at = (at as usize) % n;
                subject.set_row(at, Entry { key, value });
                model[at] = Entry { key, value };
            }
            EditOp::SetRow { .. } => {}
            EditOp::SwapRows { a, b } if n > 0 => {
                let (a, b) = ((a as usize) % n, (b as usize) % n);
                subject.swap_rows(a, b);
                model.swap(a, b);
            }
            EditOp::SwapRows { .. } => {}
            EditOp::RemoveRange { start, end } if n > 0 => {
                let start = (start as usize) % (n + 1);
                let end = start + ((end as usize) % (n - start + 1));
                subject.remove_range(start..end);
                model.drain(start..end);
            }
            EditOp::RemoveRange { .. } => {}
        }

        assert_eq!(subject.row_count(), model.len());
        assert_eq!(subject.key().len(), subject.value().len());
    }

    for (got, want) in subject.iter().zip(model.iter()) {
        assert_eq!(got.to_owned(), *want);
    }
});
