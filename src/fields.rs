//! # Field Tags and Column Lookup
//!
//! Columns are addressed by *tag types*, not by string names or positional
//! indices. A tag is a zero-sized type implementing [`FieldTag`]; its
//! associated `Value` type is the element type of that column. Every column
//! lookup therefore resolves at compile time and a request for a field a
//! source does not carry fails to type-check instead of failing at runtime.
//!
//! ## Design
//!
//! Lookup is driven by [`ColumnSource`], which a view implements once per
//! tag it carries. Composite sources built by zipping implement it by
//! forwarding into one side; the `Path` type parameter ([`Here`], [`Left`],
//! [`Right`]) records which side, so the compiler can derive the route by
//! type inference. When a tag is reachable through more than one route (the
//! same field zipped in twice) inference finds two candidate paths and
//! rejects the call as ambiguous, which is exactly the duplicate-field
//! safeguard the zip layer relies on.
//!
//! [`Gather`] builds a whole view struct out of any source that can serve
//! all of its tags. It is implemented by the `soa!` macro for each generated
//! slice type and is what powers projection between skins.

use std::marker::PhantomData;

/// A zero-sized type naming one column and fixing its element type.
///
/// Tags are usually declared through the `fields!` or `soa!` macros rather
/// than by hand:
///
/// ```ignore
/// fields! {
///     /// Transverse momentum in GeV.
///     pub Pt: f64,
/// }
/// ```
pub trait FieldTag: 'static {
    /// Element type stored in this column.
    type Value;

    /// Field name as written in the container declaration.
    const NAME: &'static str;
}

/// Path marker: the source itself carries the column.
pub struct Here;

/// Path marker: the column sits in the left half of a zip pair, reached
/// by the remaining path `P`.
pub struct Left<P>(PhantomData<P>);

/// Path marker: the column sits in the right half of a zip pair, reached
/// by the remaining path `P`.
pub struct Right<P>(PhantomData<P>);

/// Access to the column tagged `F`, routed by the path `P`.
///
/// Sources are lightweight handles (slice bundles, references, zip pairs),
/// so `column` takes `self` by value; the returned slice borrows from the
/// underlying storage for `'a`, never from the handle itself.
pub trait ColumnSource<'a, F: FieldTag, P>: Copy {
    /// The column's storage as a slice.
    fn column(self) -> &'a [F::Value];
}

/// Construction of a view struct from any source that can serve every one
/// of its columns.
///
/// `Paths` is a tuple with one path type per field, in declaration order.
/// Callers never name it; inference fills it in, and fails loudly when a
/// field is missing from the source or reachable twice.
pub trait Gather<'a, Src, Paths>: Sized {
    /// Pulls every column of `Self` out of `src`.
    fn gather(src: Src) -> Self;
}
