//! # Code Generation Macros
//!
//! The public surface of a columnar family is generated, not written by
//! hand. [`fields!`] declares the tag types that name columns; [`soa!`]
//! takes a record declaration and expands it into the full
//! structure-of-arrays bundle around that record:
//!
//! | Generated type                 | Role                                   |
//! |--------------------------------|----------------------------------------|
//! | `Hit`                          | detached row value                     |
//! | `HitVec`                       | owning container, one buffer per field |
//! | `HitSlices<'a>`                | borrowed view, `Copy`, public slices   |
//! | `HitSlicesMut<'a>`             | borrowed mutable view (overwrite only) |
//! | `HitRef<'a>`                   | shared row handle {view, index}, `Copy`|
//! | `HitMut<'a>`                   | mutable row handle, one `&mut`/field   |
//! | `HitIter`/`HitIterMut`/`HitIntoIter` | row iterators                    |
//!
//! Rows are a logical fiction: all state lives in the per-field columns and
//! handles resolve on access, so a loop over one field touches only that
//! field's buffer.
//!
//! ## Requirements on field types
//!
//! Field value types must be `Clone + Debug + PartialEq + PartialOrd`; the
//! generated comparison, fill and sort machinery relies on them. Field
//! names share a namespace with the generated accessor methods
//! (`row_count`, `push`, `get`, `iter`, ...); a colliding name fails to
//! compile with a duplicate-definition error.

/// Declares zero-sized field tag types.
///
/// Each entry becomes a unit struct implementing
/// [`FieldTag`](crate::FieldTag) with the given value type; the tag's
/// `NAME` is its snake-cased type name. Tags are shared between skins:
/// two record types declaring the same tag can be projected and zipped
/// into one another, because the tag, not the field position, identifies
/// the column.
///
/// ```ignore
/// fields! {
///     /// X coordinate in millimetres.
///     pub X: f64,
///     pub Y: f64,
///     pub TrackId: u32,
/// }
/// ```
#[macro_export]
macro_rules! fields {
    ( $( $(#[$meta:meta])* $vis:vis $name:ident : $ty:ty ),+ $(,)? ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug)]
            $vis struct $name;

            impl $crate::FieldTag for $name {
                type Value = $ty;
                const NAME: &'static str =
                    $crate::paste::paste! { stringify!([<$name:snake>]) };
            }
        )+
    };
}

/// Declares a record type ("skin") and generates its columnar family.
///
/// Every field maps a name and value type onto a previously declared tag:
///
/// ```ignore
/// soa! {
///     /// A reconstructed hit.
///     pub struct Hit {
///         x: f64 => X,
///         y: f64 => Y,
///         track: u32 => TrackId,
///     }
/// }
///
/// let mut hits = HitVec::new();
/// hits.push((1.0, 2.0, 7u32));
/// assert_eq!(hits.row(0).x(), &1.0);
/// for mut h in hits.iter_mut() {
///     h.set_x(*h.x() + 0.5);
/// }
/// ```
///
/// The declared value type must match the tag's `FieldTag::Value` (checked
/// at expansion time), and a tag may appear at most once per skin (a
/// duplicate produces conflicting trait impls). Extra row or container
/// methods are ordinary `impl` blocks on the generated types.
#[macro_export]
macro_rules! soa {
    (@first_len $self:expr; $first:ident $(, $rest:ident)*) => {
        $self.$first.len()
    };

    (
        $(#[$smeta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty => $tag:ty ),+ $(,)?
        }
    ) => { $crate::paste::paste! {
        const _: () = {
            // Declared value types must agree with the tags' value types;
            // a mismatch fails here naming the offending parameter.
            #[allow(dead_code)]
            fn structural_match(
                $( $field: <$tag as $crate::FieldTag>::Value ),+
            ) -> ( $($ty,)+ ) {
                ( $($field,)+ )
            }
        };

        // ------------------------------------------------------------------
        // Row value
        // ------------------------------------------------------------------

        $(#[$smeta])*
        #[derive(Clone, Debug, PartialEq, PartialOrd)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )+
        }

        impl From<( $($ty,)+ )> for $name {
            fn from(row: ( $($ty,)+ )) -> Self {
                let ( $($field,)+ ) = row;
                Self { $($field),+ }
            }
        }

        // ------------------------------------------------------------------
        // Owning container
        // ------------------------------------------------------------------

        #[doc = "Owning columnar container for [`" $name "`] rows."]
        #[doc = ""]
        #[doc = "Each field lives in its own cache-line-aligned buffer; all"]
        #[doc = "buffers hold the same number of elements whenever a method"]
        #[doc = "returns."]
        #[derive(Clone, Debug, Default)]
        $vis struct [<$name Vec>] {
            $( $field: $crate::AlignedVec<$ty>, )+
        }

        impl [<$name Vec>] {
            /// Field names in declaration order.
            $vis const FIELD_NAMES: &'static [&'static str] =
                &[ $( stringify!($field) ),+ ];

            /// Position of `name` in [`Self::FIELD_NAMES`].
            $vis fn field_index(name: &str) -> Option<usize> {
                Self::FIELD_NAMES.iter().position(|n| *n == name)
            }

            /// New empty container; no buffers are allocated.
            $vis fn new() -> Self {
                Self { $( $field: $crate::AlignedVec::new() ),+ }
            }

            /// New empty container with room for `n` rows in every column.
            $vis fn with_capacity(n: usize) -> Self {
                Self { $( $field: $crate::AlignedVec::with_capacity(n) ),+ }
            }

            /// Builds a container from one ready-made column per field.
            ///
            /// All columns must have equal length; a mismatch is reported
            /// against the first disagreeing field.
            $vis fn from_columns(
                $( $field: impl Into<$crate::AlignedVec<$ty>> ),+
            ) -> $crate::Result<Self> {
                $( let $field: $crate::AlignedVec<$ty> = $field.into(); )+
                let lens: $crate::__private::SmallVec<[(&'static str, usize); 8]> =
                    [ $( (stringify!($field), $field.len()) ),+ ]
                        .into_iter()
                        .collect();
                let expected = lens[0].1;
                for &(field, got) in lens.iter() {
                    if got != expected {
                        $crate::eyre::bail!($crate::ColumnLengthMismatch {
                            field,
                            expected,
                            got,
                        });
                    }
                }
                Ok(Self { $($field),+ })
            }

            /// Builds a container by pushing every row of `rows`.
            $vis fn from_rows<I>(rows: I) -> Self
            where
                I: IntoIterator,
                I::Item: Into<$name>,
            {
                let rows = rows.into_iter();
                let mut out = Self::with_capacity(rows.size_hint().0);
                for row in rows {
                    out.push(row);
                }
                out
            }

            /// Number of rows.
            #[inline]
            $vis fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }

            /// Returns true if the container holds no rows.
            #[inline]
            $vis fn is_empty(&self) -> bool {
                self.row_count() == 0
            }

            /// Rows every column can hold without reallocating.
            $vis fn capacity(&self) -> usize {
                let mut cap = usize::MAX;
                $( cap = cap.min(self.$field.capacity()); )+
                cap
            }

            /// Reserves room for at least `additional` more rows in every
            /// column.
            $vis fn reserve(&mut self, additional: usize) {
                $( self.$field.reserve(additional); )+
            }

            /// Reserves room for exactly `additional` more rows.
            $vis fn reserve_exact(&mut self, additional: usize) {
                $( self.$field.reserve_exact(additional); )+
            }

            /// Drops excess capacity in every column.
            $vis fn shrink_to_fit(&mut self) {
                $( self.$field.shrink_to_fit(); )+
            }

            /// Removes every row.
            $vis fn clear(&mut self) {
                $( self.$field.clear(); )+
            }

            /// Keeps the first `n` rows, dropping the rest.
            $vis fn truncate(&mut self, n: usize) {
                $( self.$field.truncate(n); )+
            }

            /// Appends one row. Accepts the row type or a plain tuple of
            /// field values.
            #[inline]
            $vis fn push(&mut self, row: impl Into<$name>) {
                let row = row.into();
                $( self.$field.reserve(1); )+
                $( self.$field.push(row.$field); )+
            }

            /// Removes and returns the last row.
            $vis fn pop(&mut self) -> Option<$name> {
                let n = self.row_count();
                if n == 0 {
                    return None;
                }
                Some($name { $( $field: self.$field.remove(n - 1) ),+ })
            }

            /// Inserts a row at `at`, shifting later rows up by one.
            $vis fn insert(&mut self, at: usize, row: impl Into<$name>) {
                let row = row.into();
                $( self.$field.reserve(1); )+
                $( self.$field.insert(at, row.$field); )+
            }

            /// Inserts every row of `rows` starting at `at`, preserving
            /// order.
            $vis fn insert_slice(&mut self, at: usize, rows: [<$name Slices>]<'_>) {
                $( self.$field.insert_slice(at, rows.$field); )+
            }

            /// Removes and returns the row at `at`, shifting later rows
            /// down by one.
            $vis fn remove(&mut self, at: usize) -> $name {
                $name { $( $field: self.$field.remove(at) ),+ }
            }

            /// Removes the rows in `range`, shifting the tail down.
            $vis fn remove_range(&mut self, range: core::ops::Range<usize>) {
                let (start, end) = (range.start, range.end);
                $( self.$field.remove_range(start, end); )+
            }

            /// Keeps only the rows for which `keep` returns true,
            /// preserving order.
            $vis fn retain<F>(&mut self, mut keep: F)
            where
                F: FnMut([<$name Ref>]<'_>) -> bool,
            {
                let n = self.row_count();
                let mut mask = Vec::with_capacity(n);
                {
                    let view = self.as_slices();
                    for at in 0..n {
                        mask.push(keep(view.row(at)));
                    }
                }
                $(
                    let col = &mut self.$field;
                    let mut write = 0;
                    for read in 0..n {
                        if mask[read] {
                            if read != write {
                                col.swap(write, read);
                            }
                            write += 1;
                        }
                    }
                    col.truncate(write);
                )+
            }

            /// Resizes to `n` rows, padding with clones of `row`.
            $vis fn resize(&mut self, n: usize, row: $name) {
                $( self.$field.resize(n, row.$field); )+
            }

            /// Overwrites the row at `at` with `row`.
            $vis fn set_row(&mut self, at: usize, row: $name) {
                $( self.$field[at] = row.$field; )+
            }

            /// Exchanges the field values of rows `a` and `b`.
            $vis fn swap_rows(&mut self, a: usize, b: usize) {
                $( self.$field.swap(a, b); )+
            }

            /// Overwrites every row with clones of `row`.
            $vis fn fill(&mut self, row: $name) {
                self.as_slices_mut().fill(row);
            }

            /// Shared handle for the row at `at`, or `None` out of bounds.
            #[inline]
            $vis fn get(&self, at: usize) -> Option<[<$name Ref>]<'_>> {
                self.as_slices().get(at)
            }

            /// Shared handle for the row at `at`. Panics out of bounds.
            #[inline]
            $vis fn row(&self, at: usize) -> [<$name Ref>]<'_> {
                self.as_slices().row(at)
            }

            /// Handle for the first row, if any.
            $vis fn first(&self) -> Option<[<$name Ref>]<'_>> {
                self.get(0)
            }

            /// Handle for the last row, if any.
            $vis fn last(&self) -> Option<[<$name Ref>]<'_>> {
                self.row_count().checked_sub(1).and_then(|at| self.get(at))
            }

            /// Borrowed view of every column.
            #[inline]
            $vis fn as_slices(&self) -> [<$name Slices>]<'_> {
                [<$name Slices>] { $( $field: self.$field.as_slice() ),+ }
            }

            /// Borrowed mutable view of every column.
            #[inline]
            $vis fn as_slices_mut(&mut self) -> [<$name SlicesMut>]<'_> {
                [<$name SlicesMut>] { $( $field: self.$field.as_mut_slice() ),+ }
            }

            /// Iterates shared row handles.
            $vis fn iter(&self) -> [<$name Iter>]<'_> {
                self.as_slices().into_iter()
            }

            /// Iterates mutable row handles.
            $vis fn iter_mut(&mut self) -> [<$name IterMut>]<'_> {
                self.as_slices_mut().into_iter()
            }

            /// Appends clones of every row of `rows`.
            $vis fn extend_from_slices(&mut self, rows: [<$name Slices>]<'_>) {
                $( self.$field.extend_from_slice(rows.$field); )+
            }

            /// Stable row sort by a comparison on shared handles. The
            /// resulting permutation is applied to every column.
            $vis fn sort_by<F>(&mut self, mut cmp: F)
            where
                F: FnMut([<$name Ref>]<'_>, [<$name Ref>]<'_>) -> core::cmp::Ordering,
            {
                let mut order: Vec<usize> = (0..self.row_count()).collect();
                {
                    let view = self.as_slices();
                    order.sort_by(|&a, &b| cmp(view.row(a), view.row(b)));
                }
                $(
                    let mut sorted = $crate::AlignedVec::with_capacity(self.$field.len());
                    for &from in order.iter() {
                        sorted.push(self.$field[from].clone());
                    }
                    self.$field = sorted;
                )+
            }

            /// Stable row sort by a key extracted from shared handles.
            $vis fn sort_by_key<K, F>(&mut self, mut key: F)
            where
                K: Ord,
                F: FnMut([<$name Ref>]<'_>) -> K,
            {
                self.sort_by(|a, b| key(a).cmp(&key(b)));
            }

            $(
                #[doc = "The `" $field "` column."]
                #[inline]
                $vis fn $field(&self) -> &[$ty] {
                    &self.$field
                }

                #[doc = "The `" $field "` column, mutable."]
                #[inline]
                $vis fn [<$field _mut>](&mut self) -> &mut [$ty] {
                    &mut self.$field
                }
            )+
        }

        impl PartialEq for [<$name Vec>] {
            fn eq(&self, other: &Self) -> bool {
                self.as_slices() == other.as_slices()
            }
        }

        impl PartialOrd for [<$name Vec>] {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                self.as_slices().partial_cmp(&other.as_slices())
            }
        }

        impl<R: Into<$name>> Extend<R> for [<$name Vec>] {
            fn extend<I: IntoIterator<Item = R>>(&mut self, rows: I) {
                let rows = rows.into_iter();
                self.reserve(rows.size_hint().0);
                for row in rows {
                    self.push(row);
                }
            }
        }

        impl<R: Into<$name>> FromIterator<R> for [<$name Vec>] {
            fn from_iter<I: IntoIterator<Item = R>>(rows: I) -> Self {
                let mut out = Self::new();
                out.extend(rows);
                out
            }
        }

        // ------------------------------------------------------------------
        // Borrowed views
        // ------------------------------------------------------------------

        #[doc = "Borrowed view over the columns of a [`" [<$name Vec>] "`] (or"]
        #[doc = "any equal-length slices). The field slices are public for"]
        #[doc = "direct per-column iteration; [`Self::new`] is the checked"]
        #[doc = "constructor upholding the equal-length contract."]
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
        $vis struct [<$name Slices>]<'a> {
            $( $(#[$fmeta])* pub $field: &'a [$ty], )+
        }

        impl<'a> [<$name Slices>]<'a> {
            /// Builds a view from one slice per field, verifying that all
            /// lengths agree.
            $vis fn new( $( $field: &'a [$ty] ),+ ) -> $crate::Result<Self> {
                let lens: $crate::__private::SmallVec<[(&'static str, usize); 8]> =
                    [ $( (stringify!($field), $field.len()) ),+ ]
                        .into_iter()
                        .collect();
                let expected = lens[0].1;
                for &(field, got) in lens.iter() {
                    if got != expected {
                        $crate::eyre::bail!($crate::ColumnLengthMismatch {
                            field,
                            expected,
                            got,
                        });
                    }
                }
                Ok(Self { $($field),+ })
            }

            /// Number of rows.
            #[inline]
            $vis fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }

            /// Returns true if the view covers no rows.
            #[inline]
            $vis fn is_empty(&self) -> bool {
                self.row_count() == 0
            }

            /// Shared handle for the row at `at`, or `None` out of bounds.
            #[inline]
            $vis fn get(&self, at: usize) -> Option<[<$name Ref>]<'a>> {
                if at < self.row_count() {
                    Some([<$name Ref>] { __view: *self, __at: at })
                } else {
                    None
                }
            }

            /// Shared handle for the row at `at`. Panics out of bounds.
            #[inline]
            $vis fn row(&self, at: usize) -> [<$name Ref>]<'a> {
                let n = self.row_count();
                if at >= n {
                    panic!("row index (is {at}) should be < row count (is {n})");
                }
                [<$name Ref>] { __view: *self, __at: at }
            }

            /// Handle for the first row, if any.
            $vis fn first(&self) -> Option<[<$name Ref>]<'a>> {
                self.get(0)
            }

            /// Handle for the last row, if any.
            $vis fn last(&self) -> Option<[<$name Ref>]<'a>> {
                self.row_count().checked_sub(1).and_then(|at| self.get(at))
            }

            /// Sub-view covering the rows in `range`. Panics when the
            /// range is out of bounds.
            $vis fn slice(&self, range: core::ops::Range<usize>) -> [<$name Slices>]<'a> {
                let (start, end) = (range.start, range.end);
                [<$name Slices>] { $( $field: &self.$field[start..end] ),+ }
            }

            /// Iterates shared row handles.
            $vis fn iter(&self) -> [<$name Iter>]<'a> {
                (*self).into_iter()
            }

            /// Materializes the viewed rows into a new owning container.
            $vis fn to_vec(&self) -> [<$name Vec>] {
                let mut out = [<$name Vec>]::with_capacity(self.row_count());
                out.extend_from_slices(*self);
                out
            }
        }

        #[doc = "Borrowed mutable view over the columns of a"]
        #[doc = "[`" [<$name Vec>] "`]. Overwrite-only: rows can be read and"]
        #[doc = "replaced but the row count is fixed."]
        #[derive(Debug)]
        $vis struct [<$name SlicesMut>]<'a> {
            $( $(#[$fmeta])* pub $field: &'a mut [$ty], )+
        }

        impl<'a> [<$name SlicesMut>]<'a> {
            /// Builds a mutable view from one slice per field, verifying
            /// that all lengths agree.
            $vis fn new( $( $field: &'a mut [$ty] ),+ ) -> $crate::Result<Self> {
                let lens: $crate::__private::SmallVec<[(&'static str, usize); 8]> =
                    [ $( (stringify!($field), $field.len()) ),+ ]
                        .into_iter()
                        .collect();
                let expected = lens[0].1;
                for &(field, got) in lens.iter() {
                    if got != expected {
                        $crate::eyre::bail!($crate::ColumnLengthMismatch {
                            field,
                            expected,
                            got,
                        });
                    }
                }
                Ok(Self { $($field),+ })
            }

            /// Number of rows.
            #[inline]
            $vis fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }

            /// Returns true if the view covers no rows.
            #[inline]
            $vis fn is_empty(&self) -> bool {
                self.row_count() == 0
            }

            /// Shared flavor of this view, borrowing from it.
            $vis fn as_shared(&self) -> [<$name Slices>]<'_> {
                [<$name Slices>] { $( $field: &*self.$field ),+ }
            }

            /// Fresh mutable view borrowing from this one; lets a view be
            /// consumed more than once.
            $vis fn reborrow(&mut self) -> [<$name SlicesMut>]<'_> {
                [<$name SlicesMut>] { $( $field: &mut *self.$field ),+ }
            }

            /// Shared handle for the row at `at`, or `None` out of bounds.
            $vis fn get(&self, at: usize) -> Option<[<$name Ref>]<'_>> {
                self.as_shared().get(at)
            }

            /// Shared handle for the row at `at`. Panics out of bounds.
            $vis fn row(&self, at: usize) -> [<$name Ref>]<'_> {
                self.as_shared().row(at)
            }

            /// Mutable handle for the row at `at`, or `None` out of bounds.
            $vis fn get_mut(&mut self, at: usize) -> Option<[<$name Mut>]<'_>> {
                if at < self.row_count() {
                    Some([<$name Mut>] { __at: at, $( $field: &mut self.$field[at] ),+ })
                } else {
                    None
                }
            }

            /// Mutable handle for the row at `at`. Panics out of bounds.
            $vis fn row_mut(&mut self, at: usize) -> [<$name Mut>]<'_> {
                let n = self.row_count();
                if at >= n {
                    panic!("row index (is {at}) should be < row count (is {n})");
                }
                [<$name Mut>] { __at: at, $( $field: &mut self.$field[at] ),+ }
            }

            /// Overwrites the row at `at` with `row`.
            $vis fn set_row(&mut self, at: usize, row: $name) {
                $( self.$field[at] = row.$field; )+
            }

            /// Exchanges the field values of rows `a` and `b`.
            $vis fn swap_rows(&mut self, a: usize, b: usize) {
                $( self.$field.swap(a, b); )+
            }

            /// Overwrites every row with clones of `row`.
            $vis fn fill(&mut self, row: $name) {
                $(
                    for slot in self.$field.iter_mut() {
                        *slot = row.$field.clone();
                    }
                )+
            }

            /// Overwrites rows from the front with `rows`, stopping when
            /// the input runs out. Returns the number of rows written; an
            /// input longer than the view is an error, reported at the
            /// first excess row (so unbounded inputs still fail promptly).
            $vis fn assign_from_iter<I>(&mut self, rows: I) -> $crate::Result<usize>
            where
                I: IntoIterator,
                I::Item: Into<$name>,
            {
                let n = self.row_count();
                let mut rows = rows.into_iter();
                let mut at = 0;
                while at < n {
                    match rows.next() {
                        Some(row) => {
                            self.set_row(at, row.into());
                            at += 1;
                        }
                        None => return Ok(at),
                    }
                }
                if rows.next().is_some() {
                    $crate::eyre::bail!($crate::AssignOverflow {
                        rows: n,
                        supplied: n + 1,
                    });
                }
                Ok(at)
            }

            /// Iterates shared row handles.
            $vis fn iter(&self) -> [<$name Iter>]<'_> {
                self.as_shared().into_iter()
            }

            /// Iterates mutable row handles.
            $vis fn iter_mut(&mut self) -> [<$name IterMut>]<'_> {
                self.reborrow().into_iter()
            }
        }

        // ------------------------------------------------------------------
        // Row handles
        // ------------------------------------------------------------------

        #[doc = "Shared handle to one row of a [`" [<$name Slices>] "`] view."]
        #[doc = ""]
        #[doc = "A plain {view, index} pair: copying it copies no row data,"]
        #[doc = "and getters return references into the underlying columns."]
        #[derive(Clone, Copy)]
        $vis struct [<$name Ref>]<'a> {
            __view: [<$name Slices>]<'a>,
            __at: usize,
        }

        impl<'a> [<$name Ref>]<'a> {
            /// Row position inside the underlying view.
            #[inline]
            $vis fn index(self) -> usize {
                self.__at
            }

            /// Detaches this row into an owned value.
            $vis fn to_owned(self) -> $name {
                $name { $( $field: self.__view.$field[self.__at].clone() ),+ }
            }

            $(
                #[doc = "The `" $field "` value of this row."]
                #[inline]
                $vis fn $field(self) -> &'a $ty {
                    &self.__view.$field[self.__at]
                }
            )+
        }

        impl core::fmt::Debug for [<$name Ref>]<'_> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!([<$name Ref>]))
                    $( .field(stringify!($field), self.$field()) )+
                    .finish()
            }
        }

        impl<'a, 'b> PartialEq<[<$name Ref>]<'b>> for [<$name Ref>]<'a> {
            fn eq(&self, other: &[<$name Ref>]<'b>) -> bool {
                $( self.$field() == other.$field() && )+ true
            }
        }

        impl PartialEq<$name> for [<$name Ref>]<'_> {
            fn eq(&self, other: &$name) -> bool {
                $( self.$field() == &other.$field && )+ true
            }
        }

        impl PartialEq<[<$name Ref>]<'_>> for $name {
            fn eq(&self, other: &[<$name Ref>]<'_>) -> bool {
                other == self
            }
        }

        impl<'a, 'b> PartialOrd<[<$name Ref>]<'b>> for [<$name Ref>]<'a> {
            fn partial_cmp(&self, other: &[<$name Ref>]<'b>) -> Option<core::cmp::Ordering> {
                $(
                    match self.$field().partial_cmp(other.$field()) {
                        Some(core::cmp::Ordering::Equal) => {}
                        non_eq => return non_eq,
                    }
                )+
                Some(core::cmp::Ordering::Equal)
            }
        }

        impl PartialOrd<$name> for [<$name Ref>]<'_> {
            fn partial_cmp(&self, other: &$name) -> Option<core::cmp::Ordering> {
                $(
                    match self.$field().partial_cmp(&other.$field) {
                        Some(core::cmp::Ordering::Equal) => {}
                        non_eq => return non_eq,
                    }
                )+
                Some(core::cmp::Ordering::Equal)
            }
        }

        #[doc = "Mutable handle to one row: a `&mut` per field, resolved"]
        #[doc = "once, so field writes need no further indexing."]
        #[derive(Debug)]
        $vis struct [<$name Mut>]<'a> {
            __at: usize,
            $( $(#[$fmeta])* pub $field: &'a mut $ty, )+
        }

        impl<'a> [<$name Mut>]<'a> {
            /// Row position inside the underlying view.
            #[inline]
            $vis fn index(&self) -> usize {
                self.__at
            }

            /// Detaches this row into an owned value.
            $vis fn to_owned(&self) -> $name {
                $name { $( $field: (*self.$field).clone() ),+ }
            }

            /// Overwrites every field from `row`.
            $vis fn assign(&mut self, row: $name) {
                $( *self.$field = row.$field; )+
            }

            $(
                #[doc = "The `" $field "` value of this row."]
                #[inline]
                $vis fn $field(&self) -> &$ty {
                    &*self.$field
                }

                #[doc = "The `" $field "` value of this row, mutable."]
                #[inline]
                $vis fn [<$field _mut>](&mut self) -> &mut $ty {
                    &mut *self.$field
                }

                #[doc = "Sets the `" $field "` value of this row."]
                #[inline]
                $vis fn [<set_ $field>](&mut self, value: $ty) {
                    *self.$field = value;
                }
            )+
        }

        // ------------------------------------------------------------------
        // Iterators
        // ------------------------------------------------------------------

        #[doc = "Iterator of shared [`" [<$name Ref>] "`] handles."]
        #[derive(Clone, Debug)]
        $vis struct [<$name Iter>]<'a> {
            __view: [<$name Slices>]<'a>,
            __front: usize,
            __back: usize,
        }

        impl<'a> Iterator for [<$name Iter>]<'a> {
            type Item = [<$name Ref>]<'a>;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                if self.__front >= self.__back {
                    return None;
                }
                let at = self.__front;
                self.__front += 1;
                Some([<$name Ref>] { __view: self.__view, __at: at })
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let n = self.__back - self.__front;
                (n, Some(n))
            }
        }

        impl DoubleEndedIterator for [<$name Iter>]<'_> {
            fn next_back(&mut self) -> Option<Self::Item> {
                if self.__front >= self.__back {
                    return None;
                }
                self.__back -= 1;
                Some([<$name Ref>] { __view: self.__view, __at: self.__back })
            }
        }

        impl ExactSizeIterator for [<$name Iter>]<'_> {}
        impl core::iter::FusedIterator for [<$name Iter>]<'_> {}

        #[doc = "Iterator of mutable [`" [<$name Mut>] "`] handles."]
        #[derive(Debug)]
        $vis struct [<$name IterMut>]<'a> {
            __front: usize,
            __back: usize,
            $( $field: core::slice::IterMut<'a, $ty>, )+
        }

        impl<'a> Iterator for [<$name IterMut>]<'a> {
            type Item = [<$name Mut>]<'a>;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                $( let $field = self.$field.next()?; )+
                let at = self.__front;
                self.__front += 1;
                Some([<$name Mut>] { __at: at, $($field),+ })
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let n = self.__back - self.__front;
                (n, Some(n))
            }
        }

        impl DoubleEndedIterator for [<$name IterMut>]<'_> {
            fn next_back(&mut self) -> Option<Self::Item> {
                $( let $field = self.$field.next_back()?; )+
                self.__back -= 1;
                Some([<$name Mut>] { __at: self.__back, $($field),+ })
            }
        }

        impl ExactSizeIterator for [<$name IterMut>]<'_> {}
        impl core::iter::FusedIterator for [<$name IterMut>]<'_> {}

        #[doc = "Owning row iterator, yielding detached [`" $name "`] values."]
        #[derive(Debug)]
        $vis struct [<$name IntoIter>] {
            $( $field: std::vec::IntoIter<$ty>, )+
        }

        impl Iterator for [<$name IntoIter>] {
            type Item = $name;

            fn next(&mut self) -> Option<Self::Item> {
                $( let $field = self.$field.next()?; )+
                Some($name { $($field),+ })
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let n = $crate::soa!(@first_len self; $($field),+);
                (n, Some(n))
            }
        }

        impl DoubleEndedIterator for [<$name IntoIter>] {
            fn next_back(&mut self) -> Option<Self::Item> {
                $( let $field = self.$field.next_back()?; )+
                Some($name { $($field),+ })
            }
        }

        impl ExactSizeIterator for [<$name IntoIter>] {}
        impl core::iter::FusedIterator for [<$name IntoIter>] {}

        impl<'a> IntoIterator for [<$name Slices>]<'a> {
            type Item = [<$name Ref>]<'a>;
            type IntoIter = [<$name Iter>]<'a>;

            fn into_iter(self) -> Self::IntoIter {
                let back = self.row_count();
                [<$name Iter>] { __view: self, __front: 0, __back: back }
            }
        }

        impl<'a> IntoIterator for [<$name SlicesMut>]<'a> {
            type Item = [<$name Mut>]<'a>;
            type IntoIter = [<$name IterMut>]<'a>;

            fn into_iter(self) -> Self::IntoIter {
                let back = $crate::soa!(@first_len self; $($field),+);
                [<$name IterMut>] {
                    __front: 0,
                    __back: back,
                    $( $field: <[$ty]>::iter_mut(self.$field) ),+
                }
            }
        }

        impl<'a> IntoIterator for &'a [<$name Vec>] {
            type Item = [<$name Ref>]<'a>;
            type IntoIter = [<$name Iter>]<'a>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a> IntoIterator for &'a mut [<$name Vec>] {
            type Item = [<$name Mut>]<'a>;
            type IntoIter = [<$name IterMut>]<'a>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter_mut()
            }
        }

        impl IntoIterator for [<$name Vec>] {
            type Item = $name;
            type IntoIter = [<$name IntoIter>];

            fn into_iter(self) -> Self::IntoIter {
                [<$name IntoIter>] {
                    $( $field: self.$field.into_vec().into_iter() ),+
                }
            }
        }

        // ------------------------------------------------------------------
        // Trait wiring
        // ------------------------------------------------------------------

        impl $crate::Rows for [<$name Vec>] {
            fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }
        }

        impl $crate::Rows for [<$name Slices>]<'_> {
            fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }
        }

        impl $crate::Rows for [<$name SlicesMut>]<'_> {
            fn row_count(&self) -> usize {
                $crate::soa!(@first_len self; $($field),+)
            }
        }

        impl $crate::RowAccess for [<$name Vec>] {
            type Ref<'r>
                = [<$name Ref>]<'r>
            where
                Self: 'r;

            fn row_at(&self, at: usize) -> [<$name Ref>]<'_> {
                self.row(at)
            }
        }

        impl<'a> $crate::RowAccess for [<$name Slices>]<'a> {
            type Ref<'r>
                = [<$name Ref>]<'r>
            where
                Self: 'r;

            fn row_at(&self, at: usize) -> [<$name Ref>]<'_> {
                self.row(at)
            }
        }

        impl<'a> $crate::RowAccess for [<$name SlicesMut>]<'a> {
            type Ref<'r>
                = [<$name Ref>]<'r>
            where
                Self: 'r;

            fn row_at(&self, at: usize) -> [<$name Ref>]<'_> {
                self.row(at)
            }
        }

        impl $crate::RowSink for [<$name Vec>] {
            type Row = $name;

            fn with_row_capacity(n: usize) -> Self {
                Self::with_capacity(n)
            }

            fn push_row(&mut self, row: $name) {
                self.push(row);
            }
        }

        $(
            impl<'a> $crate::ColumnSource<'a, $tag, $crate::Here> for [<$name Slices>]<'a> {
                fn column(self) -> &'a [$ty] {
                    self.$field
                }
            }

            impl<'a, 'b> $crate::ColumnSource<'a, $tag, $crate::Here> for &'a [<$name Slices>]<'b> {
                fn column(self) -> &'a [$ty] {
                    self.$field
                }
            }

            impl<'a> $crate::ColumnSource<'a, $tag, $crate::Here> for &'a [<$name Vec>] {
                fn column(self) -> &'a [$ty] {
                    self.$field.as_slice()
                }
            }
        )+

        impl<'a, Src, $( [<P $field:camel>] ),+> $crate::Gather<'a, Src, ( $( [<P $field:camel>], )+ )>
            for [<$name Slices>]<'a>
        where
            Src: Copy $( + $crate::ColumnSource<'a, $tag, [<P $field:camel>]> )+,
        {
            fn gather(src: Src) -> Self {
                Self {
                    $( $field: <Src as $crate::ColumnSource<'a, $tag, [<P $field:camel>]>>::column(src) ),+
                }
            }
        }
    } };
}
