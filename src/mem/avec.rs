//! # AlignedVec - Cache-Line-Aligned Column Storage
//!
//! This module implements `AlignedVec<T>`, the growable contiguous buffer
//! backing every column of a generated container. Buffers are allocated at
//! cache-line alignment (64 bytes, or `align_of::<T>()` when that is larger)
//! so per-field loops start on vector-register-friendly boundaries.
//!
//! ## Design
//!
//! - Same shape as `Vec<T>`: `{ptr, cap, len}` with amortized-doubling growth.
//! - `Deref<Target = [T]>` makes the whole slice API available; only the
//!   operations that move the buffer or change `len` are implemented here.
//! - Zero-sized element types never allocate and report `usize::MAX` capacity.
//! - Reallocation goes through `std::alloc::realloc`, which preserves the
//!   alignment of the original layout.
//!
//! ## Usage
//!
//! ```ignore
//! let mut col = AlignedVec::with_capacity(1024);
//! col.push(1.0f32);
//! assert_eq!(col.as_ptr() as usize % 64, 0);
//! ```

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use super::CACHE_LINE;

/// Smallest non-zero capacity allocated on first growth.
const MIN_CAP: usize = 4;

/// A growable, contiguous vector whose buffer is cache-line aligned.
pub struct AlignedVec<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: AlignedVec owns its buffer exclusively; sending it to another
// thread moves unique ownership of the elements, exactly like Vec<T>.
unsafe impl<T: Send> Send for AlignedVec<T> {}
// SAFETY: shared access only hands out &T; same reasoning as Vec<T>.
unsafe impl<T: Sync> Sync for AlignedVec<T> {}

impl<T> AlignedVec<T> {
    /// Buffer alignment for this element type: 64 bytes, or the element's
    /// own alignment when that is stricter.
    pub const ALIGN: usize = if std::mem::align_of::<T>() > CACHE_LINE {
        std::mem::align_of::<T>()
    } else {
        CACHE_LINE
    };

    const IS_ZST: bool = std::mem::size_of::<T>() == 0;

    /// Creates an empty vector without allocating.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for at least `cap` elements.
    pub fn with_capacity(cap: usize) -> Self {
        let mut v = Self::new();
        v.reserve_exact(cap);
        v
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST { usize::MAX } else { self.cap }
    }

    /// Raw pointer to the buffer. Cache-line aligned whenever a buffer has
    /// been allocated (`capacity() > 0` for non-ZST element types).
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable raw pointer to the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Borrows the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements (dangling is fine
        // for len == 0), and the buffer is not aliased mutably while &self
        // is live.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Borrows the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in as_slice, plus &mut self guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Ensures room for at least `additional` more elements, growing
    /// amortized (doubling).
    pub fn reserve(&mut self, additional: usize) {
        let needed = self
            .len
            .checked_add(additional)
            .expect("capacity overflow");
        if needed <= self.capacity() {
            return;
        }
        let target = needed.max(self.cap.saturating_mul(2)).max(MIN_CAP);
        self.grow_to(target);
    }

    /// Ensures room for exactly `len + additional` elements.
    pub fn reserve_exact(&mut self, additional: usize) {
        let needed = self
            .len
            .checked_add(additional)
            .expect("capacity overflow");
        if needed <= self.capacity() {
            return;
        }
        self.grow_to(needed);
    }

    /// Shrinks the buffer to fit `len` exactly, releasing it entirely when
    /// the vector is empty.
    pub fn shrink_to_fit(&mut self) {
        if Self::IS_ZST || self.cap == self.len {
            return;
        }
        if self.len == 0 {
            self.release_buffer();
            return;
        }
        // SAFETY: cap > len > 0, so a buffer exists; the new layout keeps the
        // original alignment and the first len elements stay initialized.
        unsafe {
            let old_layout = Self::layout_for(self.cap);
            let new_size = std::mem::size_of::<T>() * self.len;
            let p = alloc::realloc(self.ptr.as_ptr().cast(), old_layout, new_size);
            if p.is_null() {
                alloc::handle_alloc_error(Layout::from_size_align_unchecked(
                    new_size,
                    Self::ALIGN,
                ));
            }
            self.ptr = NonNull::new_unchecked(p.cast());
            self.cap = self.len;
        }
    }

    /// Appends one element.
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            self.reserve(1);
        }
        // SAFETY: the slot at len is within the (possibly just grown) buffer
        // and uninitialized; writing then bumping len keeps the invariant.
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old last index holds an initialized element
        // that is no longer covered by len after the decrement.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Inserts `value` at `at`, shifting later elements right.
    pub fn insert(&mut self, at: usize, value: T) {
        assert!(
            at <= self.len,
            "insertion index (is {at}) should be <= len (is {})",
            self.len
        );
        self.reserve(1);
        // SAFETY: at <= len < cap after the reserve; the shifted region and
        // the written slot are inside the buffer, and len is bumped to cover
        // the newly initialized slot.
        unsafe {
            let p = self.ptr.as_ptr().add(at);
            ptr::copy(p, p.add(1), self.len - at);
            ptr::write(p, value);
        }
        self.len += 1;
    }

    /// Removes and returns the element at `at`, shifting later elements left.
    pub fn remove(&mut self, at: usize) -> T {
        assert!(
            at < self.len,
            "removal index (is {at}) should be < len (is {})",
            self.len
        );
        // SAFETY: at < len, so the slot holds an initialized element; the
        // tail copy re-compacts the buffer before len shrinks past it.
        unsafe {
            let p = self.ptr.as_ptr().add(at);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - at - 1);
            self.len -= 1;
            value
        }
    }

    /// Removes the elements in `start..end`, shifting the tail left.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        assert!(start <= end, "range start (is {start}) should be <= end (is {end})");
        assert!(
            end <= self.len,
            "range end (is {end}) should be <= len (is {})",
            self.len
        );
        if start == end {
            return;
        }
        // SAFETY: start..end is in bounds and initialized; elements are
        // dropped exactly once, then the tail is moved down and len shrunk
        // to cover only initialized slots.
        unsafe {
            let p = self.ptr.as_ptr();
            ptr::drop_in_place(std::slice::from_raw_parts_mut(p.add(start), end - start));
            ptr::copy(p.add(end), p.add(start), self.len - end);
            self.len -= end - start;
        }
    }

    /// Shortens the vector to `n` elements, dropping the tail.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let tail = self.len - n;
        // Shrink len first so a panicking Drop cannot observe dropped slots.
        self.len = n;
        // SAFETY: the slots n..n+tail were initialized and are no longer
        // covered by len.
        unsafe {
            ptr::drop_in_place(std::slice::from_raw_parts_mut(
                self.ptr.as_ptr().add(n),
                tail,
            ));
        }
    }

    /// Drops every element, keeping the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Moves the elements into a plain `Vec<T>`, consuming self.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        // SAFETY: the first len slots are initialized; after the raw copy we
        // zero len so Drop releases only the buffer, never the elements.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), out.as_mut_ptr(), self.len);
            out.set_len(self.len);
            self.len = 0;
        }
        out
    }

    fn layout_for(cap: usize) -> Layout {
        let size = std::mem::size_of::<T>()
            .checked_mul(cap)
            .expect("capacity overflow");
        assert!(size <= isize::MAX as usize, "capacity overflow");
        // SAFETY: ALIGN is a non-zero power of two and size was checked just
        // above.
        unsafe { Layout::from_size_align_unchecked(size, Self::ALIGN) }
    }

    fn grow_to(&mut self, new_cap: usize) {
        if Self::IS_ZST {
            return;
        }
        debug_assert!(new_cap > self.cap);
        let new_layout = Self::layout_for(new_cap);
        // SAFETY: new_layout has non-zero size (new_cap > cap >= 0 and T is
        // not a ZST); realloc keeps the alignment of the layout it is given.
        let p = unsafe {
            if self.cap == 0 {
                alloc::alloc(new_layout)
            } else {
                alloc::realloc(
                    self.ptr.as_ptr().cast(),
                    Self::layout_for(self.cap),
                    new_layout.size(),
                )
            }
        };
        let Some(p) = NonNull::new(p.cast::<T>()) else {
            alloc::handle_alloc_error(new_layout);
        };
        self.ptr = p;
        self.cap = new_cap;
    }

    fn release_buffer(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }
        // SAFETY: a buffer of exactly this layout was allocated and all
        // elements were dropped or moved out by the caller.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr().cast(), Self::layout_for(self.cap));
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }
}

impl<T: Clone> AlignedVec<T> {
    /// Resizes to `n` elements, padding with clones of `value`.
    pub fn resize(&mut self, n: usize, value: T) {
        if n <= self.len {
            self.truncate(n);
            return;
        }
        self.reserve(n - self.len);
        while self.len < n {
            self.push(value.clone());
        }
    }

    /// Appends clones of every element of `other`.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());
        for v in other {
            self.push(v.clone());
        }
    }

    /// Inserts clones of `values` at position `at`, shifting the tail right.
    pub fn insert_slice(&mut self, at: usize, values: &[T]) {
        assert!(
            at <= self.len,
            "insertion index (is {at}) should be <= len (is {})",
            self.len
        );
        // Append then rotate: panic-safe (a mid-clone panic leaves a valid,
        // merely reordered vector) and a single O(n) move.
        self.extend_from_slice(values);
        self.as_mut_slice()[at..].rotate_right(values.len());
    }
}

impl<T> Drop for AlignedVec<T> {
    fn drop(&mut self) {
        self.clear();
        self.release_buffer();
    }
}

impl<T> Default for AlignedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for AlignedVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for AlignedVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for AlignedVec<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len);
        out.extend_from_slice(self.as_slice());
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for AlignedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for AlignedVec<T> {}

impl<T: PartialEq> PartialEq<[T]> for AlignedVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for AlignedVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Extend<T> for AlignedVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for v in iter {
            self.push(v);
        }
    }
}

impl<T> FromIterator<T> for AlignedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T> From<Vec<T>> for AlignedVec<T> {
    fn from(v: Vec<T>) -> Self {
        let mut out = Self::with_capacity(v.len());
        out.extend(v);
        out
    }
}

impl<T: Clone> From<&[T]> for AlignedVec<T> {
    fn from(v: &[T]) -> Self {
        let mut out = Self::with_capacity(v.len());
        out.extend_from_slice(v);
        out
    }
}

impl<'a, T> IntoIterator for &'a AlignedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut AlignedVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn starts_empty_without_allocating() {
        let v: AlignedVec<u64> = AlignedVec::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.is_empty());
    }

    #[test]
    fn push_pop_roundtrip() {
        let mut v = AlignedVec::new();
        for i in 0..100u32 {
            v.push(i);
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v[17], 17);
        assert_eq!(v.pop(), Some(99));
        assert_eq!(v.len(), 99);
    }

    #[test]
    fn buffer_is_cache_line_aligned() {
        let mut v = AlignedVec::new();
        v.push(1u8);
        assert_eq!(v.as_ptr() as usize % 64, 0);
        for i in 0..1000u32 {
            v.push(i as u8);
        }
        // Still aligned after several reallocations.
        assert_eq!(v.as_ptr() as usize % 64, 0);
    }

    #[test]
    fn insert_and_remove_match_vec() {
        let mut a = AlignedVec::new();
        let mut b = Vec::new();
        for i in 0..50i64 {
            a.push(i);
            b.push(i);
        }
        a.insert(10, -1);
        b.insert(10, -1);
        a.insert(0, -2);
        b.insert(0, -2);
        assert_eq!(a.remove(5), b.remove(5));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn remove_range_compacts() {
        let mut v: AlignedVec<i32> = (0..10).collect();
        v.remove_range(2, 5);
        assert_eq!(v.as_slice(), &[0, 1, 5, 6, 7, 8, 9]);
        v.remove_range(0, 0);
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn insert_slice_shifts_tail() {
        let mut v: AlignedVec<i32> = (0..5).collect();
        v.insert_slice(2, &[10, 11]);
        assert_eq!(v.as_slice(), &[0, 1, 10, 11, 2, 3, 4]);
        v.insert_slice(7, &[99]);
        assert_eq!(v.as_slice(), &[0, 1, 10, 11, 2, 3, 4, 99]);
    }

    #[test]
    fn resize_pads_and_truncates() {
        let mut v = AlignedVec::new();
        v.resize(3, 7u16);
        assert_eq!(v.as_slice(), &[7, 7, 7]);
        v.resize(1, 0);
        assert_eq!(v.as_slice(), &[7]);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: AlignedVec<String> = AlignedVec::new();
        a.push("x".to_string());
        let mut b = a.clone();
        b.push("y".to_string());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn into_vec_moves_elements() {
        let a: AlignedVec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let v = a.into_vec();
        assert_eq!(v, vec!["a", "b", "c"]);
    }

    #[test]
    fn zst_support() {
        let mut v = AlignedVec::new();
        for _ in 0..1000 {
            v.push(());
        }
        assert_eq!(v.len(), 1000);
        assert_eq!(v.capacity(), usize::MAX);
        assert_eq!(v.pop(), Some(()));
        v.truncate(10);
        assert_eq!(v.len(), 10);
    }

    #[derive(Clone)]
    struct CountsDrops(Arc<AtomicUsize>);

    impl Drop for CountsDrops {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn drops_each_element_exactly_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut v = AlignedVec::new();
            for _ in 0..8 {
                v.push(CountsDrops(Arc::clone(&drops)));
            }
            v.truncate(6);
            assert_eq!(drops.load(Ordering::Relaxed), 2);
            let _ = v.remove(0);
            assert_eq!(drops.load(Ordering::Relaxed), 3);
            v.remove_range(1, 3);
            assert_eq!(drops.load(Ordering::Relaxed), 5);
        }
        // 8 constructed, all dropped by scope end.
        assert_eq!(drops.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn shrink_releases_excess() {
        let mut v: AlignedVec<u32> = AlignedVec::with_capacity(100);
        v.push(1);
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 1);
        assert_eq!(v.as_slice(), &[1]);
        v.clear();
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 0);
    }
}
