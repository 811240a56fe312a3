use std::ops::Range;
use std::ptr;
use std::rc::Rc;
use std::slice;
use std::sync::Arc;

use ::impl_tools::autoimpl;

use contig_core_rs::{Error, Identical, Produce, Result};

use super::view::SeqView;

/// Smallest capacity a growing operation will allocate.
pub const DEFAULT_CAPACITY: usize = 32;

/// Largest capacity representable for the element type. Buffers are bounded
/// by `isize::MAX` bytes, the platform limit for a single allocation.
pub(crate) fn max_capacity<T>() -> usize {
    match std::mem::size_of::<T>() {
        0 => usize::MAX,
        size => isize::MAX as usize / size,
    }
}

pub(crate) fn check_range(len: usize, index: usize, count: usize) -> Result<()> {
    match index.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::RangeOutOfBounds { index, count, len }),
    }
}

fn check_insert_index(len: usize, index: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

fn scan_forward<T, I: Identical<T>>(haystack: &[T], item: &T, identical: &I) -> Option<usize> {
    haystack
        .iter()
        .position(|candidate| identical.identical(candidate, item))
}

fn scan_backward<T, I: Identical<T>>(haystack: &[T], item: &T, identical: &I) -> Option<usize> {
    haystack
        .iter()
        .rposition(|candidate| identical.identical(candidate, item))
}

fn matches_at<T, I: Identical<T>>(haystack: &[T], start: usize, needle: &[T], identical: &I) -> bool {
    needle
        .iter()
        .enumerate()
        .all(|(offset, expected)| identical.identical(&haystack[start + offset], expected))
}

/// An empty needle matches at offset zero.
fn scan_seq_forward<T, I: Identical<T>>(haystack: &[T], needle: &[T], identical: &I) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| matches_at(haystack, start, needle, identical))
}

/// An empty needle matches at the end of the haystack.
fn scan_seq_backward<T, I: Identical<T>>(haystack: &[T], needle: &[T], identical: &I) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&start| matches_at(haystack, start, needle, identical))
}

/// Read-only contract shared by every sequence in this crate.
///
/// Everything is defined over [`SeqOp::as_slice`], the contiguous projection
/// of the occupied storage. Searches are linear scans; comparison is a
/// common-prefix count, not an ordering. Iteration borrows the sequence, so
/// structural mutation mid-iteration is rejected at compile time.
#[autoimpl(for <W: trait + ?Sized> &W, Box<W>, Rc<W>, Arc<W>)]
pub trait SeqOp<T> {
    /// Contiguous read-only projection of the occupied storage.
    fn as_slice(&self) -> &[T];

    /// Number of logically present elements.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds-checked element access.
    fn get(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Zero-cost read-only projection of a sub-range. Never copies, never
    /// allocates; the projection borrows the sequence.
    fn view(&self, index: usize, count: usize) -> Result<SeqView<'_, T>> {
        check_range(self.len(), index, count)?;
        Ok(SeqView::new(&self.as_slice()[index..index + count]))
    }

    /// Forward, single-pass iteration over the current elements.
    fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    /// Index of the first element equal to `item`.
    fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.index_of_by(item, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    /// Index of the last element equal to `item`.
    fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.last_index_of_by(item, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    fn index_of_by<I: Identical<T>>(&self, item: &T, identical: &I) -> Option<usize> {
        scan_forward(self.as_slice(), item, identical)
    }

    fn last_index_of_by<I: Identical<T>>(&self, item: &T, identical: &I) -> Option<usize> {
        scan_backward(self.as_slice(), item, identical)
    }

    /// First match within the `(index, count)` sub-range. The returned index
    /// is absolute, not relative to the range.
    fn index_of_in(&self, item: &T, index: usize, count: usize) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        self.index_of_in_by(item, index, count, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    /// Last match within the `(index, count)` sub-range, absolute index.
    fn last_index_of_in(&self, item: &T, index: usize, count: usize) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        self.last_index_of_in_by(item, index, count, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    fn index_of_in_by<I: Identical<T>>(
        &self,
        item: &T,
        index: usize,
        count: usize,
        identical: &I,
    ) -> Result<Option<usize>> {
        check_range(self.len(), index, count)?;
        let within = &self.as_slice()[index..index + count];
        Ok(scan_forward(within, item, identical).map(|found| index + found))
    }

    fn last_index_of_in_by<I: Identical<T>>(
        &self,
        item: &T,
        index: usize,
        count: usize,
        identical: &I,
    ) -> Result<Option<usize>> {
        check_range(self.len(), index, count)?;
        let within = &self.as_slice()[index..index + count];
        Ok(scan_backward(within, item, identical).map(|found| index + found))
    }

    /// Index of the first occurrence of `needle` as a contiguous
    /// subsequence. An empty needle matches at index 0.
    fn index_of_seq<S: SeqOp<T> + ?Sized>(&self, needle: &S) -> Option<usize>
    where
        T: PartialEq,
    {
        scan_seq_forward(
            self.as_slice(),
            needle.as_slice(),
            &(PartialEq::eq as fn(&T, &T) -> bool),
        )
    }

    /// Index of the last occurrence of `needle` as a contiguous subsequence.
    /// An empty needle matches at index `len`.
    fn last_index_of_seq<S: SeqOp<T> + ?Sized>(&self, needle: &S) -> Option<usize>
    where
        T: PartialEq,
    {
        scan_seq_backward(
            self.as_slice(),
            needle.as_slice(),
            &(PartialEq::eq as fn(&T, &T) -> bool),
        )
    }

    fn index_of_seq_in_by<S: SeqOp<T> + ?Sized, I: Identical<T>>(
        &self,
        needle: &S,
        index: usize,
        count: usize,
        identical: &I,
    ) -> Result<Option<usize>> {
        check_range(self.len(), index, count)?;
        let within = &self.as_slice()[index..index + count];
        Ok(scan_seq_forward(within, needle.as_slice(), identical).map(|found| index + found))
    }

    fn last_index_of_seq_in_by<S: SeqOp<T> + ?Sized, I: Identical<T>>(
        &self,
        needle: &S,
        index: usize,
        count: usize,
        identical: &I,
    ) -> Result<Option<usize>> {
        check_range(self.len(), index, count)?;
        let within = &self.as_slice()[index..index + count];
        Ok(scan_seq_backward(within, needle.as_slice(), identical).map(|found| index + found))
    }

    /// True iff `other` matches this sequence elementwise starting at
    /// `index`. A range that does not fit never matches. With `to_end`, the
    /// match must additionally reach exactly the end of this sequence.
    fn equals_at<S: SeqOp<T> + ?Sized>(&self, other: &S, index: usize, to_end: bool) -> bool
    where
        T: PartialEq,
    {
        self.equals_at_by(other, index, to_end, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    fn equals_at_by<S: SeqOp<T> + ?Sized, I: Identical<T>>(
        &self,
        other: &S,
        index: usize,
        to_end: bool,
        identical: &I,
    ) -> bool {
        let (haystack, needle) = (self.as_slice(), other.as_slice());
        match index.checked_add(needle.len()) {
            Some(end) if end <= haystack.len() => {
                if to_end && end != haystack.len() {
                    return false;
                }
                matches_at(haystack, index, needle, identical)
            }
            _ => false,
        }
    }

    /// Length of the common matching prefix of the two sequences.
    ///
    /// Deliberately not a three-way ordering: callers use the count to find
    /// the first divergence.
    fn common_prefix<S: SeqOp<T> + ?Sized>(&self, other: &S) -> usize
    where
        T: PartialEq,
    {
        self.common_prefix_by(other, &(PartialEq::eq as fn(&T, &T) -> bool))
    }

    fn common_prefix_by<S: SeqOp<T> + ?Sized, I: Identical<T>>(
        &self,
        other: &S,
        identical: &I,
    ) -> usize {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .take_while(|(ours, theirs)| identical.identical(ours, theirs))
            .count()
    }
}

/// Growable contract built on [`SeqOp`].
///
/// Every shared algorithm is a provided method implemented on top of the five
/// backend primitives (`capacity`, `ensure_mutable`, `reallocate`,
/// `storage_mut_ptr`, `set_len`); the backends differ only in how they
/// allocate, copy, and release storage. Mutating operations return
/// `Result<&mut Self>`, so the concrete type flows through call chains.
///
/// Arguments are validated before any state is touched: an `Err` means the
/// sequence is unchanged. Handles that merely borrow their storage reject
/// every mutation with [`Error::BorrowedRange`].
pub trait SeqOpMut<T>: SeqOp<T> {
    /// Size of the allocated storage, in elements.
    fn capacity(&self) -> usize;

    /// Rejects mutation on handles that do not own their storage.
    fn ensure_mutable(&self) -> Result<()>;

    /// Backend reallocation to exactly `cap` slots, preserving the first
    /// `len` elements bitwise.
    ///
    /// # Safety
    ///
    /// `cap >= self.len()`, `cap <= max_capacity::<T>()`, and the handle must
    /// own its storage.
    unsafe fn reallocate(&mut self, cap: usize);

    /// Pointer to the start of the backing storage, valid for `capacity()`
    /// slots until the next reallocation. On a handle that merely borrows
    /// its storage the pointer aliases the owner's buffer and must not be
    /// written through.
    fn storage_mut_ptr(&mut self) -> *mut T;

    /// # Safety
    ///
    /// `len <= self.capacity()` and the first `len` slots must hold
    /// initialized elements.
    unsafe fn set_len(&mut self, len: usize);

    /// Grow storage so that at least `min_capacity` elements fit, using the
    /// doubling policy: `max(32, capacity * 2)`, clamped up to `min_capacity`
    /// and down to the platform maximum.
    fn ensure_capacity(&mut self, min_capacity: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let cap = self.capacity();
        if min_capacity <= cap {
            return Ok(self);
        }
        let max = max_capacity::<T>();
        if min_capacity > max {
            return Err(Error::CapacityOverflow);
        }
        let doubled = cap.checked_mul(2).unwrap_or(max);
        let target = doubled.max(DEFAULT_CAPACITY).max(min_capacity).min(max);
        unsafe { self.reallocate(target) };
        Ok(self)
    }

    /// Explicit capacity change. Rejects `cap` below the current length.
    fn try_set_capacity(&mut self, cap: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let len = self.len();
        if cap < len {
            return Err(Error::CapacityBelowLength {
                requested: cap,
                len,
            });
        }
        if cap > max_capacity::<T>() {
            return Err(Error::CapacityOverflow);
        }
        if cap != self.capacity() {
            unsafe { self.reallocate(cap) };
        }
        Ok(self)
    }

    /// Shrink capacity to length once occupancy drops below 90%, amortizing
    /// repeated shrink/grow cycles.
    fn trim(&mut self) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let (len, cap) = (self.len(), self.capacity());
        if cap > len && (len as u128) * 10 < (cap as u128) * 9 {
            unsafe { self.reallocate(len) };
        }
        Ok(self)
    }

    /// Amortized O(1) append.
    fn push(&mut self, item: T) -> Result<&mut Self> {
        let len = self.len();
        let new_len = len.checked_add(1).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(new_len)?;
        unsafe {
            ptr::write(self.storage_mut_ptr().add(len), item);
            self.set_len(new_len);
        }
        Ok(self)
    }

    /// Remove and return the last element.
    fn pop(&mut self) -> Result<Option<T>> {
        self.ensure_mutable()?;
        let len = self.len();
        if len == 0 {
            return Ok(None);
        }
        unsafe {
            self.set_len(len - 1);
            Ok(Some(ptr::read(self.storage_mut_ptr().add(len - 1))))
        }
    }

    /// Bounds-checked mutable element access.
    fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.ensure_mutable()?;
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(unsafe { &mut *self.storage_mut_ptr().add(index) })
    }

    /// Overwrite a single element in place.
    fn set(&mut self, index: usize, item: T) -> Result<&mut Self> {
        *self.get_mut(index)? = item;
        Ok(self)
    }

    /// Insert one element at `index`, shifting the tail right.
    fn insert(&mut self, index: usize, item: T) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let len = self.len();
        check_insert_index(len, index)?;
        let new_len = len.checked_add(1).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(new_len)?;
        unsafe {
            let p = self.storage_mut_ptr();
            ptr::copy(p.add(index), p.add(index + 1), len - index);
            ptr::write(p.add(index), item);
            self.set_len(new_len);
        }
        Ok(self)
    }

    /// Insert clones of `items` at `index`, shifting the tail right by
    /// `items.len()`.
    fn insert_slice(&mut self, index: usize, items: &[T]) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.ensure_mutable()?;
        let len = self.len();
        check_insert_index(len, index)?;
        let inserted = items.len();
        if inserted == 0 {
            return Ok(self);
        }
        let new_len = len.checked_add(inserted).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(new_len)?;
        unsafe {
            let p = self.storage_mut_ptr();
            // Keep the shifted tail outside the initialized range while the
            // clones run; a panicking Clone leaks instead of double-dropping.
            self.set_len(index);
            ptr::copy(p.add(index), p.add(index + inserted), len - index);
            for (offset, item) in items.iter().enumerate() {
                ptr::write(p.add(index + offset), item.clone());
            }
            self.set_len(new_len);
        }
        Ok(self)
    }

    /// Self-referential insert: clone this sequence's own `src` range and
    /// insert the copy at `index`.
    ///
    /// The tail is shifted first; the inserted copy is then assembled in two
    /// segments. Source elements that sat before the insertion point are
    /// still at their original offsets, while those at or past it have moved
    /// right by the inserted count, so no read touches overwritten slots.
    /// Inserting the whole sequence into itself at `k` is
    /// `insert_from_within(k, 0..len)`.
    fn insert_from_within(&mut self, index: usize, src: Range<usize>) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.ensure_mutable()?;
        let len = self.len();
        check_insert_index(len, index)?;
        if src.start > src.end || src.end > len {
            return Err(Error::RangeOutOfBounds {
                index: src.start,
                count: src.end.saturating_sub(src.start),
                len,
            });
        }
        let inserted = src.end - src.start;
        if inserted == 0 {
            return Ok(self);
        }
        let new_len = len.checked_add(inserted).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(new_len)?;
        unsafe {
            let p = self.storage_mut_ptr();
            self.set_len(index);
            ptr::copy(p.add(index), p.add(index + inserted), len - index);
            let split = index.clamp(src.start, src.end);
            let mut dst = index;
            for offset in src.start..split {
                ptr::write(p.add(dst), (*p.add(offset)).clone());
                dst += 1;
            }
            for offset in split..src.end {
                ptr::write(p.add(dst), (*p.add(offset + inserted)).clone());
                dst += 1;
            }
            self.set_len(new_len);
        }
        Ok(self)
    }

    /// Append clones of `items`.
    fn extend_from_slice(&mut self, items: &[T]) -> Result<&mut Self>
    where
        T: Clone,
    {
        let len = self.len();
        self.insert_slice(len, items)
    }

    /// Append clones of another sequence's elements.
    fn extend_from_seq<S: SeqOp<T> + ?Sized>(&mut self, other: &S) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.extend_from_slice(other.as_slice())
    }

    /// Append clones of this sequence's own `src` range.
    fn extend_from_within(&mut self, src: Range<usize>) -> Result<&mut Self>
    where
        T: Clone,
    {
        let len = self.len();
        self.insert_from_within(len, src)
    }

    /// Remove `count` elements starting at `index`, shifting the remainder
    /// left and truncating the vacated tail.
    fn remove(&mut self, index: usize, count: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let len = self.len();
        check_range(len, index, count)?;
        if count == 0 {
            return Ok(self);
        }
        unsafe {
            let p = self.storage_mut_ptr();
            self.set_len(index);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(p.add(index), count));
            ptr::copy(p.add(index + count), p.add(index), len - index - count);
            self.set_len(len - count);
        }
        Ok(self)
    }

    /// Replace the `(index, count)` range with clones of `items`, growing or
    /// shrinking the sequence as the replacement is longer or shorter than
    /// the replaced range. Fully validated, including the capacity
    /// requirement, before any element is touched.
    fn replace_range(&mut self, index: usize, count: usize, items: &[T]) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.ensure_mutable()?;
        let len = self.len();
        check_range(len, index, count)?;
        let replacement = items.len();
        let new_len = (len - count)
            .checked_add(replacement)
            .ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(new_len)?;
        unsafe {
            let p = self.storage_mut_ptr();
            self.set_len(index);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(p.add(index), count));
            ptr::copy(
                p.add(index + count),
                p.add(index + replacement),
                len - index - count,
            );
            for (offset, item) in items.iter().enumerate() {
                ptr::write(p.add(index + offset), item.clone());
            }
            self.set_len(new_len);
        }
        Ok(self)
    }

    /// Overwrite elements in place starting at `index` without shifting;
    /// extends the length when the written range runs past the current end.
    /// `index` may be at most `len`, so no gap of uninitialized slots can
    /// appear.
    fn set_range(&mut self, index: usize, items: &[T]) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.ensure_mutable()?;
        let len = self.len();
        check_insert_index(len, index)?;
        let end = index.checked_add(items.len()).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(end)?;
        unsafe {
            let p = self.storage_mut_ptr();
            let overwritten = len.min(end) - index;
            for (offset, item) in items.iter().enumerate() {
                let slot = p.add(index + offset);
                if offset < overwritten {
                    *slot = item.clone();
                } else {
                    ptr::write(slot, item.clone());
                    self.set_len(index + offset + 1);
                }
            }
        }
        Ok(self)
    }

    /// Drop every element past `new_len`. A `new_len` at or above the
    /// current length is a no-op.
    fn truncate(&mut self, new_len: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let len = self.len();
        if new_len >= len {
            return Ok(self);
        }
        unsafe {
            let p = self.storage_mut_ptr();
            self.set_len(new_len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                p.add(new_len),
                len - new_len,
            ));
        }
        Ok(self)
    }

    fn clear(&mut self) -> Result<&mut Self> {
        self.truncate(0)
    }

    /// Replace the content with `count` clones of `item`.
    fn fill(&mut self, count: usize, item: T) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.ensure_mutable()?;
        if count > max_capacity::<T>() {
            return Err(Error::CapacityOverflow);
        }
        self.truncate(0)?;
        self.ensure_capacity(count)?;
        unsafe {
            let p = self.storage_mut_ptr();
            for index in 0..count {
                ptr::write(p.add(index), item.clone());
                self.set_len(index + 1);
            }
        }
        Ok(self)
    }

    /// Replace the content with `count` produced elements, in index order.
    fn fill_with<P: Produce<T>>(&mut self, count: usize, producer: &mut P) -> Result<&mut Self> {
        self.ensure_mutable()?;
        if count > max_capacity::<T>() {
            return Err(Error::CapacityOverflow);
        }
        self.truncate(0)?;
        self.ensure_capacity(count)?;
        unsafe {
            let p = self.storage_mut_ptr();
            for index in 0..count {
                ptr::write(p.add(index), producer.produce(index));
                self.set_len(index + 1);
            }
        }
        Ok(self)
    }

    /// Keep only the elements for which `keep` returns true, preserving
    /// order and dropping the rest.
    fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let len = self.len();
        unsafe {
            let p = self.storage_mut_ptr();
            self.set_len(0);
            let mut kept = 0;
            for index in 0..len {
                let slot = p.add(index);
                if keep(&*slot) {
                    if index != kept {
                        ptr::copy_nonoverlapping(slot, p.add(kept), 1);
                    }
                    kept += 1;
                    self.set_len(kept);
                } else {
                    ptr::drop_in_place(slot);
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use eyre::Result;

    use super::super::ArraySeq;
    use super::*;

    fn seq(items: &[i32]) -> ArraySeq<i32> {
        ArraySeq::from_slice(items)
    }

    #[test]
    fn test_get_and_bounds() -> Result<()> {
        let s = seq(&[10, 20, 30]);
        assert_eq!(*s.get(0)?, 10);
        assert_eq!(*s.get(2)?, 30);
        assert_eq!(
            s.get(3),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(s.first(), Some(&10));
        assert_eq!(s.last(), Some(&30));
        assert!(seq(&[]).first().is_none());
        Ok(())
    }

    #[test]
    fn test_index_of() {
        let s = seq(&[1, 2, 3, 2, 1]);
        for (item, first, last) in [(1, Some(0), Some(4)), (2, Some(1), Some(3)), (3, Some(2), Some(2)), (9, None, None)] {
            assert_eq!(s.index_of(&item), first);
            assert_eq!(s.last_index_of(&item), last);
        }
    }

    #[test]
    fn test_index_of_in() -> Result<()> {
        let s = seq(&[1, 2, 3, 2, 1]);
        assert_eq!(s.index_of_in(&2, 2, 3)?, Some(3));
        assert_eq!(s.last_index_of_in(&2, 0, 3)?, Some(1));
        assert_eq!(s.index_of_in(&1, 1, 3)?, None);
        assert!(s.index_of_in(&1, 3, 3).is_err());
        Ok(())
    }

    #[test]
    fn test_index_of_by() {
        let s = seq(&[10, 23, 35, 47]);
        let same_decade = |a: &i32, b: &i32| a / 10 == b / 10;
        assert_eq!(s.index_of_by(&20, &same_decade), Some(1));
        assert_eq!(s.last_index_of_by(&40, &same_decade), Some(3));
        assert_eq!(s.index_of_by(&90, &same_decade), None);
    }

    #[test]
    fn test_index_of_seq() {
        let s = seq(&[1, 2, 1, 2, 3]);
        assert_eq!(s.index_of_seq(&seq(&[1, 2])), Some(0));
        assert_eq!(s.last_index_of_seq(&seq(&[1, 2])), Some(2));
        assert_eq!(s.index_of_seq(&seq(&[2, 3])), Some(3));
        assert_eq!(s.index_of_seq(&seq(&[3, 1])), None);
        assert_eq!(s.index_of_seq(&seq(&[])), Some(0));
        assert_eq!(s.last_index_of_seq(&seq(&[])), Some(5));
        assert_eq!(seq(&[1]).index_of_seq(&s), None);
    }

    #[test]
    fn test_index_of_seq_in() -> Result<()> {
        let s = seq(&[1, 2, 1, 2, 3]);
        let eq = PartialEq::eq as fn(&i32, &i32) -> bool;
        assert_eq!(s.index_of_seq_in_by(&seq(&[1, 2]), 1, 4, &eq)?, Some(2));
        assert_eq!(s.last_index_of_seq_in_by(&seq(&[1, 2]), 0, 3, &eq)?, Some(0));
        assert_eq!(s.index_of_seq_in_by(&seq(&[2, 3]), 0, 4, &eq)?, None);
        assert!(s.index_of_seq_in_by(&seq(&[1]), 4, 2, &eq).is_err());
        Ok(())
    }

    #[test]
    fn test_equals_at() {
        let s = seq(&[1, 2, 3, 4]);
        assert!(s.equals_at(&seq(&[2, 3]), 1, false));
        assert!(!s.equals_at(&seq(&[2, 3]), 1, true));
        assert!(s.equals_at(&seq(&[3, 4]), 2, true));
        assert!(s.equals_at(&seq(&[1, 2, 3, 4]), 0, true));
        assert!(!s.equals_at(&seq(&[2, 3]), 3, false));
        assert!(!s.equals_at(&seq(&[4, 5]), 3, false));
        // Empty ranges match anywhere inside the sequence.
        assert!(s.equals_at(&seq(&[]), 4, true));
        assert!(!s.equals_at(&seq(&[]), 5, false));
    }

    #[test]
    fn test_common_prefix() {
        for (left, right, expected) in [
            (vec![], vec![], 0),
            (vec![1, 2, 3], vec![], 0),
            (vec![1, 2, 3], vec![1, 2, 3], 3),
            (vec![1, 2, 3, 4], vec![1, 2, 9], 2),
            (vec![9, 2, 3], vec![1, 2, 3], 0),
            (vec![1, 2], vec![1, 2, 3, 4], 2),
        ] {
            assert_eq!(seq(&left).common_prefix(&seq(&right)), expected);
        }
    }

    #[test]
    fn test_common_prefix_by() {
        let same_decade = |a: &i32, b: &i32| a / 10 == b / 10;
        let left = seq(&[11, 22, 33]);
        let right = seq(&[15, 27, 93]);
        assert_eq!(left.common_prefix_by(&right, &same_decade), 2);
    }

    #[test]
    fn test_view_projection() -> Result<()> {
        let s = seq(&[1, 2, 3, 4, 5]);
        let v = s.view(1, 3)?;
        assert_eq!(v.as_slice(), &[2, 3, 4]);
        // Projections share storage with their parent and nest.
        assert!(std::ptr::eq(v.as_slice().as_ptr(), &s.as_slice()[1]));
        let nested = v.view(1, 1)?;
        assert_eq!(nested.as_slice(), &[3]);
        assert!(s.view(3, 3).is_err());
        assert_eq!(s.view(5, 0)?.len(), 0);
        Ok(())
    }

    #[test]
    fn test_iteration_snapshot() {
        let s = seq(&[1, 2, 3]);
        let collected: Vec<i32> = s.iter().copied().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert_eq!(s.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_contract_through_references() {
        // The read contract delegates through &S and Box<S>.
        let s = seq(&[1, 2, 3]);
        let by_ref: &dyn Fn() -> usize = &|| (&s).len();
        assert_eq!(by_ref(), 3);
        let boxed: Box<ArraySeq<i32>> = Box::new(seq(&[4, 5]));
        assert_eq!(boxed.index_of(&5), Some(1));
    }
}
