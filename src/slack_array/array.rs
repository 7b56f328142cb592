use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::mem::MaybeUninit;
use core::slice;

use super::inner::Inner;
use super::lifecycle;
use crate::types::CloneFrom;
use crate::types::DefaultSlack;
use crate::types::Element;
use crate::types::ErrorReason;
use crate::types::LengthType;
use crate::types::SlackArrErr;
use crate::types::SlackArrResult;
use crate::types::SlackPolicy;

/// A growable array backed by a single heap block.
///
/// * `T` is the element type.
/// * `L` is the type used for the length, the capacity and indices.
/// * `P` decides how much slack is allocated on growth and when slack is
///   given back.
///
/// Every operation that may allocate returns a `SlackArrResult`, and leaves
/// the array untouched when it fails.
pub struct SlackArr<T, L: LengthType = u32, P: SlackPolicy = DefaultSlack>
where
    usize: TryFrom<L>,
{
    inner:   Inner<L>,
    _ph:     PhantomData<T>,
    _policy: PhantomData<fn() -> P>,
}

unsafe impl<T: Send, L: LengthType, P: SlackPolicy> Send for SlackArr<T, L, P> where usize: TryFrom<L> {}
unsafe impl<T: Sync, L: LengthType, P: SlackPolicy> Sync for SlackArr<T, L, P> where usize: TryFrom<L> {}

const fn err<T>(reason: ErrorReason) -> SlackArrResult<T> {
    return Err(SlackArrErr::new(reason));
}

/// Converts a caller supplied length or count, which may not fit a `usize`.
#[inline]
fn to_usize<L: LengthType>(value: L) -> SlackArrResult<usize>
where
    usize: TryFrom<L>,
{
    let Ok(value) = usize::try_from(value) else {
        return err(ErrorReason::UsizeOverflow);
    };
    return Ok(value);
}

/// Puts the tail of an insertion gap back if filling the gap unwinds.
struct Gap<T> {
    at:   *mut T,
    n:    usize,
    tail: usize,
}

impl<T> Drop for Gap<T> {
    fn drop(&mut self) {
        unsafe { lifecycle::relocate_range(self.at, self.at.add(self.n), self.tail) };
    }
}

/// Finishes a compaction: whatever was not examined yet is moved down to
/// the write cursor, then the length is published.
struct Compact<'a, T, L: LengthType>
where
    usize: TryFrom<L>,
{
    base:     *mut T,
    read:     usize,
    write:    usize,
    original: usize,
    len:      &'a mut L,
}

impl<T, L: LengthType> Drop for Compact<'_, T, L>
where
    usize: TryFrom<L>,
{
    fn drop(&mut self) {
        let rest = self.original - self.read;
        unsafe { lifecycle::relocate_range(self.base.add(self.write), self.base.add(self.read), rest) };
        *self.len = L::from_usize(self.write + rest).unwrap_or(L::ZERO_VALUE);
    }
}

impl<T, L: LengthType, P: SlackPolicy> SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    const LAYOUT: Layout = Layout::new::<T>();
    const SIZE: usize = mem::size_of::<T>();

    /// Creates an empty array without allocating.
    pub const fn new_unreserved() -> Self {
        return Self {
            inner:   Inner::new_in::<T>(),
            _ph:     PhantomData,
            _policy: PhantomData,
        };
    }

    /// Creates an empty array with `P::DEFAULT_CAPACITY` slots reserved,
    /// so the first few pushes do not reallocate.
    pub fn new() -> SlackArrResult<Self> {
        let mut arr = Self::new_unreserved();
        arr.reserve_usize(P::DEFAULT_CAPACITY)?;
        return Ok(arr);
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: L) -> SlackArrResult<Self> {
        let mut arr = Self::new_unreserved();
        arr.reserve(capacity)?;
        return Ok(arr);
    }

    /// Creates an array holding a copy of every element of `src`.
    ///
    /// Element types that can be copied bitwise from `S` are copied with a
    /// single `memcpy`.
    pub fn from_slice<S>(src: &[S]) -> SlackArrResult<Self>
    where
        T: CloneFrom<S>,
    {
        let Some(n) = L::from_usize(src.len()) else {
            return err(ErrorReason::CapacityOverflow);
        };
        let mut arr = Self::with_capacity(n)?;
        unsafe { lifecycle::construct_range(arr.base(), src) };
        arr.inner.len = n;
        return Ok(arr);
    }

    /// Creates an array of `count` clones of `value`.
    pub fn from_elem(count: L, value: &T) -> SlackArrResult<Self>
    where
        T: Element,
    {
        let n = to_usize(count)?;
        let mut arr = Self::with_capacity(count)?;
        unsafe { lifecycle::fill_range(arr.base(), value, n) };
        arr.inner.len = count;
        return Ok(arr);
    }

    /// Creates an array of `count` default values.
    pub fn from_default(count: L) -> SlackArrResult<Self>
    where
        T: Default,
    {
        let mut arr = Self::with_capacity(count)?;
        arr.resize_with(count, T::default)?;
        return Ok(arr);
    }

    /// A fallible `clone`.
    pub fn try_clone(&self) -> SlackArrResult<Self>
    where
        T: Element,
    {
        return Self::from_slice(self.as_slice());
    }

    /// Moves the contents out, leaving `self` empty and unallocated.
    pub fn take(&mut self) -> Self {
        return mem::replace(self, Self::new_unreserved());
    }

    #[inline]
    pub const fn len(&self) -> L {
        return self.inner.len;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.inner.len == L::ZERO_VALUE;
    }

    /// The number of elements the array can hold without reallocating.
    #[inline]
    pub const fn capacity(&self) -> L {
        return self.inner.capacity(Self::SIZE);
    }

    /// The number of allocated but unused slots.
    #[inline]
    pub fn slack(&self) -> L {
        return self.capacity() - self.inner.len;
    }

    /// The size of the backing allocation in bytes.
    pub fn allocated_size(&self) -> usize {
        return self.inner.allocated_size(Self::LAYOUT);
    }

    /// Makes sure at least `capacity` elements fit.
    ///
    /// Unlike growth during a push this allocates exactly what is asked for.
    pub fn reserve(&mut self, capacity: L) -> SlackArrResult<()> {
        return self.reserve_usize(to_usize(capacity)?);
    }

    fn reserve_usize(&mut self, capacity: usize) -> SlackArrResult<()> {
        if capacity <= self.capacity_usize() {
            return Ok(());
        }
        return self.inner.resize_to(capacity, Self::LAYOUT);
    }

    /// Gives back all the slack.
    pub fn shrink_to_fit(&mut self) -> SlackArrResult<()> {
        let len = self.len_usize();
        if len == self.capacity_usize() {
            return Ok(());
        }
        return self.inner.resize_to(len, Self::LAYOUT);
    }

    /// Drops every element and releases the allocation.
    pub fn clear(&mut self) {
        self.drop_all();
        self.inner.release(Self::LAYOUT);
    }

    /// Drops every element and reallocates to exactly `slack` slots if the
    /// capacity differs.
    ///
    /// The elements are dropped even when the reallocation fails, but not
    /// when `slack` doesn't fit a `usize`.
    pub fn clear_with_slack(&mut self, slack: L) -> SlackArrResult<()> {
        let slack = to_usize(slack)?;
        self.drop_all();
        return self.inner.resize_to(slack, Self::LAYOUT);
    }

    /// Drops every element, keeping the allocation unless it cannot hold
    /// `new_size` elements.
    pub fn reset(&mut self, new_size: L) -> SlackArrResult<()> {
        if new_size <= self.capacity() {
            self.drop_all();
            return Ok(());
        }
        return self.clear_with_slack(new_size);
    }

    /// Drops the elements past `len`. Never reallocates.
    pub fn truncate(&mut self, len: L) {
        if len >= self.inner.len {
            return;
        }
        let old = self.len_usize();
        let new = len.as_usize();
        self.inner.len = len;
        unsafe { lifecycle::destruct_range(self.base().add(new), old - new) };
    }

    /// Grows or shrinks the array to `new_len` elements, filling new slots
    /// with the results of `f`.
    pub fn resize_with<F>(&mut self, new_len: L, mut f: F) -> SlackArrResult<()>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.inner.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.grow_for(to_usize(new_len)?)?;
        while self.inner.len < new_len {
            unsafe { self.base().add(self.len_usize()).write(f()) };
            self.inner.len += L::ONE_VALUE;
        }
        return Ok(());
    }

    /// Appends `item` and returns the index it was written to.
    pub fn push(&mut self, item: T) -> SlackArrResult<L> {
        let index = self.inner.len;
        let (new_len, required) = self.grown_len(L::ONE_VALUE)?;
        self.grow_for(required)?;
        unsafe { self.base().add(index.as_usize()).write(item) };
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Appends the value built by `make`. No slot is touched if `make` panics.
    pub fn emplace<F>(&mut self, make: F) -> SlackArrResult<L>
    where
        F: FnOnce() -> T,
    {
        let index = self.inner.len;
        let (new_len, required) = self.grown_len(L::ONE_VALUE)?;
        self.grow_for(required)?;
        unsafe { self.base().add(index.as_usize()).write(make()) };
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Appends an element whose bytes are all zero.
    ///
    /// # Safety
    ///
    /// All zero bytes must be a valid `T`.
    pub unsafe fn push_zeroed(&mut self) -> SlackArrResult<L> {
        let index = self.inner.len;
        let (new_len, required) = self.grown_len(L::ONE_VALUE)?;
        self.grow_for(required)?;
        unsafe { lifecycle::zero_range(self.base().add(index.as_usize()), 1) };
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Appends a copy of every element of `src`.
    pub fn extend_from_slice<S>(&mut self, src: &[S]) -> SlackArrResult<()>
    where
        T: CloneFrom<S>,
    {
        self.insert_slice(self.inner.len, src)?;
        return Ok(());
    }

    /// Inserts `item` at `index`, shifting everything after it up by one.
    pub fn insert(&mut self, index: L, item: T) -> SlackArrResult<L> {
        let (at, _, new_len) = self.open_gap(index, 1)?;
        unsafe { at.write(item) };
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Inserts a copy of every element of `src` at `index`.
    pub fn insert_slice<S>(&mut self, index: L, src: &[S]) -> SlackArrResult<L>
    where
        T: CloneFrom<S>,
    {
        let (at, tail, new_len) = self.open_gap(index, src.len())?;
        let gap = Gap { at, n: src.len(), tail };
        unsafe { lifecycle::construct_range(at, src) };
        mem::forget(gap);
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Moves every element of `other` into `self` at `index`. `other` is
    /// consumed and its allocation released.
    pub fn insert_array<L2, P2>(&mut self, index: L, mut other: SlackArr<T, L2, P2>) -> SlackArrResult<L>
    where
        L2: LengthType,
        P2: SlackPolicy,
        usize: TryFrom<L2>,
    {
        let n = other.len_usize();
        let (at, _, new_len) = self.open_gap(index, n)?;
        unsafe { lifecycle::relocate_range(at, other.base(), n) };
        other.inner.len = L2::ZERO_VALUE;
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Inserts `count` elements whose bytes are all zero at `index`.
    ///
    /// # Safety
    ///
    /// All zero bytes must be a valid `T`.
    pub unsafe fn insert_zeroed(&mut self, index: L, count: L) -> SlackArrResult<L> {
        let n = to_usize(count)?;
        let (at, _, new_len) = self.open_gap(index, n)?;
        unsafe { lifecycle::zero_range(at, n) };
        self.inner.len = new_len;
        return Ok(index);
    }

    /// Removes and returns the element at `index`, shifting the tail down.
    pub fn remove(&mut self, index: L) -> SlackArrResult<T> {
        if index >= self.inner.len {
            return err(ErrorReason::OutOfRange);
        }
        let idx = index.as_usize();
        let tail = self.len_usize() - idx - 1;
        let item = unsafe {
            let at = self.base().add(idx);
            let item = at.read();
            lifecycle::relocate_range(at, at.add(1), tail);
            item
        };
        self.inner.len -= L::ONE_VALUE;
        self.shrink_if_slack();
        return Ok(item);
    }

    /// Drops `count` elements starting at `index` and shifts the tail down,
    /// then gives back slack if there is too much of it.
    pub fn remove_at(&mut self, index: L, count: L) -> SlackArrResult<()> {
        return self.remove_at_with_shrink(index, count, true);
    }

    /// Like `remove_at`, but only considers shrinking when `allow_shrink`.
    pub fn remove_at_with_shrink(&mut self, index: L, count: L, allow_shrink: bool) -> SlackArrResult<()> {
        let Some(end) = index.checked_add(count) else {
            return err(ErrorReason::OutOfRange);
        };
        if end > self.inner.len {
            return err(ErrorReason::OutOfRange);
        }
        if count == L::ZERO_VALUE {
            return Ok(());
        }
        self.remove_run(index, count);
        if allow_shrink {
            self.shrink_if_slack();
        }
        return Ok(());
    }

    /// Removes every element `pred` returns `true` for, keeping the order of
    /// the rest. Returns how many were removed.
    ///
    /// `pred` is called exactly once per element, in order.
    pub fn remove_matching<F>(&mut self, mut pred: F) -> L
    where
        F: FnMut(&T) -> bool,
    {
        let old_len = self.inner.len;
        let original = self.len_usize();
        if original == 0 {
            return L::ZERO_VALUE;
        }
        let base = self.base();
        self.inner.len = L::ZERO_VALUE;
        let mut cmp = Compact {
            base,
            read: 0,
            write: 0,
            original,
            len: &mut self.inner.len,
        };

        // Alternate between runs to keep and runs to drop.
        let mut keep = !pred(unsafe { &*base });
        while cmp.read < original {
            let start = cmp.read;
            let mut end = start + 1;
            while end < original && keep == !pred(unsafe { &*base.add(end) }) {
                end += 1;
            }
            let run = end - start;
            if keep {
                unsafe { lifecycle::relocate_range(base.add(cmp.write), base.add(start), run) };
                cmp.write += run;
                cmp.read = end;
            } else {
                cmp.read = end;
                unsafe { lifecycle::destruct_range(base.add(start), run) };
            }
            keep = !keep;
        }
        drop(cmp);
        return old_len - self.inner.len;
    }

    /// Removes every element equal to `item`. Returns how many were removed.
    pub fn remove_value(&mut self, item: &T) -> L
    where
        T: PartialEq,
    {
        return self.remove_matching(|e| e == item);
    }

    /// Removes the first element equal to `item`. Returns 1 if one was found.
    pub fn remove_single(&mut self, item: &T) -> L
    where
        T: PartialEq,
    {
        let Some(index) = self.find(item) else {
            return L::ZERO_VALUE;
        };
        self.remove_run(index, L::ONE_VALUE);
        return L::ONE_VALUE;
    }

    /// Removes and returns the last element, then gives back slack if there
    /// is too much of it.
    pub fn pop(&mut self) -> SlackArrResult<T> {
        return self.pop_with_shrink(true);
    }

    /// Like `pop`, but only considers shrinking when `allow_shrink`.
    pub fn pop_with_shrink(&mut self, allow_shrink: bool) -> SlackArrResult<T> {
        if self.is_empty() {
            return err(ErrorReason::Empty);
        }
        self.inner.len -= L::ONE_VALUE;
        let item = unsafe { self.base().add(self.len_usize()).read() };
        if allow_shrink {
            self.shrink_if_slack();
        }
        return Ok(item);
    }

    /// Index of the first element equal to `item`.
    pub fn find(&self, item: &T) -> Option<L>
    where
        T: PartialEq,
    {
        return self.as_slice().iter().position(|e| e == item).and_then(L::from_usize);
    }

    /// Index of the last element equal to `item`.
    pub fn find_last(&self, item: &T) -> Option<L>
    where
        T: PartialEq,
    {
        return self.as_slice().iter().rposition(|e| e == item).and_then(L::from_usize);
    }

    /// The first element that compares equal to `key`.
    pub fn find_by_key<K>(&self, key: &K) -> Option<&T>
    where
        T: PartialEq<K>,
    {
        return self.as_slice().iter().find(|e| *e == key);
    }

    pub fn find_by_key_mut<K>(&mut self, key: &K) -> Option<&mut T>
    where
        T: PartialEq<K>,
    {
        return self.as_mut_slice().iter_mut().find(|e| **e == *key);
    }

    #[inline]
    pub fn get(&self, index: L) -> Option<&T> {
        let index = usize::try_from(index).ok()?;
        return self.as_slice().get(index);
    }

    #[inline]
    pub fn get_mut(&mut self, index: L) -> Option<&mut T> {
        let index = usize::try_from(index).ok()?;
        return self.as_mut_slice().get_mut(index);
    }

    /// The element `from_end` places before the last one.
    pub fn nth_last(&self, from_end: L) -> Option<&T> {
        let index = self.inner.len.checked_sub(from_end)?.checked_sub(L::ONE_VALUE)?;
        return self.get(index);
    }

    pub fn nth_last_mut(&mut self, from_end: L) -> Option<&mut T> {
        let index = self.inner.len.checked_sub(from_end)?.checked_sub(L::ONE_VALUE)?;
        return self.get_mut(index);
    }

    /// The last element, as seen by a stack.
    #[inline]
    pub fn top(&self) -> Option<&T> {
        return self.nth_last(L::ZERO_VALUE);
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len_usize()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len_usize()) }
    }

    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        return self.inner.get_ptr::<T>().cast_const();
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        return self.inner.get_ptr::<T>();
    }

    /// The allocated slots past the last element.
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let len = self.len_usize();
        let spare = self.capacity_usize() - len;
        unsafe { slice::from_raw_parts_mut(self.base().add(len).cast(), spare) }
    }

    /// Sets the length without touching any slot.
    ///
    /// # Safety
    ///
    /// `len` must not exceed the capacity and every slot below it must hold
    /// a live element.
    pub unsafe fn set_len(&mut self, len: L) {
        debug_assert!(len <= self.capacity());
        self.inner.len = len;
    }

    #[inline]
    fn base(&self) -> *mut T {
        return self.inner.get_ptr::<T>();
    }

    #[inline]
    fn len_usize(&self) -> usize {
        return self.inner.len.as_usize();
    }

    #[inline]
    fn capacity_usize(&self) -> usize {
        if Self::SIZE == 0 {
            return L::max_usize();
        }
        return self.capacity().as_usize();
    }

    /// The length after adding `additional`, as `L` and as `usize`.
    fn grown_len(&self, additional: L) -> SlackArrResult<(L, usize)> {
        let Some(new_len) = self.inner.len.checked_add(additional) else {
            return err(ErrorReason::CapacityOverflow);
        };
        return Ok((new_len, to_usize(new_len)?));
    }

    /// Makes room for `required` elements, over allocating by the policy.
    fn grow_for(&mut self, required: usize) -> SlackArrResult<()> {
        let capacity = self.capacity_usize();
        if required <= capacity {
            return Ok(());
        }
        let max = L::max_usize();
        if required > max {
            return err(ErrorReason::CapacityOverflow);
        }
        // Don't let the slack alone push the layout over isize::MAX.
        let layout_max = (isize::MAX as usize).checked_div(Self::SIZE).unwrap_or(usize::MAX);
        let limit = max.min(layout_max).max(required);
        let target = P::grow(required, capacity).clamp(required, limit);
        log::trace!("growing from {capacity} to {target} slots for {required}");
        return self.inner.resize_to(target, Self::LAYOUT);
    }

    /// Shrinks to fit when the policy thinks there is too much slack.
    ///
    /// This runs after an element was already handed out or dropped, so a
    /// refused reallocation only keeps the current block.
    fn shrink_if_slack(&mut self) {
        if Self::SIZE == 0 {
            return;
        }
        let len = self.len_usize();
        let capacity = self.capacity_usize();
        let target = P::shrink(len, capacity, Self::SIZE).max(len);
        if target == capacity {
            return;
        }
        log::debug!("shrinking from {capacity} to {target} slots");
        if let Err(e) = self.inner.resize_to(target, Self::LAYOUT) {
            log::warn!("keeping {capacity} slots: {e}");
        }
    }

    /// Grows if needed and moves `[index, len)` up by `n` slots.
    ///
    /// Returns the first slot of the gap, the length of the moved tail, and
    /// the length to publish once the gap is filled. The length itself is
    /// not updated.
    fn open_gap(&mut self, index: L, n: usize) -> SlackArrResult<(*mut T, usize, L)> {
        if index > self.inner.len {
            return err(ErrorReason::OutOfRange);
        }
        let Some(count) = L::from_usize(n) else {
            return err(ErrorReason::CapacityOverflow);
        };
        let (new_len, required) = self.grown_len(count)?;
        self.grow_for(required)?;

        let idx = index.as_usize();
        let tail = self.len_usize() - idx;
        let at = unsafe { self.base().add(idx) };
        unsafe { lifecycle::relocate_range(at.add(n), at, tail) };
        return Ok((at, tail, new_len));
    }

    /// Drops a validated run and moves the tail down over it.
    fn remove_run(&mut self, index: L, count: L) {
        let idx = index.as_usize();
        let n = count.as_usize();
        let old = self.inner.len;
        let tail = self.len_usize() - idx - n;
        // Hide the run and the tail while dropping, a panicking drop then
        // leaks the tail instead of dropping it twice.
        self.inner.len = index;
        unsafe {
            let at = self.base().add(idx);
            lifecycle::destruct_range(at, n);
            lifecycle::relocate_range(at, at.add(n), tail);
        }
        self.inner.len = old - count;
    }

    fn drop_all(&mut self) {
        let len = self.len_usize();
        self.inner.len = L::ZERO_VALUE;
        unsafe { lifecycle::destruct_range(self.base(), len) };
    }
}

impl<T, L: LengthType, P: SlackPolicy> Drop for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    fn drop(&mut self) {
        self.drop_all();
        self.inner.release(Self::LAYOUT);
    }
}
