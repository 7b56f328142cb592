//! Construction, relocation and destruction of runs of slots.
//!
//! Each helper has a byte path and a per element path. Which one runs is
//! decided by an associated const (or `needs_drop`), so after
//! monomorphization only one of them is left in the binary.

use core::mem;
use core::ptr;

use crate::types::CloneFrom;
use crate::types::Element;

/// Drops the slots `[start, start + done)` unless disarmed with `mem::forget`.
///
/// Used while filling a run of uninitialized slots with clones, so a
/// panicking `clone` does not leak the clones already written.
pub(crate) struct PartialRun<T> {
    pub(crate) start: *mut T,
    pub(crate) done:  usize,
}

impl<T> Drop for PartialRun<T> {
    fn drop(&mut self) {
        unsafe { destruct_range(self.start, self.done) };
    }
}

/// Writes a copy of every element of `src` into the uninitialized slots
/// starting at `dst`.
///
/// Safety: `dst` must be valid for `src.len()` writes and must not overlap `src`.
#[inline]
pub(crate) unsafe fn construct_range<D: CloneFrom<S>, S>(dst: *mut D, src: &[S]) {
    if D::BITWISE {
        unsafe { construct_bitwise(dst, src) };
    } else {
        unsafe { construct_each(dst, src) };
    }
}

unsafe fn construct_bitwise<D: CloneFrom<S>, S>(dst: *mut D, src: &[S]) {
    debug_assert_eq!(mem::size_of::<D>(), mem::size_of::<S>());
    if src.is_empty() {
        return;
    }
    unsafe { ptr::copy_nonoverlapping(src.as_ptr().cast::<D>(), dst, src.len()) };
}

unsafe fn construct_each<D: CloneFrom<S>, S>(dst: *mut D, src: &[S]) {
    let mut run = PartialRun { start: dst, done: 0 };
    for item in src {
        unsafe { dst.add(run.done).write(D::clone_from_source(item)) };
        run.done += 1;
    }
    mem::forget(run);
}

/// Writes `n` copies of `value` into the uninitialized slots starting at `dst`.
///
/// Safety: `dst` must be valid for `n` writes and must not overlap `value`.
#[inline]
pub(crate) unsafe fn fill_range<T: Element>(dst: *mut T, value: &T, n: usize) {
    if T::BITWISE_COPY {
        for i in 0..n {
            unsafe { ptr::copy_nonoverlapping(value, dst.add(i), 1) };
        }
        return;
    }
    let mut run = PartialRun { start: dst, done: 0 };
    while run.done < n {
        unsafe { dst.add(run.done).write(value.clone()) };
        run.done += 1;
    }
    mem::forget(run);
}

/// Moves `n` live elements from `src` to `dst`. The runs may overlap.
/// Afterwards the slots of `src` that are not part of `dst` are dead and
/// must not be dropped.
///
/// A Rust move never observes the address it moves from, so every type is
/// relocated with one `memmove`.
///
/// Safety: both runs must lie inside the same allocation (or two valid ones)
/// and `src` must hold `n` live elements.
#[inline]
pub(crate) unsafe fn relocate_range<T>(dst: *mut T, src: *const T, n: usize) {
    if n == 0 || ptr::eq(dst, src) {
        return;
    }
    unsafe { ptr::copy(src, dst, n) };
}

/// Drops `n` live elements starting at `ptr`.
///
/// Types without drop glue skip this entirely.
///
/// Safety: the slots must be live, and are dead afterwards.
#[inline]
pub(crate) unsafe fn destruct_range<T>(ptr: *mut T, n: usize) {
    if !mem::needs_drop::<T>() || n == 0 {
        return;
    }
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, n)) };
}

/// Sets the `n` slots starting at `ptr` to all zero bytes.
///
/// Safety: `ptr` must be valid for `n` writes.
#[inline]
pub(crate) unsafe fn zero_range<T>(ptr: *mut T, n: usize) {
    unsafe { ptr.write_bytes(0, n) };
}
