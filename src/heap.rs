//! The single allocation strategy used by `SlackArr`: the general purpose
//! heap, reached through the `allocator-api2` mirror of the allocator API
//! so that growing and shrinking can use `realloc` in place.
//!
//! Every request is logged at `trace` level.

use core::alloc::Layout;
use core::ptr::NonNull;

use allocator_api2::alloc::Allocator;
use allocator_api2::alloc::Global;

use crate::types::ErrorReason;
use crate::types::SlackArrErr;
use crate::types::SlackArrResult;

const ALLOC_FAILURE: SlackArrErr = SlackArrErr::new(ErrorReason::AllocFailure);

/// Allocates a block for `layout`, which must have a non-zero size.
pub(crate) fn allocate(layout: Layout) -> SlackArrResult<NonNull<u8>> {
    debug_assert!(layout.size() != 0);
    let Ok(mem) = Global.allocate(layout) else {
        log::trace!("allocation of {} bytes refused", layout.size());
        return Err(ALLOC_FAILURE);
    };
    log::trace!("allocated {} bytes at {:p}", layout.size(), mem);
    return Ok(mem.cast());
}

/// Resizes the block at `ptr` from `old` to `new`, moving its contents.
///
/// If this fails the old block is still valid. If it succeeds the old
/// pointer must no longer be used.
///
/// Safety: `ptr` must have been returned by `allocate` or `resize` with the
/// layout `old`, and `new` must share its alignment and have a non-zero size.
pub(crate) unsafe fn resize(ptr: NonNull<u8>, old: Layout, new: Layout) -> SlackArrResult<NonNull<u8>> {
    debug_assert!(new.size() != 0 && old.align() == new.align());
    let res = if new.size() >= old.size() {
        unsafe { Global.grow(ptr, old, new) }
    } else {
        unsafe { Global.shrink(ptr, old, new) }
    };
    let Ok(mem) = res else {
        log::trace!("resize {} -> {} bytes refused", old.size(), new.size());
        return Err(ALLOC_FAILURE);
    };
    log::trace!("resized {:p} ({} bytes) -> {:p} ({} bytes)", ptr, old.size(), mem, new.size());
    return Ok(mem.cast());
}

/// Releases the block at `ptr`.
///
/// Safety: `ptr` must have been returned by `allocate` or `resize` with the
/// layout `layout`, and must not be used afterwards.
pub(crate) unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout) {
    log::trace!("released {} bytes at {:p}", layout.size(), ptr);
    unsafe { Global.deallocate(ptr, layout) };
}
