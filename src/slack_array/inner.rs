use core::alloc::Layout;
use core::ptr;
use core::ptr::NonNull;

use crate::heap;
use crate::types::ErrorReason;
use crate::types::LengthType;
use crate::types::SlackArrErr;
use crate::types::SlackArrResult;

const fn layout_array(layout: Layout, length: usize) -> SlackArrResult<Layout> {
    let lay = layout.pad_to_align();
    let Some(len) = length.checked_mul(lay.size()) else {
        return Err(SlackArrErr::new(ErrorReason::UsizeOverflow));
    };
    let Ok(lay) = Layout::from_size_align(len, layout.align()) else {
        return Err(SlackArrErr::new(ErrorReason::LayoutFailure));
    };
    return Ok(lay);
}

const fn dangling(align: usize) -> NonNull<u8> {
    // Safety: alignments are never zero.
    return unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(align)) };
}

/// The raw storage of a `SlackArr`: one block of slots, its capacity and the
/// number of live slots at the front.
///
/// It is not generic over the element type, only its `Layout` is passed in,
/// so the allocation paths are shared by every element type. It never reads
/// or drops the slots, that is up to the owning array.
pub(crate) struct Inner<L: LengthType>
where
    usize: TryFrom<L>,
{
    ptr:            NonNull<u8>,
    capacity:       L,
    pub(crate) len: L,
}

impl<L: LengthType> Inner<L>
where
    usize: TryFrom<L>,
{
    pub(crate) const fn new_in<T>() -> Self {
        return Self {
            ptr:      NonNull::<T>::dangling().cast(),
            capacity: L::ZERO_VALUE,
            len:      L::ZERO_VALUE,
        };
    }

    /// Zero sized types never allocate, so every representable
    /// length fits.
    #[inline]
    pub(crate) const fn capacity(&self, size: usize) -> L {
        if size == 0 {
            return L::MAX_VALUE;
        }
        return self.capacity;
    }

    #[inline]
    pub(crate) const fn get_ptr<T>(&self) -> *mut T {
        return self.ptr.as_ptr().cast();
    }

    /// The number of bytes currently allocated.
    pub(crate) fn allocated_size(&self, layout: Layout) -> usize {
        if layout.size() == 0 {
            return 0;
        }
        return self.capacity.as_usize() * layout.pad_to_align().size();
    }

    /// Reallocates to exactly `new_cap` slots of `layout`, moving the bytes
    /// of the slots that survive.
    ///
    /// On error nothing changed. A zero capacity releases the block.
    pub(crate) fn resize_to(&mut self, new_cap: usize, layout: Layout) -> SlackArrResult<()> {
        if layout.size() == 0 {
            return Ok(());
        }
        let Some(cap) = L::from_usize(new_cap) else {
            return Err(SlackArrErr::new(ErrorReason::CapacityOverflow));
        };
        let old_cap = self.capacity.as_usize();
        if new_cap == old_cap {
            return Ok(());
        }

        let new_layout = layout_array(layout, new_cap)?;
        if old_cap == 0 {
            self.ptr = heap::allocate(new_layout)?;
            self.capacity = cap;
            return Ok(());
        }

        // This layout was valid when the block was allocated.
        let old_layout = layout_array(layout, old_cap)?;
        if new_cap == 0 {
            unsafe { heap::deallocate(self.ptr, old_layout) };
            self.ptr = dangling(layout.align());
        } else {
            self.ptr = unsafe { heap::resize(self.ptr, old_layout, new_layout)? };
        }
        self.capacity = cap;
        return Ok(());
    }

    /// Frees the block. The caller must have dropped the live slots already.
    pub(crate) fn release(&mut self, layout: Layout) {
        if layout.size() == 0 || self.capacity == L::ZERO_VALUE {
            return;
        }
        if let Ok(old_layout) = layout_array(layout, self.capacity.as_usize()) {
            unsafe { heap::deallocate(self.ptr, old_layout) };
        }
        self.ptr = dangling(layout.align());
        self.capacity = L::ZERO_VALUE;
    }
}
