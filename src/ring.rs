use crate::SlackArr;
use crate::types::ErrorReason;
use crate::types::SlackArrErr;
use crate::types::SlackArrResult;

/// A FIFO queue stored in a `SlackArr` of slots.
///
/// The slot count starts at `DEFAULT`, doubles when a push finds every slot
/// taken, and halves again (never below `DEFAULT`) when a pop finds at most
/// half of them in use.
pub struct RingBuf<T, const DEFAULT: usize = 4> {
    slots: SlackArr<Option<T>, usize>,
    head:  usize,
    len:   usize,
}

impl<T, const DEFAULT: usize> RingBuf<T, DEFAULT> {
    pub fn new() -> SlackArrResult<Self> {
        const { assert!(DEFAULT > 0, "a ring buffer needs at least one slot") };
        let mut slots = SlackArr::new_unreserved();
        slots.reserve(DEFAULT)?;
        for _ in 0..DEFAULT {
            slots.push(None)?;
        }
        return Ok(Self {
            slots: slots,
            head:  0,
            len:   0,
        });
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        return self.slots.len();
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.len;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        return self.len == self.capacity();
    }

    /// Appends `item` at the back.
    pub fn push(&mut self, item: T) -> SlackArrResult<()> {
        if self.is_full() {
            self.expand()?;
        }
        let tail = (self.head + self.len) % self.capacity();
        self.slots[tail] = Some(item);
        self.len += 1;
        return Ok(());
    }

    /// Removes the item at the front.
    pub fn pop(&mut self) -> SlackArrResult<T> {
        if self.is_empty() {
            return Err(SlackArrErr::new(ErrorReason::Empty));
        }
        self.try_shrink()?;
        let Some(item) = self.slots[self.head].take() else {
            return Err(SlackArrErr::new(ErrorReason::Empty));
        };
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        return Ok(item);
    }

    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        return self.slots[self.head].as_ref();
    }

    /// The items from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let cap = self.capacity();
        return (0..self.len).filter_map(move |i| self.slots[(self.head + i) % cap].as_ref());
    }

    /// Drops every item, keeping the slots.
    pub fn clear(&mut self) {
        for slot in self.slots.as_mut_slice() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Doubles the slots of a full buffer.
    fn expand(&mut self) -> SlackArrResult<()> {
        let old = self.capacity();
        let Some(new) = old.checked_mul(2) else {
            return Err(SlackArrErr::new(ErrorReason::CapacityOverflow));
        };
        self.slots.reserve(new)?;
        for _ in 0..old {
            self.slots.push(None)?;
        }
        // A full buffer wraps unless it starts at slot 0. Move the front
        // segment to the end so the free slots sit between back and front.
        if self.head != 0 {
            for i in (self.head..old).rev() {
                let item = self.slots[i].take();
                self.slots[i + old] = item;
            }
            self.head += old;
        }
        return Ok(());
    }

    /// Halves the slots when at most half of them are used.
    fn try_shrink(&mut self) -> SlackArrResult<()> {
        let cap = self.capacity();
        let keep = (cap / 2).max(DEFAULT);
        if self.len > cap / 2 || cap <= DEFAULT {
            return Ok(());
        }
        // Bring the items to the front unless they already fit there.
        if self.head + self.len > keep {
            self.slots.as_mut_slice().rotate_left(self.head);
            self.head = 0;
        }
        return self.slots.remove_at(keep, cap - keep);
    }
}
