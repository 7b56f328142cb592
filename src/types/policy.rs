/// Controls how a `SlackArr` sizes its allocation.
///
/// Every constant has a default, so a custom policy only overrides what it
/// needs to retune:
///
/// ```
/// use slack_array::types::SlackPolicy;
///
/// struct Eager;
///
/// impl SlackPolicy for Eager {
///     const DEFAULT_CAPACITY: usize = 32;
///     const SHRINK_SLACK_ELEMENTS: usize = 1024;
/// }
/// ```
///
/// Growth must stay geometric and shrinking must keep some hysteresis,
/// otherwise pushes and pops near a boundary reallocate every call.
pub trait SlackPolicy {
    /// Slots reserved by `SlackArr::new`.
    const DEFAULT_CAPACITY: usize = 4;
    /// Capacity of the first allocation of an array that starts out empty.
    const FIRST_GROW: usize = 4;
    /// Flat amount added on every proportional growth.
    const CONSTANT_GROW: usize = 16;
    /// Unused bytes at which an array is considered wasteful.
    const SHRINK_SLACK_BYTES: usize = 16384;
    /// Unused elements that must be exceeded before any shrink happens.
    const SHRINK_SLACK_ELEMENTS: usize = 64;

    /// Capacity to allocate when `required` elements no longer fit in `capacity`.
    fn grow(required: usize, capacity: usize) -> usize {
        if capacity == 0 && required <= Self::FIRST_GROW {
            return Self::FIRST_GROW;
        }
        // required * 3 / 8 without overflowing
        let extra = (required / 8) * 3 + ((required % 8) * 3) / 8;
        return required
            .saturating_add(extra)
            .saturating_add(Self::CONSTANT_GROW);
    }

    /// Capacity to keep once only `len` of `capacity` slots hold elements.
    /// Returns `capacity` unchanged when the slack is tolerable.
    fn shrink(len: usize, capacity: usize, elem_size: usize) -> usize {
        if len >= capacity {
            return capacity;
        }
        let slack = capacity - len;
        let too_many_bytes = slack.saturating_mul(elem_size) >= Self::SHRINK_SLACK_BYTES;
        let too_many_elems = len.saturating_mul(3) < capacity.saturating_mul(2);
        if (too_many_bytes || too_many_elems) && (slack > Self::SHRINK_SLACK_ELEMENTS || len == 0) {
            return len;
        }
        return capacity;
    }
}

/// The policy used when none is specified.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DefaultSlack;

impl SlackPolicy for DefaultSlack {}
