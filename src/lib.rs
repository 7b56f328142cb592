//! # Slack Array
//!
//! The `slack_array` crate provides a `#[no_std]` growable array, `SlackArr`, much like
//! `std::Vec` but tuned to keep reallocations rare in both directions.
//!
//! Growth is geometric with a constant term, so appends are amortized O(1) and tiny
//! arrays only get a handful of slots. Shrinking is opportunistic: after a removal the
//! array gives memory back only when the slack is both large in proportion and large in
//! absolute terms, so workloads that push and pop around a boundary do not thrash.
//! [`types::SlackPolicy`] holds the constants and can be swapped per array.
//!
//! Every operation that can allocate is fallible and returns an error instead of
//! aborting, and the type used for the length, capacity and indices is a generic
//! parameter, see [`types::LengthType`].
//!
//! Copying elements in and out goes through [`types::Element`] and
//! [`types::CloneFrom`]. Types that declare themselves bitwise copyable are duplicated
//! with one `memcpy` per run instead of one `clone` per element. Types without drop glue
//! are never visited on removal.
//!
//! [`RingBuf`] is a FIFO queue built only on the public surface of `SlackArr`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod heap;
mod ring;
mod slack_array;
pub mod types;

pub use ring::RingBuf;
pub use slack_array::SlackArr;
