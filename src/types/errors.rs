use core::error::Error;
use core::fmt;

/// This enum lets one figure out what kind of error occurred during
/// a `SlackArr` operation.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// The requested capacity cannot be represented by the length type.
    CapacityOverflow = 1,
    /// A byte size computation overflowed `usize`.
    UsizeOverflow,
    /// The array layout could not be built, usually because it exceeds `isize::MAX` bytes.
    LayoutFailure,
    /// The heap could not satisfy the request.
    AllocFailure,
    /// An index or count fell outside the live elements.
    OutOfRange,
    /// The operation needs at least one element.
    Empty,
}

/// A type alias for `Result<T, SlackArrErr>`
pub type SlackArrResult<T> = Result<T, SlackArrErr>;

/// This is used to indicate an error during a `SlackArr` operation.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlackArrErr(ErrorReason);

impl SlackArrErr {
    pub(crate) const fn new(reason: ErrorReason) -> Self {
        return Self(reason);
    }

    pub const fn reason(self) -> ErrorReason {
        return self.0;
    }
}

impl From<ErrorReason> for SlackArrErr {
    fn from(reason: ErrorReason) -> Self {
        return Self::new(reason);
    }
}

impl Error for SlackArrErr {}

impl fmt::Display for SlackArrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorReason::CapacityOverflow => f.write_str("Capacity type overflowed."),
            ErrorReason::UsizeOverflow => f.write_str("usize overflowed."),
            ErrorReason::LayoutFailure => f.write_str("Failed to create layout."),
            ErrorReason::AllocFailure => f.write_str("An allocation failure occurred."),
            ErrorReason::OutOfRange => f.write_str("Index or count out of range."),
            ErrorReason::Empty => f.write_str("The array is empty."),
        }
    }
}

/// Aborts an infallible operation whose fallible core reported `err`.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn fatal(err: SlackArrErr) -> ! {
    panic!("slack_array: {err}");
}
