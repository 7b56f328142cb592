use core::fmt;
use core::ops;
use core::slice;

use super::SlackArr;
use crate::types::Element;
use crate::types::LengthType;
use crate::types::SlackPolicy;
use crate::types::fatal;

impl<T, L: LengthType, P: SlackPolicy> Default for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    /// An empty array that has not allocated.
    fn default() -> Self {
        return Self::new_unreserved();
    }
}

impl<T: Element, L: LengthType, P: SlackPolicy> Clone for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    /// Panics if the copy cannot be allocated, see `try_clone`.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(arr) => return arr,
            Err(e) => fatal(e),
        }
    }
}

impl<T: fmt::Debug, L: LengthType, P: SlackPolicy> fmt::Debug for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.as_slice()).finish();
    }
}

impl<T, U, L1, L2, P1, P2> PartialEq<SlackArr<U, L2, P2>> for SlackArr<T, L1, P1>
where
    T: PartialEq<U>,
    L1: LengthType,
    L2: LengthType,
    P1: SlackPolicy,
    P2: SlackPolicy,
    usize: TryFrom<L1>,
    usize: TryFrom<L2>,
{
    fn eq(&self, other: &SlackArr<U, L2, P2>) -> bool {
        return self.as_slice() == other.as_slice();
    }
}

impl<T: Eq, L: LengthType, P: SlackPolicy> Eq for SlackArr<T, L, P> where usize: TryFrom<L> {}

impl<T, U, L: LengthType, P: SlackPolicy> PartialEq<[U]> for SlackArr<T, L, P>
where
    T: PartialEq<U>,
    usize: TryFrom<L>,
{
    fn eq(&self, other: &[U]) -> bool {
        return self.as_slice() == other;
    }
}

impl<T, U, L: LengthType, P: SlackPolicy> PartialEq<&[U]> for SlackArr<T, L, P>
where
    T: PartialEq<U>,
    usize: TryFrom<L>,
{
    fn eq(&self, other: &&[U]) -> bool {
        return self.as_slice() == *other;
    }
}

impl<T, U, L: LengthType, P: SlackPolicy, const N: usize> PartialEq<[U; N]> for SlackArr<T, L, P>
where
    T: PartialEq<U>,
    usize: TryFrom<L>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        return self.as_slice() == &other[..];
    }
}

impl<T, L: LengthType, P: SlackPolicy> ops::Deref for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    type Target = [T];

    fn deref(&self) -> &[T] {
        return self.as_slice();
    }
}

impl<T, L: LengthType, P: SlackPolicy> ops::DerefMut for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    fn deref_mut(&mut self) -> &mut [T] {
        return self.as_mut_slice();
    }
}

impl<T, L: LengthType, P: SlackPolicy> AsRef<[T]> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    fn as_ref(&self) -> &[T] {
        return self.as_slice();
    }
}

impl<T, L: LengthType, P: SlackPolicy> AsMut<[T]> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    fn as_mut(&mut self) -> &mut [T] {
        return self.as_mut_slice();
    }
}

// An index that doesn't fit a usize can't be in bounds either, so it is
// mapped to one the slice rejects.
#[inline]
fn slot<L: LengthType>(index: L) -> usize
where
    usize: TryFrom<L>,
{
    return usize::try_from(index).ok().unwrap_or(usize::MAX);
}

impl<T, L: LengthType, P: SlackPolicy> ops::Index<L> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    type Output = T;

    #[inline]
    fn index(&self, index: L) -> &T {
        return &self.as_slice()[slot(index)];
    }
}

impl<T, L: LengthType, P: SlackPolicy> ops::IndexMut<L> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    #[inline]
    fn index_mut(&mut self, index: L) -> &mut T {
        return &mut self.as_mut_slice()[slot(index)];
    }
}

impl<'a, T, L: LengthType, P: SlackPolicy> IntoIterator for &'a SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.as_slice().iter();
    }
}

impl<'a, T, L: LengthType, P: SlackPolicy> IntoIterator for &'a mut SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.as_mut_slice().iter_mut();
    }
}

impl<T, L: LengthType, P: SlackPolicy> Extend<T> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    /// Panics if the array cannot grow.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(e) = self.push(item) {
                fatal(e);
            }
        }
    }
}

impl<T, L: LengthType, P: SlackPolicy> FromIterator<T> for SlackArr<T, L, P>
where
    usize: TryFrom<L>,
{
    /// Panics if the array cannot grow.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new_unreserved();
        arr.extend(iter);
        return arr;
    }
}
