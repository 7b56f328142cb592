use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::ptr::NonNull;

/// Element types that a `SlackArr` may duplicate.
///
/// Copying operations (`from_slice`, `insert_slice`, `Clone`, ...) need this
/// trait. Moving elements around never does, since a Rust move is always a
/// byte copy that forgets the source.
///
/// `BITWISE_COPY` defaults to `false`, which clones element by element.
/// Setting it to `true` lets whole runs be duplicated with a single
/// `memcpy`.
///
/// # Safety
///
/// With `BITWISE_COPY = true` the implementor promises that a byte copy of a
/// live value is a valid, independent value equal to a clone, and that the
/// type has no drop glue. In practice this means the type could be `Copy`.
/// Nothing checks this; a type that lies here will be duplicated without
/// its `Clone` impl ever running.
pub unsafe trait Element: Clone {
    const BITWISE_COPY: bool = false;
}

/// Construction of `Self` from a borrowed `S`.
///
/// Every `Element` can be built from itself. Beyond that, same width signed
/// and unsigned integers can be reinterpreted into each other, and a
/// `*const T` can be built from a `*mut T`.
///
/// # Safety
///
/// With `BITWISE = true`, `Self` and `S` must have the same size and the
/// bytes of any live `S` must form a valid `Self` equal to
/// `clone_from_source`.
pub unsafe trait CloneFrom<S>: Sized {
    const BITWISE: bool;

    fn clone_from_source(src: &S) -> Self;
}

unsafe impl<T: Element> CloneFrom<T> for T {
    const BITWISE: bool = T::BITWISE_COPY;

    #[inline]
    fn clone_from_source(src: &T) -> Self {
        return src.clone();
    }
}

macro_rules! impl_bitwise_element {
    ($($typ:ty),* $(,)?) => {
        $(
            unsafe impl Element for $typ {
                const BITWISE_COPY: bool = true;
            }
        )*
    };
}

impl_bitwise_element!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, ()
);

macro_rules! impl_sign_cast {
    ($($a:ty => $b:ty),* $(,)?) => {
        $(
            unsafe impl CloneFrom<$a> for $b {
                const BITWISE: bool = true;

                #[inline]
                fn clone_from_source(src: &$a) -> Self {
                    return *src as $b;
                }
            }

            unsafe impl CloneFrom<$b> for $a {
                const BITWISE: bool = true;

                #[inline]
                fn clone_from_source(src: &$b) -> Self {
                    return *src as $a;
                }
            }
        )*
    };
}

impl_sign_cast!(
    u8 => i8,
    u16 => i16,
    u32 => i32,
    u64 => i64,
    u128 => i128,
    usize => isize,
);

unsafe impl<T: ?Sized> Element for *const T {
    const BITWISE_COPY: bool = true;
}

unsafe impl<T: ?Sized> Element for *mut T {
    const BITWISE_COPY: bool = true;
}

unsafe impl<T: ?Sized> Element for NonNull<T> {
    const BITWISE_COPY: bool = true;
}

unsafe impl<T: ?Sized> Element for &T {
    const BITWISE_COPY: bool = true;
}

// A const pointer is just a narrower view of a mutable one.
unsafe impl<T: ?Sized> CloneFrom<*mut T> for *const T {
    const BITWISE: bool = true;

    #[inline]
    fn clone_from_source(src: &*mut T) -> Self {
        return src.cast_const();
    }
}

unsafe impl<T: Element> Element for Option<T> {
    const BITWISE_COPY: bool = T::BITWISE_COPY;
}

unsafe impl<T: Element, const N: usize> Element for [T; N] {
    const BITWISE_COPY: bool = T::BITWISE_COPY;
}

macro_rules! impl_tuple_element {
    ($($name:ident),+) => {
        unsafe impl<$($name: Element),+> Element for ($($name,)+) {
            const BITWISE_COPY: bool = true $(&& $name::BITWISE_COPY)+;
        }
    };
}

impl_tuple_element!(A);
impl_tuple_element!(A, B);
impl_tuple_element!(A, B, C);
impl_tuple_element!(A, B, C, D);

unsafe impl Element for String {}

unsafe impl<T: Clone> Element for Vec<T> {}

unsafe impl<T: Clone> Element for Box<T> {}

unsafe impl<T: ?Sized> Element for Rc<T> {}
