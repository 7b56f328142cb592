use core::cell::Cell;
use core::cell::RefCell;
use core::mem::size_of;
use core::mem::size_of_val;
use core::ptr::NonNull;
use core::ptr::dangling_mut;
use std::collections::HashSet;
use std::format;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::string::String;
use std::string::ToString;
use std::vec;
use std::vec::Vec;

use super::SlackArr;
use super::inner::Inner;
use crate::types::Element;
use crate::types::ErrorReason;
use crate::types::SlackPolicy;

struct ExpectedSizeU32 {
    _p: NonNull<u8>,
    _a: u32,
    _b: u32,
}

struct ExpectedSizeU16 {
    _p: NonNull<u8>,
    _a: u16,
    _b: u16,
}

struct ExpectedSizeU8 {
    _p: NonNull<u8>,
    _a: u8,
    _b: u8,
}

/// Records every construction and drop of `Tracked` values, and fails on a
/// drop of a value that is not live.
#[derive(Default)]
struct Ledger {
    next:        Cell<u64>,
    live:        RefCell<HashSet<u64>>,
    made:        Cell<usize>,
    dropped:     Cell<usize>,
    clones_left: Cell<Option<usize>>,
}

impl Ledger {
    fn register(&self) -> u64 {
        let id = self.next.get();
        self.next.set(id + 1);
        self.made.set(self.made.get() + 1);
        assert!(self.live.borrow_mut().insert(id));
        return id;
    }

    fn live(&self) -> usize {
        return self.live.borrow().len();
    }
}

struct Tracked {
    id:     u64,
    value:  i32,
    ledger: Rc<Ledger>,
}

impl Tracked {
    fn new(ledger: &Rc<Ledger>, value: i32) -> Self {
        return Self {
            id: ledger.register(),
            value: value,
            ledger: ledger.clone(),
        };
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if let Some(left) = self.ledger.clones_left.get() {
            if left == 0 {
                panic!("out of clones");
            }
            self.ledger.clones_left.set(Some(left - 1));
        }
        return Self::new(&self.ledger, self.value);
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let was_live = self.ledger.live.borrow_mut().remove(&self.id);
        assert!(was_live, "value {} dropped twice", self.id);
        self.ledger.dropped.set(self.ledger.dropped.get() + 1);
    }
}

unsafe impl Element for Tracked {}

fn values(arr: &SlackArr<Tracked>) -> Vec<i32> {
    return arr.iter().map(|t| t.value).collect();
}

fn from_values(values: &[i32]) -> SlackArr<i32> {
    return SlackArr::from_slice(values).unwrap();
}

#[test]
fn inner_new() {
    // Check for index type `u32`(default) and for the type `u32`
    let inner = Inner::<u32>::new_in::<u32>();
    assert_eq!(inner.capacity(size_of::<u32>()), 0);
    assert_eq!(inner.len, 0);
    assert_eq!(size_of_val(&inner), size_of::<ExpectedSizeU32>());
    assert_eq!(inner.get_ptr::<u32>(), dangling_mut::<u32>());

    // Check for index type u16 and for the type `u64`
    let inner = Inner::<u16>::new_in::<u64>();
    assert_eq!(inner.capacity(size_of::<u64>()), 0);
    assert_eq!(inner.len, 0);
    assert_eq!(size_of_val(&inner), size_of::<ExpectedSizeU16>());
    assert_eq!(inner.get_ptr::<u64>(), dangling_mut::<u64>());

    // Check for index type u8 and for the type `()`
    let inner = Inner::<u8>::new_in::<()>();
    assert_eq!(inner.capacity(size_of::<()>()), u8::MAX);
    assert_eq!(inner.len, 0);
    assert_eq!(size_of_val(&inner), size_of::<ExpectedSizeU8>());
    assert_eq!(inner.get_ptr::<()>(), dangling_mut::<()>());
}

#[test]
fn array_new() {
    // u32 length and u32 type
    let arr = SlackArr::<u32>::new_unreserved();
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 0);
    assert_eq!(arr.allocated_size(), 0);
    assert_eq!(size_of_val(&arr), size_of::<ExpectedSizeU32>());

    // u16 length and u64 type
    let arr = SlackArr::<u64, u16>::new().unwrap();
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.allocated_size(), 32);
    assert_eq!(size_of_val(&arr), size_of::<ExpectedSizeU16>());

    // u8 length and `()`type
    let arr = SlackArr::<(), u8>::new().unwrap();
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), u8::MAX);
    assert_eq!(size_of_val(&arr), size_of::<ExpectedSizeU8>());

    let arr = SlackArr::<String>::default();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn push_fail() {
    let mut arr = SlackArr::<(), u8>::new_unreserved();

    // I should be able to push this ZST 255 times.
    for _ in 0..u8::MAX {
        assert!(arr.push(()).is_ok());
    }
    assert_eq!(arr.len(), u8::MAX);

    // This should fail
    let ret = arr.push(());
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::CapacityOverflow);
    assert_eq!(arr.len(), u8::MAX);

    let mut arr = SlackArr::<u8, u8>::from_slice(&[7u8; 250]).unwrap();
    let ret = arr.insert_slice(3, &[1u8; 6]);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::CapacityOverflow);
    assert_eq!(arr.len(), 250);
    assert!(arr.iter().all(|v| *v == 7));
}

#[test]
fn usize_and_layout_failure() {
    let massive: u128 = (usize::MAX as u128) + 1;
    let ret = SlackArr::<u8, u128>::with_capacity(massive);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::UsizeOverflow);

    let massive: u128 = (isize::MAX as u128) + 1;
    let ret = SlackArr::<u8, u128>::with_capacity(massive);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::LayoutFailure);

    let massive = (usize::MAX / 256) + 1;
    let ret = SlackArr::<[u8; 256], usize>::with_capacity(massive);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::UsizeOverflow);

    let massive = ((isize::MAX / 256) + 1) as usize;
    let ret = SlackArr::<[u8; 256], usize>::with_capacity(massive);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::LayoutFailure);
}

#[test]
fn lengths_beyond_usize_are_rejected() {
    let massive: u128 = 1u128 << 64;

    // Growing to a length that doesn't fit a usize must not write anything.
    let mut arr = SlackArr::<u8, u128>::new().unwrap();
    let mut calls = 0;
    let ret = arr.resize_with(massive, || {
        calls += 1;
        return 0;
    });
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(calls, 0);
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 4);

    // A wrapping count would insert a single element instead of failing.
    let mut arr = SlackArr::<u8, u128>::from_slice(&[1u8, 2]).unwrap();
    let ret = unsafe { arr.insert_zeroed(0, massive + 1) };
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr, [1, 2]);

    let ret = SlackArr::<u8, u128>::from_elem(massive + 1, &3);
    assert_eq!(ret.unwrap_err().reason(), ErrorReason::UsizeOverflow);

    let mut arr = SlackArr::<u8, u128>::from_slice(&[1u8, 2]).unwrap();
    let capacity = arr.capacity();
    assert_eq!(arr.reserve(massive).unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr.capacity(), capacity);
    assert_eq!(arr.clear_with_slack(massive).unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr, [1, 2]);

    // Zero sized elements can reach a length of usize::MAX without memory.
    let mut arr = SlackArr::<(), u128>::new_unreserved();
    let full = usize::MAX as u128;
    unsafe { arr.set_len(full) };
    assert_eq!(arr.push(()).unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr.emplace(|| ()).unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(unsafe { arr.push_zeroed() }.unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr.insert(0, ()).unwrap_err().reason(), ErrorReason::UsizeOverflow);
    assert_eq!(arr.len(), full);
}

#[test]
fn push_pop() {
    let mut arr = SlackArr::<u8>::new().unwrap();

    assert_eq!(arr.push(0xcu8).unwrap(), 0);
    assert_eq!(arr.push(0xau8).unwrap(), 1);
    arr.push(0xfu8).unwrap();
    arr.push(0xeu8).unwrap();

    assert_eq!(arr.len(), 4);

    assert_eq!(arr[0u32], 0xc);
    assert_eq!(arr[1u32], 0xa);
    assert_eq!(arr[2u32], 0xf);
    assert_eq!(arr[3u32], 0xe);

    assert_eq!(arr.pop().unwrap(), 0xeu8);

    arr.push(127).unwrap();
    assert_eq!(arr[3], 127);

    arr[0] = 0x99;

    assert_eq!(arr.pop().unwrap(), 127);
    assert_eq!(arr.pop().unwrap(), 0xf);
    assert_eq!(arr.pop().unwrap(), 0xa);
    assert_eq!(arr.pop().unwrap(), 0x99);
    assert_eq!(arr.pop().unwrap_err().reason(), ErrorReason::Empty);

    let mut arr = SlackArr::<String>::with_capacity(2).unwrap();
    arr.push("Hello".to_string()).unwrap();
    arr.push("There".to_string()).unwrap();
    assert_eq!(arr[0], "Hello");
    assert_eq!(arr[1], "There");

    let there = arr.pop().unwrap();
    assert_eq!(there, "There");
}

#[test]
fn append_grows_then_finds() {
    let mut arr = SlackArr::<i32>::new().unwrap();
    assert_eq!(arr.capacity(), 4);
    for v in [1, 2, 3, 1, 2, 3, 1, 2, 3] {
        arr.push(v).unwrap();
    }
    assert_eq!(arr.len(), 9);
    assert_eq!(arr.capacity(), 22);
    assert_eq!(arr.find(&2), Some(1));
    assert_eq!(arr.find_last(&2), Some(7));
    assert_eq!(arr.find(&4), None);

    let capacity = arr.capacity();
    let mut popped = Vec::new();
    let mut changes = 0;
    for _ in 0..6 {
        popped.push(arr.pop().unwrap());
        if arr.capacity() != capacity {
            changes += 1;
        }
    }
    assert_eq!(popped, [3, 2, 1, 3, 2, 1]);
    assert!(changes <= 1);
    assert_eq!(arr, [1, 2, 3]);
}

#[test]
fn growth_sequence() {
    let mut arr = SlackArr::<u32>::new().unwrap();
    let mut seen = vec![arr.capacity()];
    for v in 0..200 {
        arr.push(v).unwrap();
        if *seen.last().unwrap() != arr.capacity() {
            seen.push(arr.capacity());
        }
        assert!(arr.len() <= arr.capacity());
    }
    assert_eq!(seen, [4, 22, 47, 82, 130, 196, 286]);
}

#[test]
fn shrink_has_hysteresis() {
    let mut arr = SlackArr::<u32>::new().unwrap();
    for v in 0..200 {
        arr.push(v).unwrap();
    }
    let mut shrinks = Vec::new();
    let mut capacity = arr.capacity();
    while !arr.is_empty() {
        arr.pop().unwrap();
        if arr.capacity() != capacity {
            capacity = arr.capacity();
            shrinks.push((arr.len(), capacity));
        }
        assert!(arr.len() <= arr.capacity());
    }
    assert_eq!(shrinks, [(190, 190), (125, 125), (60, 60), (0, 0)]);

    // Alternating push and pop right past a growth never reallocates.
    let mut arr = SlackArr::<u32>::new().unwrap();
    for v in 0..23 {
        arr.push(v).unwrap();
    }
    let capacity = arr.capacity();
    assert_eq!(capacity, 47);
    for v in 0..100 {
        arr.pop().unwrap();
        arr.push(v).unwrap();
        arr.pop().unwrap();
        arr.pop().unwrap();
        arr.push(v).unwrap();
        arr.push(v).unwrap();
        assert_eq!(arr.capacity(), capacity);
    }

    // Shrinking can be turned off per call.
    let mut arr = SlackArr::<u32>::new().unwrap();
    arr.push(1).unwrap();
    arr.pop_with_shrink(false).unwrap();
    assert_eq!(arr.capacity(), 4);
    arr.push(1).unwrap();
    arr.pop().unwrap();
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn remove_value_keeps_order() {
    let mut arr = from_values(&[2, 3, 2, 3, 2, 3]);
    assert_eq!(arr.remove_value(&2), 3);
    assert_eq!(arr, [3, 3, 3]);
    assert_eq!(arr.remove_value(&2), 0);

    let mut arr = from_values(&[1, 1, 2, 2, 2, 3, 1, 4, 4, 1]);
    assert_eq!(arr.remove_value(&1), 4);
    assert_eq!(arr, [2, 2, 2, 3, 4, 4]);

    let mut arr = from_values(&[5, 5, 5]);
    assert_eq!(arr.remove_value(&5), 3);
    assert!(arr.is_empty());

    let mut arr = from_values(&[4, 5, 4]);
    assert_eq!(arr.remove_single(&4), 1);
    assert_eq!(arr, [5, 4]);
    assert_eq!(arr.remove_single(&6), 0);

    let mut arr = SlackArr::<i32>::new_unreserved();
    assert_eq!(arr.remove_value(&5), 0);
}

#[test]
fn remove_matching_calls_once_per_element() {
    let mut arr = from_values(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    let mut calls = Vec::new();
    let removed = arr.remove_matching(|v| {
        calls.push(*v);
        return *v % 3 == 0;
    });
    assert_eq!(removed, 4);
    assert_eq!(calls, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(arr, [1, 2, 4, 5, 7, 8]);
}

#[test]
fn remove_matching_survives_panicking_predicate() {
    let originals: Vec<Rc<i32>> = (0..10).map(Rc::new).collect();
    let mut arr = SlackArr::<Rc<i32>>::from_slice(originals.as_slice()).unwrap();
    let res = panic::catch_unwind(AssertUnwindSafe(|| {
        arr.remove_matching(|v| {
            if **v == 7 {
                panic!("predicate failed");
            }
            return **v % 2 == 0;
        });
    }));
    assert!(res.is_err());
    let left: Vec<i32> = arr.iter().map(|v| **v).collect();
    assert_eq!(left, [1, 3, 5, 6, 7, 8, 9]);
    for (i, rc) in originals.iter().enumerate() {
        let expected = if left.contains(&(i as i32)) { 2 } else { 1 };
        assert_eq!(Rc::strong_count(rc), expected, "element {i}");
    }
    drop(arr);
    assert!(originals.iter().all(|rc| Rc::strong_count(rc) == 1));
}

#[test]
fn insert_in_the_middle() {
    let mut arr = from_values(&[10, 20, 30]);
    assert_eq!(arr.insert(1, 99).unwrap(), 1);
    assert_eq!(arr, [10, 99, 20, 30]);

    arr.insert(4, 40).unwrap();
    arr.insert(0, 0).unwrap();
    assert_eq!(arr, [0, 10, 99, 20, 30, 40]);

    let err = arr.insert(7, 1).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::OutOfRange);
    assert_eq!(arr, [0, 10, 99, 20, 30, 40]);

    arr.insert_slice(2, &[1i32, 2, 3]).unwrap();
    assert_eq!(arr, [0, 10, 1, 2, 3, 99, 20, 30, 40]);

    // Signed into unsigned goes through the bitwise path.
    let mut unsigned = SlackArr::<u32>::from_slice(&[1i32, -1]).unwrap();
    unsigned.insert_slice(1, &[-2i32]).unwrap();
    assert_eq!(unsigned, [1, u32::MAX - 1, u32::MAX]);
}

#[test]
fn insert_then_remove_round_trips() {
    let mut arr = from_values(&[1, 2, 3, 4, 5]);
    for i in 0..=5u32 {
        arr.insert(i, 42).unwrap();
        assert_eq!(arr.remove(i).unwrap(), 42);
        assert_eq!(arr, [1, 2, 3, 4, 5]);

        arr.insert_slice(i, &[7i32, 8]).unwrap();
        arr.remove_at(i, 2).unwrap();
        assert_eq!(arr, [1, 2, 3, 4, 5]);
    }
}

#[test]
fn remove_at_ranges() {
    let mut arr = from_values(&[0, 1, 2, 3, 4, 5]);
    arr.remove_at(1, 2).unwrap();
    assert_eq!(arr, [0, 3, 4, 5]);
    arr.remove_at(4, 0).unwrap();
    assert_eq!(arr, [0, 3, 4, 5]);

    assert_eq!(arr.remove_at(3, 2).unwrap_err().reason(), ErrorReason::OutOfRange);
    assert_eq!(arr.remove_at(5, 0).unwrap_err().reason(), ErrorReason::OutOfRange);
    assert_eq!(arr.remove_at(1, u32::MAX).unwrap_err().reason(), ErrorReason::OutOfRange);
    assert_eq!(arr.remove(4).unwrap_err().reason(), ErrorReason::OutOfRange);
    assert_eq!(arr, [0, 3, 4, 5]);

    arr.remove_at_with_shrink(0, 4, false).unwrap();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 6);
}

#[test]
fn push_pop_is_lifo() {
    let mut arr = SlackArr::<String, u16>::new().unwrap();
    for i in 0..50 {
        arr.push(format!("item {i}")).unwrap();
    }
    for i in (0..50).rev() {
        assert_eq!(arr.pop().unwrap(), format!("item {i}"));
    }
    assert_eq!(arr.len(), 0);
}

#[test]
fn no_double_drop_or_leak() {
    let ledger = Rc::new(Ledger::default());
    {
        let mut arr = SlackArr::<Tracked>::new().unwrap();
        for v in 0..100 {
            arr.push(Tracked::new(&ledger, v)).unwrap();
        }
        assert_eq!(ledger.made.get(), 100);
        assert_eq!(ledger.dropped.get(), 0);

        // Reallocations in both directions move, never clone or drop.
        arr.remove_at(10, 80).unwrap();
        assert_eq!(ledger.made.get(), 100);
        assert_eq!(ledger.dropped.get(), 80);
        assert_eq!(ledger.live(), 20);

        arr.insert(5, Tracked::new(&ledger, -1)).unwrap();
        assert_eq!(arr.remove_matching(|t| t.value == -1), 1);
        assert_eq!(arr.remove_matching(|t| t.value == 3), 1);
        assert_eq!(arr.remove_matching(|t| t.value == 3), 0);
        let popped = arr.pop().unwrap();
        assert_eq!(popped.value, 99);
        drop(popped);
        assert_eq!(ledger.live(), 18);

        let copy = arr.clone();
        assert_eq!(values(&copy), values(&arr));
        assert_eq!(ledger.live(), 36);
        arr.clear();
        assert_eq!(arr.capacity(), 0);
        assert_eq!(ledger.live(), 18);
    }
    assert_eq!(ledger.live(), 0);
    assert_eq!(ledger.made.get(), ledger.dropped.get());
}

#[test]
fn failed_clone_restores_tail() {
    let ledger = Rc::new(Ledger::default());
    let mut arr = SlackArr::<Tracked>::new().unwrap();
    for v in [1, 2, 3] {
        arr.push(Tracked::new(&ledger, v)).unwrap();
    }
    let extra = [Tracked::new(&ledger, 7), Tracked::new(&ledger, 8), Tracked::new(&ledger, 9)];
    ledger.clones_left.set(Some(2));
    let res = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = arr.insert_slice(1, &extra);
    }));
    assert!(res.is_err());
    assert_eq!(values(&arr), [1, 2, 3]);
    // Three in the array, three in `extra`, the two clones got dropped.
    assert_eq!(ledger.live(), 6);

    ledger.clones_left.set(None);
    arr.insert_slice(1, &extra).unwrap();
    assert_eq!(values(&arr), [1, 7, 8, 9, 2, 3]);
    drop(extra);
    drop(arr);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn reserve_and_shrink_to_fit() {
    let mut arr = SlackArr::<u64>::new().unwrap();
    arr.reserve(2).unwrap();
    assert_eq!(arr.capacity(), 4);
    arr.reserve(100).unwrap();
    assert_eq!(arr.capacity(), 100);
    assert_eq!(arr.allocated_size(), 800);
    arr.extend_from_slice(&[1u64, 2, 3]).unwrap();
    assert_eq!(arr.slack(), 97);
    arr.shrink_to_fit().unwrap();
    assert_eq!(arr.capacity(), 3);
    assert_eq!(arr, [1, 2, 3]);

    arr.clear_with_slack(10).unwrap();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 10);

    arr.extend_from_slice(&[4u64, 5]).unwrap();
    arr.reset(8).unwrap();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 10);
    arr.reset(12).unwrap();
    assert_eq!(arr.capacity(), 12);

    arr.shrink_to_fit().unwrap();
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn construct_and_compare() {
    let a = SlackArr::<i32>::from_elem(3, &7).unwrap();
    assert_eq!(a, [7, 7, 7]);
    let b = SlackArr::<i32, u8>::from_default(3).unwrap();
    assert_eq!(b, [0, 0, 0]);
    let c = SlackArr::<i32, usize>::from_slice(&[7i32, 7, 7]).unwrap();
    assert_eq!(a, c);
    assert!(a != b);
    assert_eq!(a, &[7, 7, 7][..]);

    let strings = SlackArr::<String>::from_elem(2, &"x".to_string()).unwrap();
    assert_eq!(strings.clone(), strings);
    assert_eq!(format!("{:?}", strings), "[\"x\", \"x\"]");

    let mut mutable = [1u8, 2];
    let ptrs = [mutable.as_mut_ptr()];
    let consts = SlackArr::<*const u8>::from_slice(&ptrs).unwrap();
    assert_eq!(consts[0], mutable.as_ptr());

    let collected: SlackArr<u32> = (0..5).collect();
    assert_eq!(collected, [0, 1, 2, 3, 4]);
    let mut extended = collected.try_clone().unwrap();
    extended.extend([5, 6]);
    assert_eq!(extended.len(), 7);
    assert!(extended != collected);
}

#[test]
fn lookups() {
    let mut arr = SlackArr::<(u8, char)>::from_slice(&[(1, 'a'), (2, 'b'), (1, 'c')]).unwrap();
    assert_eq!(arr.top(), Some(&(1, 'c')));
    assert_eq!(arr.nth_last(1), Some(&(2, 'b')));
    assert_eq!(arr.nth_last(3), None);
    assert_eq!(arr.get(1), Some(&(2, 'b')));
    assert_eq!(arr.get(3), None);
    assert_eq!(arr.find_last(&(1, 'a')), Some(0));
    assert_eq!(arr.find_by_key(&(2, 'b')), Some(&(2, 'b')));

    if let Some(item) = arr.find_by_key_mut(&(2, 'b')) {
        item.1 = 'z';
    }
    if let Some(item) = arr.nth_last_mut(0) {
        item.0 = 9;
    }
    if let Some(item) = arr.get_mut(0) {
        item.0 = 0;
    }
    assert_eq!(arr, [(0, 'a'), (2, 'z'), (9, 'c')]);
    for item in &mut arr {
        item.0 += 1;
    }
    let firsts: Vec<u8> = (&arr).into_iter().map(|i| i.0).collect();
    assert_eq!(firsts, [1, 3, 10]);
}

#[test]
fn move_between_arrays() {
    let mut a = from_values(&[1, 5]);
    let b = SlackArr::<i32, u8>::from_slice(&[2i32, 3, 4]).unwrap();
    a.insert_array(1, b).unwrap();
    assert_eq!(a, [1, 2, 3, 4, 5]);

    let ledger = Rc::new(Ledger::default());
    let mut dst = SlackArr::<Tracked>::new().unwrap();
    let mut src = SlackArr::<Tracked>::new().unwrap();
    for v in 0..5 {
        src.push(Tracked::new(&ledger, v)).unwrap();
    }
    dst.insert_array(0, src).unwrap();
    assert_eq!(values(&dst), [0, 1, 2, 3, 4]);
    assert_eq!(ledger.made.get(), 5);
    assert_eq!(ledger.live(), 5);

    let taken = dst.take();
    assert!(dst.is_empty());
    assert_eq!(dst.capacity(), 0);
    assert_eq!(values(&taken), [0, 1, 2, 3, 4]);
}

#[test]
fn zeroed_and_uninit() {
    let mut arr = from_values(&[1, 2]);
    unsafe {
        assert_eq!(arr.push_zeroed().unwrap(), 2);
        arr.insert_zeroed(1, 2).unwrap();
    }
    assert_eq!(arr, [1, 0, 0, 2, 0]);

    let mut arr = SlackArr::<u16>::with_capacity(4).unwrap();
    let spare = arr.spare_capacity_mut();
    assert_eq!(spare.len(), 4);
    spare[0].write(5);
    spare[1].write(6);
    unsafe { arr.set_len(2) };
    assert_eq!(arr, [5, 6]);

    let mut made = 0;
    arr.resize_with(5, || {
        made += 1;
        return made;
    })
    .unwrap();
    assert_eq!(arr, [5, 6, 1, 2, 3]);
    arr.truncate(1);
    assert_eq!(arr, [5]);
    let idx = arr.emplace(|| 8).unwrap();
    assert_eq!(arr[idx], 8);
}

struct Roomy;

impl SlackPolicy for Roomy {
    const DEFAULT_CAPACITY: usize = 32;
    const SHRINK_SLACK_ELEMENTS: usize = usize::MAX;
}

#[test]
fn custom_policy() {
    let mut arr = SlackArr::<u8, u32, Roomy>::new().unwrap();
    assert_eq!(arr.capacity(), 32);
    for v in 0..33 {
        arr.push(v).unwrap();
    }
    assert_eq!(arr.capacity(), 33 + 12 + 16);
    while arr.len() > 1 {
        arr.pop().unwrap();
    }
    // Slack never exceeds the element floor, so only emptying releases memory.
    assert_eq!(arr.capacity(), 61);
    arr.pop().unwrap();
    assert_eq!(arr.capacity(), 0);
}
