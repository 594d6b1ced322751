use std::cell::Cell;
use std::rc::Rc;

use crate::{ErrorKind, SimpleVector, reserve, simple_vector};

/// Element that counts how many of its instances are alive.
#[derive(Debug)]
struct Tracked {
    value: i32,
    live: Rc<Cell<isize>>,
}

impl Tracked {
    fn new(value: i32, live: &Rc<Cell<isize>>) -> Tracked {
        live.set(live.get() + 1);
        Tracked {
            value,
            live: live.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(self.value, &self.live)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[test]
fn test_default_is_empty() {
    let v = SimpleVector::<i32>::new();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 0);
    assert!(v.is_empty());
    assert!(v.as_ptr().is_null());
    assert_eq!(v, SimpleVector::default());
}

#[test]
fn test_reserve_constructor() {
    let v = SimpleVector::<i32>::with_reserve(reserve(5)).unwrap();
    assert_eq!(v.capacity(), 5);
    assert!(v.is_empty());

    let v = SimpleVector::<i32>::try_from(reserve(0)).unwrap();
    assert_eq!(v.capacity(), 0);
    assert!(v.as_ptr().is_null());
}

#[test]
fn test_sized_constructor() {
    let v = SimpleVector::<i32>::with_size(5).unwrap();
    assert_eq!(v.len(), 5);
    assert_eq!(v.capacity(), 5);
    assert!(v.iter().all(|&x| x == 0));

    let v = SimpleVector::<i32>::with_size(0).unwrap();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);
}

#[test]
fn test_sized_constructor_defaults_each_element() {
    // Each slot gets its own default value; mutating one must not affect the others.
    let mut v = SimpleVector::<Vec<i32>>::with_size(3).unwrap();
    v[1].push(7);
    assert_eq!(v.as_slice(), &[vec![], vec![7], vec![]]);
}

#[test]
fn test_value_constructor() {
    let v = SimpleVector::from_value(3, &42).unwrap();
    assert_eq!(v.as_slice(), &[42, 42, 42]);
    assert_eq!(v.capacity(), 3);

    let v = SimpleVector::from_value(0, &"x".to_string()).unwrap();
    assert!(v.is_empty());
}

#[test]
fn test_literal_list_constructor() {
    let v = simple_vector![1, 2, 3].unwrap();
    assert_eq!(v.len(), 3);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_slice(), &[1, 2, 3]);

    let v: SimpleVector<i32> = simple_vector![].unwrap();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);

    let v = SimpleVector::from_slice(&["a".to_string(), "b".to_string()]).unwrap();
    assert_eq!(v.as_slice(), &["a", "b"]);

    let v = SimpleVector::try_from([5u8; 4]).unwrap();
    assert_eq!(v.as_slice(), &[5, 5, 5, 5]);
}

#[test]
fn test_push_back_growth() {
    let mut v = SimpleVector::new();
    let mut capacities = Vec::new();
    for i in 0..17 {
        v.push_back(i).unwrap();
        capacities.push(v.capacity());
    }
    assert_eq!(
        capacities,
        [1, 2, 4, 4, 8, 8, 8, 8, 16, 16, 16, 16, 16, 16, 16, 16, 32]
    );
    for i in 0..17 {
        assert_eq!(v[i], i);
        assert_eq!(*v.at(i).unwrap(), i);
    }
}

#[test]
fn test_push_back_within_capacity_keeps_buffer() {
    let mut v = SimpleVector::with_capacity(4).unwrap();
    let base = v.as_ptr();
    for i in 0..4 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.as_ptr(), base);
    v.push_back(4).unwrap();
    assert_eq!(v.capacity(), 8);
}

#[test]
fn test_reserve_method() {
    let mut v = SimpleVector::new();
    v.reserve(5).unwrap();
    assert_eq!(v.capacity(), 5);
    assert!(v.is_empty());

    v.reserve(1).unwrap();
    assert_eq!(v.capacity(), 5);
    for i in 0..10 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.len(), 10);
    v.reserve(100).unwrap();
    assert_eq!(v.len(), 10);
    assert_eq!(v.capacity(), 100);
    for i in 0..10 {
        assert_eq!(v[i], i);
    }
}

#[test]
fn test_failed_reserve_leaves_vector_unchanged() {
    let mut v = simple_vector![1u64, 2, 3].unwrap();
    let base = v.as_ptr();

    let err = v.reserve(usize::MAX).unwrap_err();
    assert!(err.is_allocation_failure());
    assert_eq!(v.as_slice(), &[1, 2, 3]);
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_ptr(), base);

    let err = v.resize(usize::MAX / 2).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AllocationFailure { .. }));
    assert_eq!(v.as_slice(), &[1, 2, 3]);
    assert_eq!(v.capacity(), 3);
}

#[test]
fn test_failed_construction() {
    let err = SimpleVector::<u32>::with_capacity(usize::MAX).unwrap_err();
    assert!(err.is_allocation_failure());
    assert!(SimpleVector::<u32>::with_reserve(reserve(usize::MAX)).is_err());
    assert!(SimpleVector::<u64>::with_size(usize::MAX).is_err());
}

#[test]
fn test_insert() {
    let mut v = simple_vector![1, 2, 4].unwrap();
    // Full: insertion reallocates.
    assert_eq!(v.insert(2, 3).unwrap(), 2);
    assert_eq!(v.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(v.capacity(), 6);

    // Within capacity: shifts in place.
    let base = v.as_ptr();
    assert_eq!(v.insert(0, 0).unwrap(), 0);
    assert_eq!(v.insert(5, 5).unwrap(), 5);
    assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4, 5]);
    assert_eq!(v.as_ptr(), base);

    let mut e = SimpleVector::new();
    assert_eq!(e.insert(0, 'a').unwrap(), 0);
    assert_eq!(e.capacity(), 1);
    assert_eq!(e.insert(0, 'b').unwrap(), 0);
    assert_eq!(e.as_slice(), &['b', 'a']);
}

#[test]
#[should_panic]
fn test_insert_past_end_panics() {
    let mut v = simple_vector![1].unwrap();
    let _ = v.insert(2, 0);
}

#[test]
fn test_pop_back() {
    let mut v = simple_vector![1, 2].unwrap();
    assert_eq!(v.pop_back(), Some(2));
    assert_eq!(v.pop_back(), Some(1));
    assert_eq!(v.pop_back(), None);
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 2);
}

#[test]
fn test_erase() {
    let mut v = simple_vector![1, 2, 3, 4].unwrap();
    let pos = v.erase(1);
    assert_eq!(pos, 1);
    assert_eq!(v[pos], 3);
    assert_eq!(v.as_slice(), &[1, 3, 4]);

    let pos = v.erase(2);
    assert_eq!(pos, v.len());
    assert_eq!(v.as_slice(), &[1, 3]);
    assert_eq!(v.capacity(), 4);

    assert_eq!(v.remove(0), 1);
    assert_eq!(v.as_slice(), &[3]);
}

#[test]
#[should_panic]
fn test_erase_at_end_panics() {
    let mut v = simple_vector![1, 2].unwrap();
    v.erase(2);
}

#[test]
fn test_insert_then_erase_roundtrip() {
    let original = simple_vector![10, 20, 30, 40].unwrap();
    for p in 0..=original.len() {
        let mut v = original.clone();
        let pos = v.insert(p, 99).unwrap();
        assert_eq!(v[pos], 99);
        v.erase(pos);
        assert_eq!(v, original);
    }
}

#[test]
fn test_resize() {
    let mut v = simple_vector![1, 2, 3].unwrap();
    v.resize(7).unwrap();
    assert_eq!(v.as_slice(), &[1, 2, 3, 0, 0, 0, 0]);
    assert_eq!(v.capacity(), 7);

    v.resize(2).unwrap();
    assert_eq!(v.as_slice(), &[1, 2]);
    assert_eq!(v.capacity(), 7);

    // Growing within capacity exposes fresh default values.
    v.resize(4).unwrap();
    assert_eq!(v.as_slice(), &[1, 2, 0, 0]);
    assert_eq!(v.capacity(), 7);

    // Growing past capacity doubles when that is larger than the request.
    v.resize(8).unwrap();
    assert_eq!(v.capacity(), 14);
    assert_eq!(v.len(), 8);

    let mut e = SimpleVector::<u8>::new();
    e.resize(3).unwrap();
    assert_eq!(e.capacity(), 3);
}

#[test]
fn test_resize_with_value_and_truncate() {
    let mut v = SimpleVector::new();
    v.resize_with_value(3, &"x".to_string()).unwrap();
    assert_eq!(v.as_slice(), &["x", "x", "x"]);
    v.truncate(1);
    assert_eq!(v.len(), 1);
    v.truncate(5);
    assert_eq!(v.len(), 1);

    let mut n = 0;
    v.resize_with(4, || {
        n += 1;
        n.to_string()
    })
    .unwrap();
    assert_eq!(v.as_slice(), &["x", "1", "2", "3"]);
}

#[test]
fn test_clear_keeps_allocation() {
    let mut v = simple_vector![1, 2, 3].unwrap();
    let base = v.as_ptr();
    v.clear();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 3);
    assert_eq!(v.as_ptr(), base);
    v.push_back(9).unwrap();
    assert_eq!(v.as_ptr(), base);
}

#[test]
fn test_at_out_of_range() {
    let mut v = simple_vector![1, 2, 3].unwrap();
    assert!(v.at(2).is_ok());
    let err = v.at(3).unwrap_err();
    assert_eq!(err.into_kind(), ErrorKind::OutOfRange { index: 3, size: 3 });
    assert!(v.at(usize::MAX).unwrap_err().is_out_of_range());

    *v.at_mut(0).unwrap() = 100;
    assert_eq!(v[0], 100);
    assert!(v.at_mut(3).is_err());

    let e = SimpleVector::<i32>::new();
    assert!(e.at(0).is_err());
}

#[test]
#[should_panic]
fn test_index_out_of_range_panics() {
    let v = simple_vector![1, 2, 3].unwrap();
    let _ = v[3];
}

#[test]
fn test_get_unchecked() {
    let mut v = simple_vector![1, 2, 3].unwrap();
    unsafe {
        assert_eq!(*v.get_unchecked(1), 2);
        *v.get_unchecked_mut(1) = 20;
    }
    assert_eq!(v[1], 20);
}

#[test]
fn test_clone_is_deep() {
    let mut original = SimpleVector::with_capacity(10).unwrap();
    original.push_back("a".to_string()).unwrap();
    original.push_back("b".to_string()).unwrap();

    let mut copy = original.clone();
    assert_eq!(copy, original);
    assert_eq!(copy.capacity(), 2);
    assert_ne!(copy.as_ptr(), original.as_ptr());

    copy[0].push('!');
    copy.push_back("c".to_string()).unwrap();
    assert_eq!(original.as_slice(), &["a", "b"]);
    assert_eq!(copy.as_slice(), &["a!", "b", "c"]);
}

#[test]
fn test_take_moves_everything() {
    let mut src = SimpleVector::with_capacity(8).unwrap();
    for i in 0..5 {
        src.push_back(i).unwrap();
    }
    let base = src.as_ptr();

    let dst = src.take();
    assert_eq!(src.len(), 0);
    assert_eq!(src.capacity(), 0);
    assert!(src.as_ptr().is_null());
    assert_eq!(dst.as_slice(), &[0, 1, 2, 3, 4]);
    assert_eq!(dst.capacity(), 8);
    assert_eq!(dst.as_ptr(), base);
}

#[test]
fn test_assign() {
    let mut a = simple_vector![1, 2, 3, 4, 5].unwrap();
    let b = simple_vector![7, 8].unwrap();
    a.assign(&b).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.capacity(), 2);

    // Assigning from an empty vector drops the allocation.
    let empty = SimpleVector::new();
    a.assign(&empty).unwrap();
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 0);

    let mut c = SimpleVector::new();
    c.clone_from(&b);
    assert_eq!(c, b);
}

#[test]
fn test_assign_move() {
    let mut a = simple_vector![1, 2].unwrap();
    let mut b = simple_vector![3, 4, 5].unwrap();
    a.assign_move(&mut b);
    assert_eq!(a.as_slice(), &[3, 4, 5]);
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 0);
}

#[test]
fn test_swap() {
    let mut a = simple_vector![1, 2, 3].unwrap();
    let mut b = SimpleVector::with_capacity(10).unwrap();
    b.push_back(9).unwrap();
    let (pa, pb) = (a.as_ptr(), b.as_ptr());

    a.swap(&mut b);
    assert_eq!(a.as_slice(), &[9]);
    assert_eq!(a.capacity(), 10);
    assert_eq!(a.as_ptr(), pb);
    assert_eq!(b.as_slice(), &[1, 2, 3]);
    assert_eq!(b.capacity(), 3);
    assert_eq!(b.as_ptr(), pa);
}

#[test]
fn test_comparisons() {
    let a = simple_vector![1, 2].unwrap();
    let b = simple_vector![1, 2, 3].unwrap();
    let c = simple_vector![1, 3].unwrap();

    assert!(a < b);
    assert!(b < c);
    assert!(a < c);
    assert!(a <= a.clone());
    assert!(c > b);
    assert!(c >= b);
    assert!(a != b);
    assert_eq!(a, simple_vector![1, 2].unwrap());

    // Capacity does not take part in equality.
    let mut d = SimpleVector::with_capacity(50).unwrap();
    d.push_back(1).unwrap();
    d.push_back(2).unwrap();
    assert_eq!(a, d);
}

#[test]
fn test_iterators() {
    let mut v = simple_vector![1, 2, 3].unwrap();
    assert_eq!(v.iter().sum::<i32>(), 6);
    for x in &mut v {
        *x *= 10;
    }
    let collected: Vec<i32> = (&v).into_iter().copied().collect();
    assert_eq!(collected, [10, 20, 30]);

    // The view can be restarted any number of times.
    assert_eq!(v.iter().count(), 3);
    assert_eq!(v.iter().count(), 3);

    let e = SimpleVector::<i32>::new();
    assert_eq!(e.iter().next(), None);
}

#[test]
fn test_into_iter_by_value() {
    let v = simple_vector!["a".to_string(), "b".to_string(), "c".to_string()].unwrap();
    let mut it = v.into_iter();
    assert_eq!(it.len(), 3);
    assert_eq!(it.next().as_deref(), Some("a"));
    assert_eq!(it.next_back().as_deref(), Some("c"));
    assert_eq!(it.as_slice(), &["b"]);
    assert_eq!(it.next().as_deref(), Some("b"));
    assert_eq!(it.next(), None);
    assert_eq!(it.next_back(), None);
}

#[test]
fn test_extend_and_collect() {
    let mut v: SimpleVector<i32> = (0..5).collect();
    assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
    assert_eq!(v.capacity(), 8);
    v.extend([5, 6]);
    assert_eq!(v.len(), 7);
}

#[test]
fn test_debug_format() {
    let v = simple_vector![1, 2].unwrap();
    let s = format!("{v:?}");
    assert_eq!(s, "SimpleVector { values: [1, 2], size: 2, capacity: 2 }");
}

#[test]
fn test_zero_sized_elements() {
    let mut v = SimpleVector::new();
    for _ in 0..100 {
        v.push_back(()).unwrap();
    }
    assert_eq!(v.len(), 100);
    assert_eq!(v.capacity(), 128);
    v.erase(50);
    assert_eq!(v.len(), 99);
    v.clear();
    assert!(v.is_empty());
}

#[test]
fn test_every_element_dropped_once() {
    let live = Rc::new(Cell::new(0));
    {
        let mut v = SimpleVector::new();
        for i in 0..10 {
            v.push_back(Tracked::new(i, &live)).unwrap();
        }
        assert_eq!(live.get(), 10);

        v.insert(3, Tracked::new(100, &live)).unwrap();
        v.erase(0);
        assert_eq!(live.get(), 10);

        drop(v.pop_back());
        assert_eq!(live.get(), 9);

        v.truncate(5);
        assert_eq!(live.get(), 5);

        v.resize_with(12, || Tracked::new(-1, &live)).unwrap();
        assert_eq!(live.get(), 12);

        let copy = v.clone();
        assert_eq!(live.get(), 24);
        drop(copy);
        assert_eq!(live.get(), 12);

        let mut other = SimpleVector::from_value(2, &Tracked::new(7, &live)).unwrap();
        // The temporary passed by reference is already gone.
        assert_eq!(live.get(), 14);
        other.assign(&v).unwrap();
        assert_eq!(live.get(), 24);

        let mut it = other.into_iter();
        drop(it.next());
        drop(it);
        assert_eq!(live.get(), 12);

        v.clear();
        assert_eq!(live.get(), 0);
        v.push_back(Tracked::new(1, &live)).unwrap();
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn test_panicking_default_keeps_constructed_elements() {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let live = Rc::new(Cell::new(0));
    let mut v = SimpleVector::new();
    v.push_back(Tracked::new(0, &live)).unwrap();

    let mut made = 0;
    let result = catch_unwind(AssertUnwindSafe(|| {
        v.resize_with(5, || {
            if made == 2 {
                panic!("boom");
            }
            made += 1;
            Tracked::new(made, &live)
        })
    }));
    assert!(result.is_err());
    assert_eq!(v.len(), 3);
    assert_eq!(live.get(), 3);
    assert_eq!(v[2].value, 2);
    drop(v);
    assert_eq!(live.get(), 0);
}

#[test]
fn test_hash_matches_slice() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let hash = |x: &dyn Fn(&mut DefaultHasher)| {
        let mut h = DefaultHasher::new();
        x(&mut h);
        h.finish()
    };
    let v = simple_vector![1, 2, 3].unwrap();
    assert_eq!(hash(&|h| v.hash(h)), hash(&|h| [1, 2, 3][..].hash(h)));
}
