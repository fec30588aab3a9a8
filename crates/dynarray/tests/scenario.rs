use dynarray::{dynarray, DynamicArray, Error};

#[test]
fn reserve_then_resize_walkthrough() {
    let mut array = dynarray![1, 2, 3, 4, 5];
    assert_eq!(array.len(), 5);
    assert_eq!(array.capacity(), 5);

    array.reserve(10);
    assert_eq!(array.capacity(), 10);
    assert_eq!(array.len(), 5);
    assert!(array.iter().copied().eq([1, 2, 3, 4, 5]));

    array.resize(11);
    assert_eq!(array.len(), 11);
    assert!(array.capacity() >= 11);
    assert_eq!(array[..5], [1, 2, 3, 4, 5]);
    assert!(array[5..].iter().all(|&x| x == 0));
}

#[test]
fn reserved_room_absorbs_pushes() {
    let mut array = dynarray![1, 2, 3, 4, 5];
    array.reserve(10);
    let ptr = array.as_ptr();
    for i in 6..=10 {
        array.push(i);
        assert_eq!(array.as_ptr(), ptr);
    }
    assert_eq!(array.capacity(), 10);

    array.push(11);
    assert_eq!(array.capacity(), 15);
}

#[test]
fn resize_shrinks_length_not_capacity() {
    let mut array = dynarray![1, 2, 3, 4, 5];
    array.resize(2);
    assert_eq!(array, [1, 2]);
    assert!(array.capacity() >= 5);

    array.resize(7);
    assert_eq!(array.len(), 7);
    assert!(array.capacity() >= 7);
    assert_eq!(array[..2], [1, 2]);
}

#[test]
fn take_drains_source() {
    let mut source = dynarray![String::from("x"), String::from("y"), String::from("z")];
    let moved = source.take();
    assert_eq!(moved.len(), 3);
    assert_eq!(moved, ["x", "y", "z"]);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);

    source.resize_with_value(2, String::from("again"));
    assert_eq!(source, ["again", "again"]);
}

#[test]
fn checked_access_reports_errors() {
    let mut array: DynamicArray<i32> = dynarray![4, 5, 6];
    for (i, expected) in [4, 5, 6].iter().enumerate() {
        assert_eq!(array.at(i), Ok(expected));
    }
    assert_eq!(array.at(3usize), Err(Error::OutOfRange { index: 3, len: 3 }));
    assert_eq!(array.at(100usize), Err(Error::OutOfRange { index: 100, len: 3 }));

    while array.pop().is_ok() {}
    assert_eq!(array.pop(), Err(Error::EmptyContainer));
    assert_eq!(array.capacity(), 3);

    let err: Box<dyn std::error::Error> = Box::new(Error::EmptyContainer);
    assert_eq!(err.to_string(), "container is empty");
}

#[test]
fn composes_with_iterator_adapters() {
    let mut array: DynamicArray<i32> = (1..=6).collect();
    array.sort_by(|a, b| b.cmp(a));
    let evens: DynamicArray<i32> = array.iter().copied().filter(|x| x % 2 == 0).collect();
    assert_eq!(evens, [6, 4, 2]);
    assert_eq!(array.iter().rev().take(2).sum::<i32>(), 3);
    assert_eq!(array.into_iter().max(), Some(6));
}
