//! End-to-end exercise of the allocator, vector and string toolkit
//!
//! Mirrors realistic usage: arena- and heap-backed containers mixed in
//! one flow, bulk construction, and string building from fragments.

use mallee::{Arena, Array, ContainerError, HeapAllocator, StrBuf, StrView, Vector};

#[test]
pub fn test_vector_workflow() {
    let arena = Arena::with_capacity(1024 * 1024).unwrap();

    let mut v: Array<i32> = Array::new();
    for x in [42, 37, 12, 11] {
        v.push(&arena, x).unwrap();
    }

    assert_eq!(v.pop(), Some(11));

    v.insert(&arena, 2, 69).unwrap();
    assert_eq!(v.get(2), Some(69));

    let heap = HeapAllocator::new();
    let mut v2 = Array::from_slice(&heap, &[0i32, 1, 2, 3]).unwrap();
    assert_eq!(v2.get(1), Some(1));

    let mut raw = Vector::from_bytes(&arena, &[], 4).unwrap();
    for item in v.iter().chain(v2.iter()) {
        raw.push_value(&arena, item).unwrap();
    }
    assert_eq!(raw.len(), 8);
    assert_eq!(raw.get_value::<i32>(5), Some(1));

    v2.free(&heap);
}

#[test]
pub fn test_erased_append_across_sources() {
    let heap = HeapAllocator::new();
    let arena = Arena::with_capacity(4096).unwrap();

    let mut dest = Vector::new(8);
    for x in [1u64, 2, 3] {
        dest.push_value(&arena, x).unwrap();
    }
    let mut src = Vector::from_bytes(&heap, &4u64.to_ne_bytes(), 8).unwrap();
    dest.append(&arena, &src).unwrap();
    assert_eq!(dest.len(), 4);
    assert_eq!(dest.get_value::<u64>(3), Some(4));

    let mut narrow = Vector::new(4);
    narrow.push_value(&heap, 9u32).unwrap();
    assert_eq!(
        dest.append(&arena, &narrow),
        Err(ContainerError::StrideMismatch { dest: 8, src: 4 })
    );
    assert_eq!(dest.len(), 4);

    src.free(&heap);
    narrow.free(&heap);
}

#[test]
pub fn test_string_workflow() {
    let arena = Arena::with_capacity(1024 * 1024).unwrap();

    let sv1 = StrView::from_str("hello world");
    let sv2 = StrView::from_str("hello");
    let sv3 = StrView::from_str("world");

    assert!(sv1.starts_with(sv2));
    assert!(sv1.ends_with(sv3));
    assert!(!sv1.starts_with(sv3));
    assert!(!sv1.ends_with(sv2));

    let sub = sv1.substring(6, 11).unwrap();
    assert!(sub.ends_with(StrView::from_str("world")));

    let mut sb = StrBuf::new();
    sb.append_str(&arena, "Hello").unwrap();
    sb.append_str(&arena, ", ").unwrap();
    sb.append_str(&arena, "World").unwrap();
    sb.append_view(&arena, StrView::from_str("!")).unwrap();

    let built = sb.view();
    assert_eq!(built.len(), "Hello, World!".len());
    assert!(built.contains(StrView::from_str("Hello")));
    assert!(built.contains(StrView::from_str("World")));
    assert_eq!(built.find(StrView::from_str("Hello")), Some(0));

    let heap = HeapAllocator::new();
    let mut sbs = StrBuf::new();
    sbs.append_view(&heap, built.substring(0, 5).unwrap())
        .unwrap();
    let mut finished = sbs.build(&heap).unwrap();
    assert_eq!(finished.as_bytes(), b"Hello\0");
    assert_eq!(StrView::from_terminated(finished.as_bytes()).as_bytes(), b"Hello");
    finished.free(&heap);
}

#[test]
pub fn test_split_into_arena_backed_parts() {
    let arena = Arena::with_capacity(4096).unwrap();
    let line = StrView::from_str("  name,size,,offset \n");
    let trimmed = line.trim();

    let mut fields = Array::new();
    trimmed.split(b',', &arena, &mut fields).unwrap();

    let collected: Vec<&[u8]> = fields.iter().map(|f| f.as_bytes()).collect();
    assert_eq!(
        collected,
        vec![&b"name"[..], &b"size"[..], &b""[..], &b"offset"[..]]
    );
}

#[test]
pub fn test_arena_reset_between_batches() {
    let mut arena = Arena::with_capacity(512).unwrap();

    for batch in 0..4u32 {
        let mut v: Array<u32> = Array::new();
        for i in 0..16 {
            v.push(&arena, batch * 100 + i).unwrap();
        }
        assert_eq!(v.get(15), Some(batch * 100 + 15));
        drop(v);
        // reclaim the whole batch at once; v's buffers become garbage
        arena.reset();
        assert_eq!(arena.used(), 0);
    }
}
