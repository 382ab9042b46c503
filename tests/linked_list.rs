use listd::linked_list::{End, LinkedList};
use listd::value::RedisValue;

fn v(s: &str) -> RedisValue {
    RedisValue::from_bytes(s.as_bytes())
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-operation scenarios (beyond the inline per-operation unit tests)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn push_insert_delete_then_iterate_preserves_order() {
    let mut l = LinkedList::new();
    let b = l.push(v("b"), End::Tail);
    l.insert_adjacent(b, v("a"), false);
    l.insert_adjacent(b, v("c"), true);
    let d = l.push(v("d"), End::Tail);
    l.delete_node(d);

    let collected: Vec<_> = l.iter().cloned().collect();
    assert_eq!(collected, vec![v("a"), v("b"), v("c")]);
}

#[test]
fn rotate_then_index_both_directions_stays_consistent() {
    let mut l = LinkedList::new();
    for c in "abcd".chars() {
        l.push(v(&c.to_string()), End::Tail);
    }
    l.rotate();
    l.rotate();
    let from_head: Vec<_> = (0..l.len() as isize).map(|i| l.get(l.index(i).unwrap()).clone()).collect();
    let from_tail: Vec<_> = (0..l.len() as isize)
        .map(|i| l.get(l.index(i - l.len() as isize).unwrap()).clone())
        .collect();
    assert_eq!(from_head, from_tail);
    assert_eq!(from_head, vec![v("c"), v("d"), v("a"), v("b")]);
}

#[test]
fn find_steps_by_skip_and_respects_direction() {
    let mut l = LinkedList::new();
    for c in "aXaXa".chars() {
        l.push(v(&c.to_string()), End::Tail);
    }
    let start = l.head_ref().unwrap();
    // skip=1 means compare every other node; searching for "a" from the
    // head should land on index 0 immediately.
    let found = l.find(start, &v("a"), End::Tail, 1).unwrap();
    assert_eq!(l.get(found), &v("a"));
}

#[test]
fn duplicate_shares_no_state_with_the_original() {
    let mut l = LinkedList::new();
    l.push(v("shared"), End::Tail);
    let dup = l.duplicate();
    // Three live handles: the node in `l`, the node in `dup` (from
    // `duplicate`'s `Rc::clone`), and this freshly cloned one.
    let original_val = l.get(l.head_ref().unwrap()).clone();
    assert_eq!(original_val.strong_count(), 3);

    l.pop(End::Head);
    assert_eq!(l.len(), 0);
    assert_eq!(dup.len(), 1);
}
