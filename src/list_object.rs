//! Representation-polymorphic list facade.
//!
//! A `ListObject` is a discriminated union of the two backing
//! representations (`listpack::Listpack` for small lists, `linked_list::LinkedList`
//! once a list outgrows the thresholds in [`ListConfig`]). Every public
//! operation dispatches on the active representation; mutations that grow
//! the list first consult [`ListObject::maybe_convert`].
//!
//! The iterator returned by [`ListObject::iter_from`] borrows the active
//! representation directly (`&mut Listpack` or `&mut LinkedList`, not the
//! `ListObject` enum), so the representation-changed-mid-iteration case the
//! spec it's built against calls out as something to forbid is instead a
//! borrow-checker error here: nothing holding that iterator can call back
//! into `ListObject::push` and trigger a conversion, because doing so would
//! require a second mutable borrow of the same data.

use crate::config::ListConfig;
use crate::linked_list::{self, LinkedList, NodeRef};
use crate::listpack::{self, Listpack};
use crate::value::RedisValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

impl From<End> for listpack::End {
    fn from(e: End) -> Self {
        match e {
            End::Head => listpack::End::Head,
            End::Tail => listpack::End::Tail,
        }
    }
}

impl From<End> for linked_list::End {
    fn from(e: End) -> Self {
        match e {
            End::Head => linked_list::End::Head,
            End::Tail => linked_list::End::Tail,
        }
    }
}

pub enum ListObject {
    Listpack(Listpack),
    NodeList(LinkedList),
}

impl Default for ListObject {
    fn default() -> Self {
        ListObject::new()
    }
}

impl ListObject {
    pub fn new() -> Self {
        ListObject::Listpack(Listpack::new())
    }

    pub fn len(&mut self) -> usize {
        match self {
            ListObject::Listpack(lp) => lp.length(),
            ListObject::NodeList(nl) => nl.len(),
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn maybe_convert(&mut self, incoming_len: usize, config: &ListConfig) {
        let should_convert = match self {
            ListObject::Listpack(lp) => {
                incoming_len > config.string_size_threshold || lp.length() >= config.entry_count_threshold
            }
            ListObject::NodeList(_) => false,
        };
        if should_convert {
            self.convert_to_node_form();
        }
    }

    /// Materialize every listpack entry into a fresh node list and swap the
    /// representation. No-op if already in node form.
    fn convert_to_node_form(&mut self) {
        let lp = match self {
            ListObject::Listpack(lp) => lp,
            ListObject::NodeList(_) => return,
        };
        let mut nl = LinkedList::new();
        let mut pos = lp.first_position();
        loop {
            if lp.is_terminator(pos) {
                break;
            }
            nl.push(RedisValue::from_data(lp.get(pos)), linked_list::End::Tail);
            match lp.next(pos) {
                Some(p) => pos = p,
                None => break,
            }
        }
        *self = ListObject::NodeList(nl);
    }

    pub fn push(&mut self, bytes: &[u8], where_: End, config: &ListConfig) {
        self.maybe_convert(bytes.len(), config);
        match self {
            ListObject::Listpack(lp) => {
                lp.push(bytes, where_.into());
            }
            ListObject::NodeList(nl) => {
                nl.push(RedisValue::from_bytes(bytes), where_.into());
            }
        }
    }

    pub fn pop(&mut self, where_: End) -> Option<RedisValue> {
        match self {
            ListObject::Listpack(lp) => {
                let idx = match where_ {
                    End::Head => 0,
                    End::Tail => -1,
                };
                let pos = lp.index(idx)?;
                let data = lp.get(pos);
                lp.delete_range(pos, 1);
                Some(RedisValue::from_data(data))
            }
            ListObject::NodeList(nl) => nl.pop(where_.into()),
        }
    }

    pub fn get_at(&mut self, i: isize) -> Option<RedisValue> {
        match self {
            ListObject::Listpack(lp) => lp.index(i).map(|p| RedisValue::from_data(lp.get(p))),
            ListObject::NodeList(nl) => nl.index(i).map(|n| nl.get(n).clone()),
        }
    }

    /// Replace the element at `i`. Neither representation exposes an
    /// in-place value-replace primitive (only insert/delete), so this is
    /// modeled as delete-then-insert-at-the-same-position, the facade-level
    /// composition of the two primitives the representations do expose.
    /// Returns `false` if `i` is out of range.
    pub fn set_at(&mut self, i: isize, bytes: &[u8]) -> bool {
        match self {
            ListObject::Listpack(lp) => match lp.index(i) {
                Some(pos) => {
                    lp.delete_range(pos, 1);
                    lp.insert_before(pos, bytes);
                    true
                }
                None => false,
            },
            ListObject::NodeList(nl) => match nl.index(i) {
                Some(node) => {
                    let succ = nl.next_ref(node);
                    nl.delete_node(node);
                    let value = RedisValue::from_bytes(bytes);
                    match succ {
                        Some(s) => {
                            nl.insert_adjacent(s, value, false);
                        }
                        None => {
                            nl.push(value, linked_list::End::Tail);
                        }
                    }
                    true
                }
                None => false,
            },
        }
    }

    /// Inclusive absolute-index range `[lo, hi]`. Caller (the command layer)
    /// is responsible for resolving negative indices and clamping to bounds.
    pub fn range(&mut self, lo: usize, hi: usize) -> Vec<RedisValue> {
        if lo > hi {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(hi - lo + 1);
        match self {
            ListObject::Listpack(lp) => {
                let mut pos = lp.index(lo as isize);
                for _ in lo..=hi {
                    match pos {
                        Some(p) => {
                            out.push(RedisValue::from_data(lp.get(p)));
                            pos = lp.next(p);
                        }
                        None => break,
                    }
                }
            }
            ListObject::NodeList(nl) => {
                let mut node = nl.index(lo as isize);
                for _ in lo..=hi {
                    match node {
                        Some(n) => {
                            out.push(nl.get(n).clone());
                            node = nl.next_ref(n);
                        }
                        None => break,
                    }
                }
            }
        }
        out
    }

    /// Delete `count` elements starting at absolute index `start_idx`.
    fn delete_range_abs(&mut self, start_idx: usize, count: usize) {
        if count == 0 {
            return;
        }
        match self {
            ListObject::Listpack(lp) => {
                if let Some(pos) = lp.index(start_idx as isize) {
                    lp.delete_range(pos, count);
                }
            }
            ListObject::NodeList(nl) => {
                if let Some(mut node) = nl.index(start_idx as isize) {
                    for _ in 0..count {
                        let next = nl.next_ref(node);
                        nl.delete_node(node);
                        match next {
                            Some(n) => node = n,
                            None => break,
                        }
                    }
                }
            }
        }
    }

    /// Keep only the inclusive absolute-index range `[lo, hi]`.
    pub fn trim(&mut self, lo: usize, hi: usize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        if hi + 1 < len {
            self.delete_range_abs(hi + 1, len - (hi + 1));
        }
        if lo > 0 {
            self.delete_range_abs(0, lo.min(len));
        }
    }

    /// LINSERT: find the first entry equal to `pivot` scanning head to tail,
    /// insert `value` before or after it. Returns `false` if no match.
    pub fn insert_pivot(&mut self, pivot: &[u8], value: &[u8], after: bool) -> bool {
        let mut it = match self.iter_from(0, End::Tail) {
            Some(it) => it,
            None => return false,
        };
        loop {
            if it.equal(pivot) {
                it.insert_adjacent(value, after);
                return true;
            }
            if !it.advance() {
                return false;
            }
        }
    }

    /// LREM: `count > 0` removes up to `count` matches scanning head to
    /// tail; `count < 0` scans tail to head; `count == 0` removes every
    /// match. Returns the number of elements removed.
    pub fn rem(&mut self, count: isize, value: &[u8]) -> usize {
        let (dir, start_idx, limit) = if count > 0 {
            (End::Tail, 0isize, count as usize)
        } else if count < 0 {
            (End::Head, -1isize, (-count) as usize)
        } else {
            (End::Tail, 0isize, usize::MAX)
        };
        let mut it = match self.iter_from(start_idx, dir) {
            Some(it) => it,
            None => return 0,
        };
        let mut removed = 0usize;
        loop {
            if it.equal(value) {
                if it.delete().is_none() {
                    break;
                }
                removed += 1;
                if removed >= limit || !it.has_current() {
                    break;
                }
                continue;
            }
            if !it.advance() {
                break;
            }
        }
        removed
    }

    /// Borrow an iterator starting at absolute/negative index `index`,
    /// advancing toward `dir` on each [`ListIter::advance`]. `None` if the
    /// index is out of range.
    pub fn iter_from(&mut self, index: isize, dir: End) -> Option<ListIter<'_>> {
        match self {
            ListObject::Listpack(lp) => {
                let pos = lp.index(index)?;
                Some(ListIter::Listpack { lp, pos: Some(pos), dir })
            }
            ListObject::NodeList(nl) => {
                let node = nl.index(index)?;
                Some(ListIter::Node { nl, pos: Some(node), dir })
            }
        }
    }
}

/// A cursor over one representation, yielded by [`ListObject::iter_from`].
pub enum ListIter<'a> {
    Listpack {
        lp: &'a mut Listpack,
        pos: Option<usize>,
        dir: End,
    },
    Node {
        nl: &'a mut LinkedList,
        pos: Option<NodeRef>,
        dir: End,
    },
}

impl<'a> ListIter<'a> {
    pub fn has_current(&self) -> bool {
        match self {
            ListIter::Listpack { pos, .. } => pos.is_some(),
            ListIter::Node { pos, .. } => pos.is_some(),
        }
    }

    pub fn get(&self) -> Option<RedisValue> {
        match self {
            ListIter::Listpack { lp, pos, .. } => pos.map(|p| RedisValue::from_data(lp.get(p))),
            ListIter::Node { nl, pos, .. } => pos.map(|n| nl.get(n).clone()),
        }
    }

    pub fn equal(&self, bytes: &[u8]) -> bool {
        match self {
            ListIter::Listpack { lp, pos, .. } => pos.is_some_and(|p| lp.compare(p, bytes)),
            ListIter::Node { nl, pos, .. } => pos.is_some_and(|n| *nl.get(n) == RedisValue::from_bytes(bytes)),
        }
    }

    /// Advance in the iterator's configured direction. Returns `false` once
    /// exhausted.
    pub fn advance(&mut self) -> bool {
        match self {
            ListIter::Listpack { lp, pos, dir } => {
                *pos = pos.and_then(|p| match dir {
                    End::Tail => lp.next(p),
                    End::Head => lp.prev(p),
                });
                pos.is_some()
            }
            ListIter::Node { nl, pos, dir } => {
                *pos = pos.and_then(|n| match dir {
                    End::Tail => nl.next_ref(n),
                    End::Head => nl.prev_ref(n),
                });
                pos.is_some()
            }
        }
    }

    /// Insert `bytes` adjacent to the current element. Does not move the
    /// cursor.
    pub fn insert_adjacent(&mut self, bytes: &[u8], after: bool) {
        match self {
            ListIter::Listpack { lp, pos, .. } => {
                if let Some(p) = pos {
                    if after {
                        let succ = lp.next(*p);
                        match succ {
                            Some(s) => {
                                lp.insert_before(s, bytes);
                            }
                            None => {
                                lp.push(bytes, listpack::End::Tail);
                            }
                        }
                    } else {
                        lp.insert_before(*p, bytes);
                    }
                }
            }
            ListIter::Node { nl, pos, .. } => {
                if let Some(n) = pos {
                    nl.insert_adjacent(*n, RedisValue::from_bytes(bytes), after);
                }
            }
        }
    }

    /// Delete the current element, auto-advancing to the logical next
    /// element in the iterator's direction. Returns the removed value, or
    /// `None` if the iterator was already exhausted.
    pub fn delete(&mut self) -> Option<RedisValue> {
        match self {
            ListIter::Listpack { lp, pos, dir } => {
                let p = (*pos)?;
                let predecessor = lp.prev(p);
                let value = RedisValue::from_data(lp.get(p));
                lp.delete_range(p, 1);
                *pos = match dir {
                    End::Tail => {
                        if lp.is_terminator(p) {
                            None
                        } else {
                            Some(p)
                        }
                    }
                    End::Head => predecessor,
                };
                Some(value)
            }
            ListIter::Node { nl, pos, dir } => {
                let n = (*pos)?;
                let next_n = nl.next_ref(n);
                let prev_n = nl.prev_ref(n);
                let value = nl.delete_node(n);
                *pos = match dir {
                    End::Tail => next_n,
                    End::Head => prev_n,
                };
                Some(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ListConfig {
        ListConfig::default()
    }

    fn small_cfg() -> ListConfig {
        ListConfig {
            string_size_threshold: 8,
            entry_count_threshold: 4,
        }
    }

    #[test]
    fn push_pop_roundtrip_stays_listpack() {
        let mut lo = ListObject::new();
        lo.push(b"a", End::Tail, &cfg());
        lo.push(b"b", End::Tail, &cfg());
        assert!(matches!(lo, ListObject::Listpack(_)));
        assert_eq!(lo.len(), 2);
        assert_eq!(lo.pop(End::Head), Some(RedisValue::from_bytes(b"a")));
        assert_eq!(lo.pop(End::Tail), Some(RedisValue::from_bytes(b"b")));
        assert_eq!(lo.pop(End::Tail), None);
    }

    #[test]
    fn oversized_value_converts_to_node_form() {
        let mut lo = ListObject::new();
        lo.push(&[b'x'; 100], End::Tail, &small_cfg());
        assert!(matches!(lo, ListObject::NodeList(_)));
        assert_eq!(lo.len(), 1);
    }

    #[test]
    fn entry_count_threshold_converts_to_node_form() {
        let mut lo = ListObject::new();
        let cfg = small_cfg();
        for _ in 0..5 {
            lo.push(b"x", End::Tail, &cfg);
        }
        assert!(matches!(lo, ListObject::NodeList(_)));
        assert_eq!(lo.len(), 5);
    }

    #[test]
    fn set_at_replaces_in_place_index() {
        let mut lo = ListObject::new();
        for c in "abc".bytes() {
            lo.push(&[c], End::Tail, &cfg());
        }
        assert!(lo.set_at(1, b"Z"));
        assert_eq!(lo.range(0, 2), vec![
            RedisValue::from_bytes(b"a"),
            RedisValue::from_bytes(b"Z"),
            RedisValue::from_bytes(b"c"),
        ]);
        assert!(!lo.set_at(10, b"nope"));
    }

    #[test]
    fn trim_keeps_inclusive_range() {
        let mut lo = ListObject::new();
        for c in "abcdef".bytes() {
            lo.push(&[c], End::Tail, &cfg());
        }
        lo.trim(1, 3);
        assert_eq!(
            { let n = lo.len(); lo.range(0, n - 1) },
            vec![
                RedisValue::from_bytes(b"b"),
                RedisValue::from_bytes(b"c"),
                RedisValue::from_bytes(b"d"),
            ]
        );
    }

    #[test]
    fn insert_pivot_before_and_after() {
        let mut lo = ListObject::new();
        lo.push(b"a", End::Tail, &cfg());
        lo.push(b"c", End::Tail, &cfg());
        assert!(lo.insert_pivot(b"c", b"b", false));
        assert!(lo.insert_pivot(b"c", b"d", true));
        assert_eq!(
            { let n = lo.len(); lo.range(0, n - 1) },
            vec![
                RedisValue::from_bytes(b"a"),
                RedisValue::from_bytes(b"b"),
                RedisValue::from_bytes(b"c"),
                RedisValue::from_bytes(b"d"),
            ]
        );
        assert!(!lo.insert_pivot(b"missing", b"x", true));
    }

    #[test]
    fn rem_negative_count_scans_from_tail() {
        let mut lo = ListObject::new();
        for c in "abacad".bytes() {
            lo.push(&[c], End::Tail, &cfg());
        }
        // [a,b,a,c,a,d], remove last 2 'a's tail->head.
        let removed = lo.rem(-2, b"a");
        assert_eq!(removed, 2);
        assert_eq!(
            { let n = lo.len(); lo.range(0, n - 1) },
            vec![
                RedisValue::from_bytes(b"a"),
                RedisValue::from_bytes(b"b"),
                RedisValue::from_bytes(b"c"),
                RedisValue::from_bytes(b"d"),
            ]
        );
    }

    #[test]
    fn rem_zero_count_removes_all_matches() {
        let mut lo = ListObject::new();
        for c in "axaxax".bytes() {
            lo.push(&[c], End::Tail, &cfg());
        }
        let removed = lo.rem(0, b"x");
        assert_eq!(removed, 3);
        assert_eq!(lo.len(), 3);
    }

    #[test]
    fn node_form_supports_the_same_operations() {
        let mut lo = ListObject::new();
        let cfg = small_cfg();
        for c in "abcdef".bytes() {
            lo.push(&[c], End::Tail, &cfg);
        }
        assert!(matches!(lo, ListObject::NodeList(_)));
        lo.trim(1, 3);
        assert_eq!(lo.len(), 3);
        assert!(lo.insert_pivot(b"c", b"X", true));
        assert_eq!(lo.get_at(0), Some(RedisValue::from_bytes(b"b")));
    }
}
