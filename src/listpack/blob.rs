//! The listpack blob: header, terminator, and the insert/delete/cascade
//! machinery that keeps the variable-width prev-entry-length chain
//! consistent after every mutation.
//!
//! Layout (little-endian header fields, see module docs in `listpack::mod`):
//! `total-bytes:u32 | tail-offset:u32 | entry-count:u16 | entries... | 0xFF`

use super::encoding::{
    decode_content, decode_prevlen, encode_content_from_bytes, encode_prevlen,
    prevlen_field_size, write_prevlen_fixed_width, TERMINATOR,
};
use crate::value::{parse_strict_i64, ValueData};

pub const HEADER_SIZE: usize = 10;
const COUNT_UNKNOWN: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

/// The packed byte-blob representation of a short list.
#[derive(Debug, Clone)]
pub struct Listpack {
    buf: Vec<u8>,
}

impl Default for Listpack {
    fn default() -> Self {
        Self::new()
    }
}

impl Listpack {
    pub fn new() -> Self {
        let mut buf = vec![0u8; HEADER_SIZE + 1];
        buf[HEADER_SIZE] = TERMINATOR;
        let mut lp = Listpack { buf };
        lp.set_total_bytes((HEADER_SIZE + 1) as u32);
        lp.set_tail_offset(HEADER_SIZE as u32);
        lp.set_entry_count(0);
        lp
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    // ── header accessors ─────────────────────────────────────────────────

    pub fn total_bytes(&self) -> u32 {
        u32::from_le_bytes(self.buf[0..4].try_into().unwrap())
    }
    fn set_total_bytes(&mut self, v: u32) {
        self.buf[0..4].copy_from_slice(&v.to_le_bytes());
    }
    pub fn tail_offset(&self) -> u32 {
        u32::from_le_bytes(self.buf[4..8].try_into().unwrap())
    }
    fn set_tail_offset(&mut self, v: u32) {
        self.buf[4..8].copy_from_slice(&v.to_le_bytes());
    }
    fn entry_count_raw(&self) -> u16 {
        u16::from_le_bytes(self.buf[8..10].try_into().unwrap())
    }
    fn set_entry_count(&mut self, v: u16) {
        self.buf[8..10].copy_from_slice(&v.to_le_bytes());
    }

    fn terminator_position(&self) -> usize {
        self.total_bytes() as usize - 1
    }
    pub fn first_position(&self) -> usize {
        HEADER_SIZE
    }
    fn tail_position(&self) -> usize {
        self.tail_offset() as usize
    }

    pub fn is_terminator(&self, pos: usize) -> bool {
        pos == self.terminator_position()
    }

    fn is_empty(&self) -> bool {
        self.tail_position() == self.terminator_position()
    }

    fn entry_size(&self, pos: usize) -> usize {
        let (_, fs) = decode_prevlen(&self.buf, pos);
        let (_, content_len) = decode_content(&self.buf, pos + fs);
        fs + content_len
    }

    /// Total entry count, rescanning the blob if the header field has
    /// saturated at `0xFFFF`, and writing back the true count if it has
    /// since dropped below the saturation point.
    pub fn length(&mut self) -> usize {
        let raw = self.entry_count_raw();
        if raw != COUNT_UNKNOWN {
            return raw as usize;
        }
        let mut count = 0usize;
        let mut pos = self.first_position();
        while !self.is_terminator(pos) {
            count += 1;
            pos += self.entry_size(pos);
        }
        if count < COUNT_UNKNOWN as usize {
            self.set_entry_count(count as u16);
        }
        count
    }

    fn bump_count(&mut self, delta: i64) {
        let raw = self.entry_count_raw();
        if raw == COUNT_UNKNOWN {
            return;
        }
        let new = raw as i64 + delta;
        self.set_entry_count(if new >= COUNT_UNKNOWN as i64 {
            COUNT_UNKNOWN
        } else {
            new.max(0) as u16
        });
    }

    // ── navigation ────────────────────────────────────────────────────────

    /// Next entry position, or `None` if `pos` is the tail (mirrors "next of
    /// the tail returns null").
    pub fn next(&self, pos: usize) -> Option<usize> {
        if self.is_terminator(pos) {
            return None;
        }
        let np = pos + self.entry_size(pos);
        if np == self.terminator_position() {
            None
        } else {
            Some(np)
        }
    }

    /// Previous entry position. `prev` of the terminator returns the tail.
    pub fn prev(&self, pos: usize) -> Option<usize> {
        if self.is_terminator(pos) {
            if self.is_empty() {
                return None;
            }
            return Some(self.tail_position());
        }
        let (prev_len, _) = decode_prevlen(&self.buf, pos);
        if prev_len == 0 {
            None
        } else {
            Some(pos - prev_len as usize)
        }
    }

    /// Resolve an index (negative counts from the tail, -1 is the tail) to
    /// an entry position.
    pub fn index(&self, i: isize) -> Option<usize> {
        if i >= 0 {
            let mut pos = self.first_position();
            for _ in 0..i {
                if self.is_terminator(pos) {
                    return None;
                }
                pos += self.entry_size(pos);
            }
            if self.is_terminator(pos) {
                None
            } else {
                Some(pos)
            }
        } else {
            if self.is_empty() {
                return None;
            }
            let mut pos = self.tail_position();
            let steps = (-i - 1) as usize;
            for _ in 0..steps {
                match self.prev(pos) {
                    Some(p) => pos = p,
                    None => return None,
                }
            }
            Some(pos)
        }
    }

    pub fn get(&self, pos: usize) -> ValueData {
        let (_, fs) = decode_prevlen(&self.buf, pos);
        decode_content(&self.buf, pos + fs).0
    }

    /// Compare the entry at `pos` against raw bytes, never comparing
    /// encoding-to-encoding: strings use length+memcmp, integers re-parse
    /// `bytes` and compare numerically.
    pub fn compare(&self, pos: usize, bytes: &[u8]) -> bool {
        match self.get(pos) {
            ValueData::Bytes(b) => b == bytes,
            ValueData::Int(n) => parse_strict_i64(bytes) == Some(n),
        }
    }

    /// Search forward from `start` for an entry equal to `bytes`, stepping
    /// `skip` entries between comparisons.
    pub fn find(&self, start: Option<usize>, bytes: &[u8], skip: usize) -> Option<usize> {
        let mut pos = start?;
        let cached_int = parse_strict_i64(bytes);
        loop {
            if self.is_terminator(pos) {
                return None;
            }
            let matched = match self.get(pos) {
                ValueData::Bytes(b) => b == bytes,
                ValueData::Int(n) => cached_int == Some(n),
            };
            if matched {
                return Some(pos);
            }
            for _ in 0..=skip {
                match self.next(pos) {
                    Some(p) => pos = p,
                    None => return None,
                }
            }
        }
    }

    // ── mutation ─────────────────────────────────────────────────────────

    pub fn push(&mut self, bytes: &[u8], where_: End) -> usize {
        let pos = match where_ {
            End::Head => self.first_position(),
            End::Tail => self.terminator_position(),
        };
        self.insert_before(pos, bytes)
    }

    /// Insert `bytes` before entry `pos` (or before the terminator, to
    /// append). Returns the position of the newly inserted entry.
    pub fn insert_before(&mut self, pos: usize, bytes: &[u8]) -> usize {
        debug_assert!(pos <= self.terminator_position());

        // Step 1: prev-entry-length for the new entry.
        let new_prev_len: u32 = if !self.is_terminator(pos) {
            decode_prevlen(&self.buf, pos).0
        } else if self.is_empty() {
            0
        } else {
            self.entry_size(self.tail_position()) as u32
        };

        // Step 2-3: encode content and required size.
        let content = encode_content_from_bytes(bytes);
        let prevlen_bytes = encode_prevlen(new_prev_len);
        let required = prevlen_bytes.len() + content.len();

        // Step 4: nextdiff at the successor, if any.
        let at_tail = self.is_terminator(pos);
        let (old_succ_field_size, nextdiff): (usize, i64) = if at_tail {
            (0, 0)
        } else {
            let (_, old_fs) = decode_prevlen(&self.buf, pos);
            let new_fs = prevlen_field_size(required as u32);
            (old_fs, new_fs as i64 - old_fs as i64)
        };

        // Step 5: splice the new entry in, rewriting the successor's
        // prev-entry-length field in place.
        let old_tail_offset = self.tail_offset();
        let succ_was_tail = !at_tail && pos == old_tail_offset as usize;
        let mut new_buf = Vec::with_capacity(self.buf.len() + required + nextdiff.unsigned_abs() as usize);
        new_buf.extend_from_slice(&self.buf[..pos]);
        new_buf.extend_from_slice(&prevlen_bytes);
        new_buf.extend_from_slice(&content);
        if !at_tail {
            new_buf.extend_from_slice(&encode_prevlen(required as u32));
            new_buf.extend_from_slice(&self.buf[pos + old_succ_field_size..]);
        } else {
            new_buf.extend_from_slice(&self.buf[pos..]);
        }
        self.buf = new_buf;

        // Step 6-7: header bookkeeping.
        self.set_total_bytes(self.buf.len() as u32);
        let new_tail_offset: u32 = if at_tail {
            pos as u32
        } else if succ_was_tail {
            (pos + required) as u32
        } else {
            (old_tail_offset as i64 + required as i64 + nextdiff) as u32
        };
        self.set_tail_offset(new_tail_offset);

        // Step 9: entry count (saturating).
        self.bump_count(1);

        // Step 8: cascade update from the (possibly shifted) successor.
        if !at_tail {
            self.cascade_update(pos + required);
        }

        pos
    }

    /// Delete `count` consecutive entries starting at `start_pos`.
    pub fn delete_range(&mut self, start_pos: usize, count: usize) {
        if count == 0 {
            return;
        }
        let mut p = start_pos;
        let mut deleted_bytes = 0usize;
        for _ in 0..count {
            let sz = self.entry_size(p);
            deleted_bytes += sz;
            p += sz;
        }
        let successor_pos = p;
        let terminator_pos = self.terminator_position();

        let new_prev_len: u32 = if start_pos == self.first_position() {
            0
        } else {
            decode_prevlen(&self.buf, start_pos).0
        };

        if successor_pos == terminator_pos {
            let mut new_buf = self.buf[..start_pos].to_vec();
            new_buf.push(TERMINATOR);
            self.buf = new_buf;
            self.set_total_bytes(self.buf.len() as u32);
            let new_tail = if start_pos == self.first_position() {
                HEADER_SIZE as u32
            } else {
                start_pos as u32 - new_prev_len
            };
            self.set_tail_offset(new_tail);
            self.bump_count(-(count as i64));
        } else {
            let (_, old_field_size) = decode_prevlen(&self.buf, successor_pos);
            let new_field_size = prevlen_field_size(new_prev_len);
            let nextdiff = new_field_size as i64 - old_field_size as i64;

            let mut new_buf = Vec::with_capacity(self.buf.len());
            new_buf.extend_from_slice(&self.buf[..start_pos]);
            new_buf.extend_from_slice(&encode_prevlen(new_prev_len));
            new_buf.extend_from_slice(&self.buf[successor_pos + old_field_size..]);
            self.buf = new_buf;
            self.set_total_bytes(self.buf.len() as u32);

            let old_tail = self.tail_offset() as i64;
            let new_tail = old_tail - deleted_bytes as i64 + nextdiff;
            self.set_tail_offset(new_tail as u32);
            self.bump_count(-(count as i64));

            self.cascade_update(start_pos);
        }
    }

    /// Forward walk fixing up downstream prev-entry-length fields after an
    /// insertion or deletion changed `pos`'s encoded size. Grow-only: a
    /// 5-byte field is never shrunk back to 1 byte, even if the new value
    /// would fit, to avoid an oscillating cascade.
    fn cascade_update(&mut self, mut pos: usize) {
        loop {
            let terminator_pos = self.terminator_position();
            if pos == terminator_pos {
                return;
            }
            let cur_size = self.entry_size(pos);
            let next_pos = pos + cur_size;
            if next_pos == terminator_pos {
                return;
            }
            let (_, next_field_size) = decode_prevlen(&self.buf, next_pos);
            let needed = prevlen_field_size(cur_size as u32);
            if needed <= next_field_size {
                write_prevlen_fixed_width(&mut self.buf, next_pos, cur_size as u32, next_field_size);
                return;
            }
            // Growing 1 -> 5 bytes: splice in 4 extra bytes.
            let mut new_buf = Vec::with_capacity(self.buf.len() + 4);
            new_buf.extend_from_slice(&self.buf[..next_pos]);
            new_buf.extend_from_slice(&encode_prevlen(cur_size as u32));
            new_buf.extend_from_slice(&self.buf[next_pos + next_field_size..]);
            self.buf = new_buf;
            self.set_total_bytes(self.buf.len() as u32);
            let old_tail = self.tail_offset();
            if old_tail as usize > pos {
                self.set_tail_offset(old_tail + 4);
            }
            pos = next_pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_header_invariants(lp: &Listpack) {
        let buf = lp.as_bytes();
        assert_eq!(buf.len(), lp.total_bytes() as usize);
        assert_eq!(*buf.last().unwrap(), TERMINATOR);
        // Re-walking the chain from the first entry must land exactly on
        // the terminator position after `length()` hops.
        let mut pos = lp.first_position();
        let mut steps = 0;
        while !lp.is_terminator(pos) {
            pos = lp.next(pos).unwrap_or_else(|| lp.terminator_position());
            steps += 1;
        }
        assert_eq!(pos, lp.terminator_position());
        assert_eq!(steps, lp.clone().length());
    }

    #[test]
    fn new_is_empty() {
        let mut lp = Listpack::new();
        assert_eq!(lp.length(), 0);
        assert!(lp.is_terminator(lp.first_position()));
        assert_header_invariants(&lp);
    }

    #[test]
    fn push_tail_then_head_roundtrip() {
        let mut lp = Listpack::new();
        lp.push(b"a", End::Tail);
        lp.push(b"b", End::Tail);
        lp.push(b"z", End::Head);
        assert_eq!(lp.length(), 3);
        let p0 = lp.index(0).unwrap();
        let p1 = lp.index(1).unwrap();
        let p2 = lp.index(2).unwrap();
        assert_eq!(lp.get(p0), ValueData::Bytes(b"z".to_vec()));
        assert_eq!(lp.get(p1), ValueData::Bytes(b"a".to_vec()));
        assert_eq!(lp.get(p2), ValueData::Bytes(b"b".to_vec()));
        assert_header_invariants(&lp);
    }

    #[test]
    fn integers_round_trip_through_every_width() {
        let mut lp = Listpack::new();
        let values: [i64; 8] = [0, 12, 13, -1, 127, -32768, 1 << 20, i64::MAX];
        for v in values {
            lp.push(v.to_string().as_bytes(), End::Tail);
        }
        for (i, v) in values.iter().enumerate() {
            let pos = lp.index(i as isize).unwrap();
            assert_eq!(lp.get(pos), ValueData::Int(*v));
        }
        assert_header_invariants(&lp);
    }

    #[test]
    fn indexing_symmetry() {
        let mut lp = Listpack::new();
        for i in 0..10 {
            lp.push(format!("v{i}").as_bytes(), End::Tail);
        }
        let len = lp.length() as isize;
        for i in 0..len {
            assert_eq!(lp.index(i), lp.index(i - len));
        }
    }

    #[test]
    fn delete_range_middle_and_tail() {
        let mut lp = Listpack::new();
        for c in "abcdef".bytes() {
            lp.push(&[c], End::Tail);
        }
        let pos_c = lp.index(2).unwrap();
        lp.delete_range(pos_c, 2); // remove c, d
        assert_eq!(lp.length(), 4);
        let remaining: Vec<u8> = (0..4)
            .map(|i| match lp.get(lp.index(i).unwrap()) {
                ValueData::Bytes(b) => b[0],
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(remaining, b"abef");
        assert_header_invariants(&lp);

        let last = lp.index(-1).unwrap();
        lp.delete_range(last, 1);
        assert_eq!(lp.length(), 3);
        assert_header_invariants(&lp);
    }

    #[test]
    fn cascade_grows_prevlen_field_and_never_shrinks() {
        let mut lp = Listpack::new();
        // A 300-byte entry forces the *next* entry's prev-entry-length
        // field to grow from 1 to 5 bytes.
        lp.push(&vec![b'x'; 300], End::Tail);
        lp.push(b"short", End::Tail);
        let short_pos = lp.index(1).unwrap();
        let (_, field_size) = decode_prevlen(lp.as_bytes(), short_pos);
        assert_eq!(field_size, 5);

        // Insert another big entry right before "short": its prev-entry-length
        // field was already 5 bytes wide and must stay that way even across
        // further mutations (grow-only, never shrink).
        lp.insert_before(short_pos, &vec![b'w'; 300]);
        let short_pos = lp.index(2).unwrap();
        let (_, field_size) = decode_prevlen(lp.as_bytes(), short_pos);
        assert_eq!(field_size, 5);
        assert_header_invariants(&lp);
    }

    #[test]
    fn find_matches_by_value_not_encoding() {
        let mut lp = Listpack::new();
        lp.push(b"42", End::Tail);
        lp.push(b"hello", End::Tail);
        let found = lp.find(Some(lp.first_position()), b"42", 0);
        assert_eq!(found, lp.index(0));
        let not_found = lp.find(Some(lp.first_position()), b"nope", 0);
        assert_eq!(not_found, None);
    }
}
