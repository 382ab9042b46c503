//! Packed, memory-efficient byte-array list representation.
//!
//! A single contiguous blob encoding a variable-width doubly-linked sequence
//! of integers or strings, with O(1) endpoint access and in-place
//! reallocation on every mutation:
//!
//! ```text
//! total-bytes:u32 LE | tail-offset:u32 LE | entry-count:u16 LE | entries... | 0xFF
//! ```
//!
//! Each entry is `<prev-entry-length><type-length-encoding><payload>`; see
//! `encoding` for the tag layout and `blob` for the insert/delete/cascade
//! machinery that keeps the chain of prev-entry-length back-pointers
//! consistent after every mutation.

pub mod blob;
pub mod encoding;

pub use blob::{End, Listpack, HEADER_SIZE};
