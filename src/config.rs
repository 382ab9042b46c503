//! Tunable thresholds that govern listpack → node-list conversion.
//!
//! Corresponds to the `list-max-listpack-size` / `list-max-ziplist-size`
//! configuration directives of the reference datastore. Unlike that server's
//! global, live-reloadable config, this crate threads a `ListConfig` value
//! explicitly through the command entry points (`src/commands.rs`) so tests
//! can exercise non-default thresholds without touching global state.

/// Governs when a list value converts from the packed `Listpack` form to the
/// pointer-based `NodeList` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Entries whose byte length exceeds this force conversion to node form.
    /// Default 64, matching the reference server's `list-max-listpack-size`
    /// fill-factor-adjacent "large value" threshold.
    pub string_size_threshold: usize,
    /// Lists whose entry count exceeds this force conversion to node form.
    /// Default 512.
    pub entry_count_threshold: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            string_size_threshold: 64,
            entry_count_threshold: 512,
        }
    }
}
