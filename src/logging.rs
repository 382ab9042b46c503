//! Global, atomically-adjustable diagnostic verbosity level.
//!
//! Mirrors the existing `cli::constants` display-level idiom (itself a port
//! of `lz4cli.c`'s file-scoped `displayLevel` global): a crate-level atomic
//! plus a `displaylevel!` macro that gates `eprintln!` calls by level,
//! instead of depending on a logging facade crate. 0 = silent, 1 = errors
//! only, 2 = normal (default), 3 = verbose, 4 = trace-level detail (e.g.
//! every cascade-update step).

use std::sync::atomic::{AtomicU32, Ordering};

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current verbosity level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the verbosity level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print a diagnostic line at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::logging::display_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}
