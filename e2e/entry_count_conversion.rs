//! E2E Scenario 3: exceeding the entry-count threshold forces conversion to
//! node-list form.
//!
//! Filling a fresh list with 513 one-byte entries via RPUSH crosses the
//! default 512-entry threshold; `LLEN` still reports the true count, 513,
//! regardless of which representation is currently active.

extern crate listd;

use listd::cli::repl::Repl;
use listd::config::ListConfig;

#[test]
fn entry_count_past_threshold_converts_and_preserves_length() {
    let mut repl = Repl::new(ListConfig::default());

    for _ in 0..513 {
        let reply = repl.eval("RPUSH k a");
        let _ = reply;
    }

    let reply = repl.eval("LLEN k");
    assert_eq!(reply.to_string(), "(integer) 513");
}
