//! E2E Scenario 2: a value past the string-size threshold forces conversion
//! to node-list form.
//!
//! `RPUSH k "x".repeat(100)` where 100 exceeds the default 64-byte
//! string-size threshold converts the list to node form on this push;
//! `LLEN k` returns 1; `LINDEX k 0` returns the 100-byte value unchanged.

extern crate listd;

use listd::cli::repl::Repl;
use listd::config::ListConfig;

#[test]
fn oversized_value_triggers_node_list_conversion() {
    let mut repl = Repl::new(ListConfig::default());
    let big = "x".repeat(100);

    let reply = repl.eval(&format!("RPUSH k {big}"));
    assert_eq!(reply.to_string(), "(integer) 1");

    let reply = repl.eval("LLEN k");
    assert_eq!(reply.to_string(), "(integer) 1");

    let reply = repl.eval("LINDEX k 0");
    assert_eq!(reply.to_string(), format!("\"{big}\""));
}
