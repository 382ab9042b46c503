//! E2E Scenario 5: RPOPLPUSH with the same source and destination rotates
//! the list.
//!
//! `RPOPLPUSH s s` on `[1,2,3]` yields `[3,1,2]` and replies with the moved
//! value, 3.

extern crate listd;

use listd::cli::repl::Repl;
use listd::config::ListConfig;

#[test]
fn rpoplpush_same_key_rotates() {
    let mut repl = Repl::new(ListConfig::default());
    repl.eval("RPUSH s 1 2 3");

    let reply = repl.eval("RPOPLPUSH s s");
    assert_eq!(reply.to_string(), "\"3\"");

    let reply = repl.eval("LRANGE s 0 -1");
    assert_eq!(reply.to_string(), "1) \"3\"\n2) \"1\"\n3) \"2\"");
}
