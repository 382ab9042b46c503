//! E2E Scenario 1: basic push, range, and length.
//!
//! `RPUSH k a b c` then `LRANGE k 0 -1` returns `[a,b,c]`; `LLEN k` returns 3.

extern crate listd;

use listd::cli::repl::Repl;
use listd::config::ListConfig;

#[test]
fn rpush_then_lrange_and_llen() {
    let mut repl = Repl::new(ListConfig::default());
    let reply = repl.eval("RPUSH k a b c");
    assert_eq!(reply.to_string(), "(integer) 3");

    let reply = repl.eval("LRANGE k 0 -1");
    assert_eq!(reply.to_string(), "1) \"a\"\n2) \"b\"\n3) \"c\"");

    let reply = repl.eval("LLEN k");
    assert_eq!(reply.to_string(), "(integer) 3");
}
