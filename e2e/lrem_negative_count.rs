//! E2E Scenario 4: LREM with a negative count removes from the tail.
//!
//! On `[a,b,a,c,a,d]`, `LREM k -2 a` removes the two tail-most `a`s, leaving
//! `[a,b,c,d]` and replying with the count removed, 2.

extern crate listd;

use listd::cli::repl::Repl;
use listd::config::ListConfig;

#[test]
fn lrem_negative_count_removes_from_tail() {
    let mut repl = Repl::new(ListConfig::default());
    repl.eval("RPUSH k a b a c a d");

    let reply = repl.eval("LREM k -2 a");
    assert_eq!(reply.to_string(), "(integer) 2");

    let reply = repl.eval("LRANGE k 0 -1");
    assert_eq!(reply.to_string(), "1) \"a\"\n2) \"b\"\n3) \"c\"\n4) \"d\"");
}
