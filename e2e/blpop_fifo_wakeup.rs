//! E2E Scenario 6: a BLPOP client is woken, in order, by another client's
//! push.
//!
//! Client C1 issues `BLPOP k 0`, then client C2 issues `RPUSH k hello
//! world`. After drain, C1 receives `(k, hello)`, key `k` now holds
//! `[world]`, and C1 is unblocked.

extern crate listd;

use std::time::Duration;

use listd::config::ListConfig;
use listd::demo_engine::{Command, DemoReply, Engine};

#[test]
fn blpop_client_woken_in_fifo_order_by_push() {
    let engine = Engine::spawn(ListConfig::default());
    let eng = &engine;

    let (c1_reply, k_contents) = std::thread::scope(|scope| {
        let c1 = scope.spawn(move || eng.submit(1, Command::BLPop(vec![b"k".to_vec()], None)));
        std::thread::sleep(Duration::from_millis(20));
        let push_reply = eng.submit(2, Command::RPush(b"k".to_vec(), vec![b"hello".to_vec(), b"world".to_vec()]));
        assert_eq!(push_reply, DemoReply::Integer(2));
        let c1_reply = c1.join().unwrap();
        let remaining = eng.submit(3, Command::LRange(b"k".to_vec(), 0, -1));
        (c1_reply, remaining)
    });

    assert_eq!(
        c1_reply,
        DemoReply::Array(vec![DemoReply::Bulk(b"k".to_vec()), DemoReply::Bulk(b"hello".to_vec())])
    );
    assert_eq!(k_contents, DemoReply::Array(vec![DemoReply::Bulk(b"world".to_vec())]));

    engine.shutdown();
}
