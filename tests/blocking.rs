use std::time::{Duration, Instant};

use listd::blocking::BlockingCoordinator;
use listd::{Database, End, ListConfig, ListObject};

fn cfg() -> ListConfig {
    ListConfig::default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction short-circuit (§8): the command layer is responsible for never
// calling `block` inside a transaction, but the coordinator itself has no
// notion of "in_transaction" — this is enforced at the commands.rs boundary
// (see commands::blocking_pop's `in_transaction` parameter). Here we confirm
// the coordinator-only half of the contract: a client that never registered
// is never delivered to.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unregistered_client_never_receives_a_delivery() {
    let mut bc = BlockingCoordinator::new();
    let mut db = Database::new();
    let cfg = cfg();
    let mut list = ListObject::new();
    list.push(b"v", End::Tail, &cfg);
    db.lists.insert(b"k".to_vec(), list);
    bc.signal_ready(b"k");
    let deliveries = bc.drain(&mut db, &cfg);
    assert!(deliveries.is_empty());
    assert_eq!(db.lists.get_mut(b"k".as_slice()).unwrap().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// signal_ready/drain contract: a key only becomes ready once, even if pushed
// to multiple times before the next drain.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn multiple_signals_before_drain_still_deliver_every_pushed_value() {
    let mut bc = BlockingCoordinator::new();
    let mut db = Database::new();
    let cfg = cfg();
    bc.block(1, &[b"k".to_vec()], End::Head, None, None);

    let mut list = ListObject::new();
    list.push(b"first", End::Tail, &cfg);
    db.lists.insert(b"k".to_vec(), list);
    bc.signal_ready(b"k");
    db.lists.get_mut(b"k".as_slice()).unwrap().push(b"second", End::Tail, &cfg);
    bc.signal_ready(b"k");

    let deliveries = bc.drain(&mut db, &cfg);
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].value.to_bytes(), b"first");
    assert_eq!(db.lists.get_mut(b"k".as_slice()).unwrap().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Move-pop destination-key readiness: serving a BRPOPLPUSH-style move pop
// pushes into the destination, which must itself become observably ready for
// a *subsequent* drain (not just the re-entrant one already covered in
// blocking.rs's inline tests) if no one was waiting on it yet.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn move_pop_destination_is_poppable_by_a_later_waiter() {
    let mut bc = BlockingCoordinator::new();
    let mut db = Database::new();
    let cfg = cfg();

    bc.block(1, &[b"src".to_vec()], End::Tail, None, Some(b"dst".to_vec()));
    let mut src = ListObject::new();
    src.push(b"payload", End::Tail, &cfg);
    db.lists.insert(b"src".to_vec(), src);
    bc.signal_ready(b"src");
    let first = bc.drain(&mut db, &cfg);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].key, b"src");

    // No one was waiting on "dst" during that drain, so it shouldn't have
    // been delivered — but the value must still be sitting there for a
    // later waiter.
    bc.block(2, &[b"dst".to_vec()], End::Head, None, None);
    bc.signal_ready(b"dst");
    let second = bc.drain(&mut db, &cfg);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].client, 2);
    assert_eq!(second[0].value.to_bytes(), b"payload");
}

#[test]
fn sweep_expired_leaves_other_clients_blocked() {
    let mut bc = BlockingCoordinator::new();
    bc.block(1, &[b"a".to_vec()], End::Head, Some(Duration::from_millis(0)), None);
    bc.block(2, &[b"b".to_vec()], End::Head, None, None);
    std::thread::sleep(Duration::from_millis(5));
    let expired = bc.sweep_expired(Instant::now());
    assert_eq!(expired, vec![1]);
    assert!(!bc.is_blocked(1));
    assert!(bc.is_blocked(2));
}
