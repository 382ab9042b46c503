//! Blocking-pop coordinator for BLPOP / BRPOP / BRPOPLPUSH.
//!
//! A client that calls a blocking command against an empty list registers
//! itself here instead of receiving an immediate reply. A later push marks
//! the key "ready"; after the command/transaction/script boundary that
//! produced the push, [`BlockingCoordinator::drain`] serves every ready key
//! to its waiters in FIFO order.
//!
//! Timeouts use `std::time::Instant`, not wall-clock `SystemTime`, so
//! deadline comparisons are immune to clock adjustments.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::config::ListConfig;
use crate::database::Database;
use crate::list_object::End;
use crate::value::RedisValue;

pub type ClientId = u64;

#[derive(Debug, Clone)]
struct ClientWait {
    keys: Vec<Vec<u8>>,
    pop_end: End,
    destination: Option<Vec<u8>>,
    deadline: Option<Instant>,
}

/// One waiter served during a [`BlockingCoordinator::drain`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub client: ClientId,
    pub key: Vec<u8>,
    pub value: RedisValue,
}

#[derive(Default)]
pub struct BlockingCoordinator {
    waiters: HashMap<Vec<u8>, VecDeque<ClientId>>,
    clients: HashMap<ClientId, ClientWait>,
    ready_keys: HashSet<Vec<u8>>,
    ready_events: VecDeque<Vec<u8>>,
}

impl BlockingCoordinator {
    pub fn new() -> Self {
        BlockingCoordinator::default()
    }

    pub fn is_blocked(&self, client: ClientId) -> bool {
        self.clients.contains_key(&client)
    }

    /// Register `client` as blocked on `keys` (deduplicated, order
    /// preserved), popping from `pop_end` once served, optionally moving the
    /// popped value into `destination` (BRPOPLPUSH). `timeout` of `None`
    /// never expires.
    pub fn block(
        &mut self,
        client: ClientId,
        keys: &[Vec<u8>],
        pop_end: End,
        timeout: Option<Duration>,
        destination: Option<Vec<u8>>,
    ) {
        let deadline = timeout.map(|d| Instant::now() + d);
        let mut seen = HashSet::new();
        let mut deduped = Vec::new();
        for k in keys {
            if seen.insert(k.clone()) {
                deduped.push(k.clone());
            }
        }
        for k in &deduped {
            self.waiters.entry(k.clone()).or_default().push_back(client);
        }
        self.clients.insert(
            client,
            ClientWait {
                keys: deduped,
                pop_end,
                destination,
                deadline,
            },
        );
    }

    /// Remove `client` from every key it was waiting on. Safe to call on a
    /// client that isn't blocked (no-op).
    pub fn unblock(&mut self, client: ClientId) {
        if let Some(cw) = self.clients.remove(&client) {
            for k in &cw.keys {
                if let Some(q) = self.waiters.get_mut(k) {
                    q.retain(|&c| c != client);
                    if q.is_empty() {
                        self.waiters.remove(k);
                    }
                }
            }
        }
    }

    /// Mark `key` as ready if it has waiters and isn't already queued.
    pub fn signal_ready(&mut self, key: &[u8]) {
        if !self.waiters.contains_key(key) {
            return;
        }
        if !self.ready_keys.insert(key.to_vec()) {
            return;
        }
        self.ready_events.push_back(key.to_vec());
    }

    /// Serve every queued ready key to its waiters in FIFO order. Call
    /// exactly once after each top-level command, transaction, or script.
    ///
    /// Serving a move-pop (BRPOPLPUSH) performs a push into the
    /// destination, which can itself call `signal_ready` — so the queue is
    /// snapshotted before the loop and any events raised during it are
    /// drained by a recursive call, rather than being picked up (or missed)
    /// by the same iteration.
    pub fn drain(&mut self, db: &mut Database, config: &ListConfig) -> Vec<Delivery> {
        let mut out = Vec::new();
        let mut pending = std::mem::take(&mut self.ready_events);
        while let Some(key) = pending.pop_front() {
            self.ready_keys.remove(&key);
            loop {
                let list_nonempty = db.lists.get_mut(&key).map(|lo| !lo.is_empty()).unwrap_or(false);
                if !list_nonempty {
                    break;
                }
                let client = match self.waiters.get(&key).and_then(|q| q.front().copied()) {
                    Some(c) => c,
                    None => break,
                };
                // `client` just came off `self.waiters[key]`'s front, and
                // every id ever pushed there is inserted into `self.clients`
                // in the same `block()` call, only ever removed from both
                // together by `unblock()` — so this lookup and the
                // `list_nonempty` check above cannot miss in practice. Still,
                // bail out on this key rather than panic if they ever do.
                let Some(cw) = self.clients.get(&client).cloned() else {
                    break;
                };
                let Some(list) = db.lists.get_mut(&key) else {
                    break;
                };
                let Some(value) = list.pop(cw.pop_end) else {
                    break;
                };
                db.remove_if_empty(&key);

                if let Some(dest) = &cw.destination {
                    let dest_obj = db.lists.entry(dest.clone()).or_default();
                    dest_obj.push(&value.to_bytes(), End::Head, config);
                    self.signal_ready(dest);
                }

                out.push(Delivery {
                    client,
                    key: key.clone(),
                    value,
                });
                self.unblock(client);
            }
        }
        if !self.ready_events.is_empty() {
            out.extend(self.drain(db, config));
        }
        out
    }

    /// Unblock every client whose absolute deadline has passed, returning
    /// their ids so the caller can deliver a timeout/null reply.
    pub fn sweep_expired(&mut self, now: Instant) -> Vec<ClientId> {
        let expired: Vec<ClientId> = self
            .clients
            .iter()
            .filter(|(_, cw)| cw.deadline.is_some_and(|d| now >= d))
            .map(|(&c, _)| c)
            .collect();
        for &c in &expired {
            self.unblock(c);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_object::ListObject;

    #[test]
    fn signal_ready_is_a_noop_without_waiters() {
        let mut bc = BlockingCoordinator::new();
        bc.signal_ready(b"k");
        assert!(!bc.ready_keys.contains(b"k".as_slice()));
    }

    #[test]
    fn signal_ready_dedupes() {
        let mut bc = BlockingCoordinator::new();
        bc.block(1, &[b"k".to_vec()], End::Head, None, None);
        bc.signal_ready(b"k");
        bc.signal_ready(b"k");
        assert_eq!(bc.ready_events.len(), 1);
    }

    #[test]
    fn fifo_fairness_across_three_waiters() {
        let mut bc = BlockingCoordinator::new();
        let mut db = Database::new();
        let cfg = ListConfig::default();
        bc.block(1, &[b"k".to_vec()], End::Head, None, None);
        bc.block(2, &[b"k".to_vec()], End::Head, None, None);
        bc.block(3, &[b"k".to_vec()], End::Head, None, None);

        let mut list = ListObject::new();
        list.push(b"a", End::Tail, &cfg);
        list.push(b"b", End::Tail, &cfg);
        list.push(b"c", End::Tail, &cfg);
        db.lists.insert(b"k".to_vec(), list);
        bc.signal_ready(b"k");

        let deliveries = bc.drain(&mut db, &cfg);
        assert_eq!(deliveries.len(), 3);
        assert_eq!(deliveries[0].client, 1);
        assert_eq!(deliveries[1].client, 2);
        assert_eq!(deliveries[2].client, 3);
        assert_eq!(deliveries[0].value, RedisValue::from_bytes(b"a"));
        assert!(!bc.is_blocked(1));
        assert!(!bc.is_blocked(2));
        assert!(!bc.is_blocked(3));
    }

    #[test]
    fn move_pop_reenters_drain_for_destination_waiter() {
        let mut bc = BlockingCoordinator::new();
        let mut db = Database::new();
        let cfg = ListConfig::default();

        // c1 waits on "dst", c2 waits on "src" wanting to move into "dst".
        bc.block(1, &[b"dst".to_vec()], End::Head, None, None);
        bc.block(2, &[b"src".to_vec()], End::Tail, None, Some(b"dst".to_vec()));

        let mut src = ListObject::new();
        src.push(b"payload", End::Tail, &cfg);
        db.lists.insert(b"src".to_vec(), src);
        bc.signal_ready(b"src");

        let deliveries = bc.drain(&mut db, &cfg);
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].client, 2);
        assert_eq!(deliveries[0].key, b"src");
        assert_eq!(deliveries[1].client, 1);
        assert_eq!(deliveries[1].key, b"dst");
        assert_eq!(deliveries[1].value, RedisValue::from_bytes(b"payload"));
    }

    #[test]
    fn sweep_expired_unblocks_past_deadline_clients() {
        let mut bc = BlockingCoordinator::new();
        bc.block(1, &[b"k".to_vec()], End::Head, Some(Duration::from_millis(0)), None);
        std::thread::sleep(Duration::from_millis(5));
        let expired = bc.sweep_expired(Instant::now());
        assert_eq!(expired, vec![1]);
        assert!(!bc.is_blocked(1));
    }

    #[test]
    fn unblock_without_registration_is_a_noop() {
        let mut bc = BlockingCoordinator::new();
        bc.unblock(42);
    }
}
