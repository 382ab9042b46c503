//! Demonstration-only multi-client harness.
//!
//! The core (`Database`, `ListObject`, `BlockingCoordinator`) is
//! single-threaded by construction (§5): no locks, no atomics, `Rc` not
//! `Arc`. To exercise realistic concurrent BLPOP/BRPOP/BRPOPLPUSH fairness
//! in the demo CLI and integration tests without giving the core itself
//! multi-threaded access to one list, several simulated "client" threads
//! submit [`Command`]s over a bounded `crossbeam_channel` into one
//! dedicated engine thread that owns the database and runs them one at a
//! time — the same channel-as-job-queue idiom as this crate's other
//! channel-based submission code, just without a worker pool behind it,
//! since the core must stay on exactly one thread.

use std::collections::HashMap;
use std::fmt;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::blocking::{BlockingCoordinator, ClientId};
use crate::commands::{self, Outcome};
use crate::config::ListConfig;
use crate::database::Database;
use crate::error::ListError;
use crate::list_object::End;
use crate::reply::Reply;

/// A [`Reply`] with every `RedisValue` flattened to owned bytes.
///
/// `RedisValue` is `Rc`-backed so the single-threaded core never pays for
/// atomic refcounting (§5); that also makes it `!Send`. Crossing the engine
/// thread boundary therefore means converting at the edge rather than
/// sending a `Reply` itself down the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoReply {
    Integer(i64),
    Bulk(Vec<u8>),
    NullBulk,
    Array(Vec<DemoReply>),
    NullArray,
    SimpleString(&'static str),
    Error(ListError),
}

impl From<&Reply> for DemoReply {
    fn from(reply: &Reply) -> Self {
        match reply {
            Reply::Integer(n) => DemoReply::Integer(*n),
            Reply::Bulk(v) => DemoReply::Bulk(v.to_bytes()),
            Reply::NullBulk => DemoReply::NullBulk,
            Reply::Array(items) => DemoReply::Array(items.iter().map(DemoReply::from).collect()),
            Reply::NullArray => DemoReply::NullArray,
            Reply::SimpleString(s) => DemoReply::SimpleString(s),
            Reply::Error(e) => DemoReply::Error(e.clone()),
        }
    }
}

impl fmt::Display for DemoReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoReply::Integer(n) => write!(f, "(integer) {n}"),
            DemoReply::Bulk(v) => write!(f, "\"{}\"", String::from_utf8_lossy(v)),
            DemoReply::NullBulk => write!(f, "(nil)"),
            DemoReply::Array(items) => {
                if items.is_empty() {
                    return write!(f, "(empty array)");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {item}", i + 1)?;
                }
                Ok(())
            }
            DemoReply::NullArray => write!(f, "(nil)"),
            DemoReply::SimpleString(s) => write!(f, "{s}"),
            DemoReply::Error(e) => write!(f, "(error) {e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    LPush(Vec<u8>, Vec<Vec<u8>>),
    RPush(Vec<u8>, Vec<Vec<u8>>),
    LPushX(Vec<u8>, Vec<Vec<u8>>),
    RPushX(Vec<u8>, Vec<Vec<u8>>),
    LInsert { key: Vec<u8>, before: bool, pivot: Vec<u8>, value: Vec<u8> },
    LLen(Vec<u8>),
    LIndex(Vec<u8>, isize),
    LSet(Vec<u8>, isize, Vec<u8>),
    LPop(Vec<u8>),
    RPop(Vec<u8>),
    LRange(Vec<u8>, isize, isize),
    LTrim(Vec<u8>, isize, isize),
    LRem(Vec<u8>, isize, Vec<u8>),
    RPopLPush(Vec<u8>, Vec<u8>),
    BLPop(Vec<Vec<u8>>, Option<Duration>),
    BRPop(Vec<Vec<u8>>, Option<Duration>),
    BRPopLPush(Vec<u8>, Vec<u8>, Option<Duration>),
}

enum EngineMsg {
    Submit {
        client: ClientId,
        command: Command,
        reply_tx: Sender<DemoReply>,
    },
    Shutdown,
}

#[derive(Clone, Copy)]
enum BlockedKind {
    Pop,
    MovePop,
}

fn timeout_reply(kind: BlockedKind) -> DemoReply {
    match kind {
        BlockedKind::Pop => DemoReply::NullArray,
        BlockedKind::MovePop => DemoReply::NullBulk,
    }
}

/// A handle to the running engine thread. Dropping it (or calling
/// [`Engine::shutdown`]) stops the thread.
pub struct Engine {
    tx: Sender<EngineMsg>,
    handle: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn spawn(config: ListConfig) -> Self {
        let (tx, rx) = bounded::<EngineMsg>(64);
        let handle = std::thread::spawn(move || run(rx, config));
        Engine { tx, handle: Some(handle) }
    }

    /// Submit a command as `client` and block the calling thread until a
    /// reply arrives — which, for a blocking command, may be after another
    /// client's push.
    pub fn submit(&self, client: ClientId, command: Command) -> DemoReply {
        let (reply_tx, reply_rx) = bounded(1);
        self.tx
            .send(EngineMsg::Submit { client, command, reply_tx })
            .expect("engine thread gone");
        reply_rx.recv().expect("engine dropped reply sender without answering")
    }

    pub fn shutdown(mut self) {
        let _ = self.tx.send(EngineMsg::Shutdown);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let _ = self.tx.send(EngineMsg::Shutdown);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

fn run(rx: Receiver<EngineMsg>, config: ListConfig) {
    let mut db = Database::new();
    let mut coordinator = BlockingCoordinator::new();
    let mut pending: HashMap<ClientId, (Sender<DemoReply>, BlockedKind)> = HashMap::new();

    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(EngineMsg::Submit { client, command, reply_tx }) => {
                dispatch(client, command, reply_tx, &mut db, &mut coordinator, &config, &mut pending);
                deliver(coordinator.drain(&mut db, &config), &mut pending);
            }
            Ok(EngineMsg::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => {
                for c in coordinator.sweep_expired(Instant::now()) {
                    if let Some((tx, kind)) = pending.remove(&c) {
                        let _ = tx.send(timeout_reply(kind));
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn deliver(deliveries: Vec<crate::blocking::Delivery>, pending: &mut HashMap<ClientId, (Sender<DemoReply>, BlockedKind)>) {
    for d in deliveries {
        if let Some((tx, kind)) = pending.remove(&d.client) {
            let reply = match kind {
                BlockedKind::Pop => DemoReply::Array(vec![DemoReply::Bulk(d.key), DemoReply::Bulk(d.value.to_bytes())]),
                BlockedKind::MovePop => DemoReply::Bulk(d.value.to_bytes()),
            };
            let _ = tx.send(reply);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn dispatch(
    client: ClientId,
    command: Command,
    reply_tx: Sender<DemoReply>,
    db: &mut Database,
    coordinator: &mut BlockingCoordinator,
    config: &ListConfig,
    pending: &mut HashMap<ClientId, (Sender<DemoReply>, BlockedKind)>,
) {
    let reply = match command {
        Command::LPush(key, values) => commands::lpush(db, config, coordinator, &key, &values),
        Command::RPush(key, values) => commands::rpush(db, config, coordinator, &key, &values),
        Command::LPushX(key, values) => commands::lpushx(db, config, coordinator, &key, &values),
        Command::RPushX(key, values) => commands::rpushx(db, config, coordinator, &key, &values),
        Command::LInsert { key, before, pivot, value } => commands::linsert(db, coordinator, &key, before, &pivot, &value),
        Command::LLen(key) => commands::llen(db, &key),
        Command::LIndex(key, i) => commands::lindex(db, &key, i),
        Command::LSet(key, i, value) => commands::lset(db, &key, i, &value),
        Command::LPop(key) => commands::lpop(db, &key),
        Command::RPop(key) => commands::rpop(db, &key),
        Command::LRange(key, start, end) => commands::lrange(db, &key, start, end),
        Command::LTrim(key, start, end) => commands::ltrim(db, &key, start, end),
        Command::LRem(key, count, value) => commands::lrem(db, &key, count, &value),
        Command::RPopLPush(src, dst) => commands::rpoplpush(db, config, coordinator, &src, &dst),
        Command::BLPop(keys, timeout) => {
            match commands::blocking_pop(db, coordinator, client, &keys, End::Head, timeout, false) {
                Outcome::Immediate(r) => r,
                Outcome::Blocked => {
                    pending.insert(client, (reply_tx, BlockedKind::Pop));
                    return;
                }
            }
        }
        Command::BRPop(keys, timeout) => {
            match commands::blocking_pop(db, coordinator, client, &keys, End::Tail, timeout, false) {
                Outcome::Immediate(r) => r,
                Outcome::Blocked => {
                    pending.insert(client, (reply_tx, BlockedKind::Pop));
                    return;
                }
            }
        }
        Command::BRPopLPush(src, dst, timeout) => {
            match commands::blocking_move_pop(db, config, coordinator, client, &src, &dst, timeout, false) {
                Outcome::Immediate(r) => r,
                Outcome::Blocked => {
                    pending.insert(client, (reply_tx, BlockedKind::MovePop));
                    return;
                }
            }
        }
    };
    let _ = reply_tx.send(DemoReply::from(&reply));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blpop_wakes_after_another_clients_push() {
        let engine = Engine::spawn(ListConfig::default());
        let (tx, rx) = bounded(1);
        let eng = &engine;
        std::thread::scope(|scope| {
            scope.spawn(move || {
                let reply = eng.submit(1, Command::BLPop(vec![b"k".to_vec()], None));
                tx.send(reply).unwrap();
            });
            std::thread::sleep(Duration::from_millis(20));
            engine.submit(2, Command::RPush(b"k".to_vec(), vec![b"hello".to_vec()]));
        });
        let reply = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(
            reply,
            DemoReply::Array(vec![DemoReply::Bulk(b"k".to_vec()), DemoReply::Bulk(b"hello".to_vec())])
        );
    }

    #[test]
    fn blpop_times_out_with_null_array() {
        let engine = Engine::spawn(ListConfig::default());
        let reply = engine.submit(1, Command::BLPop(vec![b"missing".to_vec()], Some(Duration::from_millis(30))));
        assert_eq!(reply, DemoReply::NullArray);
    }
}
