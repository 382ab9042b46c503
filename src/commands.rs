//! Binding of user-facing list commands to the facade, the database, and the
//! blocking coordinator.
//!
//! Every non-blocking command is a small, direct function that looks the
//! key up in the [`Database`], dispatches to [`ListObject`], and removes the
//! key if the list became empty. The blocking commands (BLPOP/BRPOP/
//! BRPOPLPUSH) try the equivalent non-blocking path first and only register
//! with the [`BlockingCoordinator`] if every key came up empty.

use std::time::Duration;

use crate::blocking::{BlockingCoordinator, ClientId};
use crate::config::ListConfig;
use crate::database::Database;
use crate::error::ListError;
use crate::list_object::End;
use crate::reply::Reply;

/// Result of a command that may block: either a reply is ready now, or the
/// client has been registered with the coordinator and the caller must not
/// reply until a later `drain()`/`sweep_expired()` delivers one.
pub enum Outcome {
    Immediate(Reply),
    Blocked,
}

fn clamp_range(len: usize, start: isize, end: isize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len_i = len as isize;
    let norm = |i: isize| if i < 0 { (len_i + i).max(0) } else { i };
    let s = norm(start);
    let mut e = norm(end);
    if s >= len_i {
        return None;
    }
    if e >= len_i {
        e = len_i - 1;
    }
    if e < 0 || s > e {
        return None;
    }
    Some((s as usize, e as usize))
}

fn push_n(
    db: &mut Database,
    config: &ListConfig,
    coordinator: &mut BlockingCoordinator,
    key: &[u8],
    values: &[Vec<u8>],
    where_: End,
) -> Reply {
    let obj = db.lists.entry(key.to_vec()).or_default();
    for v in values {
        obj.push(v, where_, config);
    }
    let len = obj.len();
    if !values.is_empty() {
        coordinator.signal_ready(key);
    }
    Reply::Integer(len as i64)
}

pub fn lpush(db: &mut Database, config: &ListConfig, coordinator: &mut BlockingCoordinator, key: &[u8], values: &[Vec<u8>]) -> Reply {
    push_n(db, config, coordinator, key, values, End::Head)
}

pub fn rpush(db: &mut Database, config: &ListConfig, coordinator: &mut BlockingCoordinator, key: &[u8], values: &[Vec<u8>]) -> Reply {
    push_n(db, config, coordinator, key, values, End::Tail)
}

fn push_x(
    db: &mut Database,
    config: &ListConfig,
    coordinator: &mut BlockingCoordinator,
    key: &[u8],
    values: &[Vec<u8>],
    where_: End,
) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => {
            for v in values {
                obj.push(v, where_, config);
            }
            if !values.is_empty() {
                coordinator.signal_ready(key);
            }
            Reply::Integer(obj.len() as i64)
        }
        None => Reply::Integer(0),
    }
}

pub fn lpushx(db: &mut Database, config: &ListConfig, coordinator: &mut BlockingCoordinator, key: &[u8], values: &[Vec<u8>]) -> Reply {
    push_x(db, config, coordinator, key, values, End::Head)
}

pub fn rpushx(db: &mut Database, config: &ListConfig, coordinator: &mut BlockingCoordinator, key: &[u8], values: &[Vec<u8>]) -> Reply {
    push_x(db, config, coordinator, key, values, End::Tail)
}

pub fn linsert(db: &mut Database, coordinator: &mut BlockingCoordinator, key: &[u8], before: bool, pivot: &[u8], value: &[u8]) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => {
            if obj.insert_pivot(pivot, value, !before) {
                coordinator.signal_ready(key);
                Reply::Integer(obj.len() as i64)
            } else {
                Reply::Integer(-1)
            }
        }
        None => Reply::Integer(0),
    }
}

pub fn llen(db: &mut Database, key: &[u8]) -> Reply {
    let len = db.lists.get_mut(key).map(|o| o.len()).unwrap_or(0);
    Reply::Integer(len as i64)
}

pub fn lindex(db: &mut Database, key: &[u8], i: isize) -> Reply {
    match db.lists.get_mut(key).and_then(|o| o.get_at(i)) {
        Some(v) => Reply::Bulk(v),
        None => Reply::NullBulk,
    }
}

pub fn lset(db: &mut Database, key: &[u8], i: isize, value: &[u8]) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => {
            if obj.set_at(i, value) {
                Reply::ok()
            } else {
                Reply::Error(ListError::OutOfRange)
            }
        }
        None => Reply::Error(ListError::NoSuchKey),
    }
}

fn pop_one(db: &mut Database, key: &[u8], where_: End) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => match obj.pop(where_) {
            Some(v) => {
                db.remove_if_empty(key);
                Reply::Bulk(v)
            }
            None => Reply::NullBulk,
        },
        None => Reply::NullBulk,
    }
}

pub fn lpop(db: &mut Database, key: &[u8]) -> Reply {
    pop_one(db, key, End::Head)
}

pub fn rpop(db: &mut Database, key: &[u8]) -> Reply {
    pop_one(db, key, End::Tail)
}

pub fn lrange(db: &mut Database, key: &[u8], start: isize, end: isize) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => {
            let len = obj.len();
            match clamp_range(len, start, end) {
                Some((lo, hi)) => Reply::Array(obj.range(lo, hi).into_iter().map(Reply::Bulk).collect()),
                None => Reply::Array(Vec::new()),
            }
        }
        None => Reply::Array(Vec::new()),
    }
}

pub fn ltrim(db: &mut Database, key: &[u8], start: isize, end: isize) -> Reply {
    if let Some(obj) = db.lists.get_mut(key) {
        let len = obj.len();
        match clamp_range(len, start, end) {
            Some((lo, hi)) => {
                obj.trim(lo, hi);
                db.remove_if_empty(key);
            }
            None => {
                db.lists.remove(key);
            }
        }
    }
    Reply::ok()
}

pub fn lrem(db: &mut Database, key: &[u8], count: isize, value: &[u8]) -> Reply {
    match db.lists.get_mut(key) {
        Some(obj) => {
            let removed = obj.rem(count, value);
            db.remove_if_empty(key);
            Reply::Integer(removed as i64)
        }
        None => Reply::Integer(0),
    }
}

pub fn rpoplpush(db: &mut Database, config: &ListConfig, coordinator: &mut BlockingCoordinator, src: &[u8], dst: &[u8]) -> Reply {
    let value = match db.lists.get_mut(src).and_then(|o| o.pop(End::Tail)) {
        Some(v) => v,
        None => return Reply::NullBulk,
    };
    db.remove_if_empty(src);
    let dst_obj = db.lists.entry(dst.to_vec()).or_default();
    dst_obj.push(&value.to_bytes(), End::Head, config);
    coordinator.signal_ready(dst);
    Reply::Bulk(value)
}

/// BLPOP/BRPOP. Tries every key in order for an immediate pop; only
/// registers as blocked if every key was empty. Inside a transaction, a
/// blocking pop on empty returns null immediately instead of blocking.
pub fn blocking_pop(
    db: &mut Database,
    coordinator: &mut BlockingCoordinator,
    client: ClientId,
    keys: &[Vec<u8>],
    where_: End,
    timeout: Option<Duration>,
    in_transaction: bool,
) -> Outcome {
    for key in keys {
        if let Some(obj) = db.lists.get_mut(key) {
            if let Some(v) = obj.pop(where_) {
                db.remove_if_empty(key);
                return Outcome::Immediate(Reply::Array(vec![
                    Reply::Bulk(crate::value::RedisValue::from_bytes(key)),
                    Reply::Bulk(v),
                ]));
            }
        }
    }
    if in_transaction {
        return Outcome::Immediate(Reply::NullArray);
    }
    coordinator.block(client, keys, where_, timeout, None);
    Outcome::Blocked
}

/// BRPOPLPUSH. Tries the non-blocking move first; only registers as blocked
/// if `src` was empty.
#[allow(clippy::too_many_arguments)]
pub fn blocking_move_pop(
    db: &mut Database,
    config: &ListConfig,
    coordinator: &mut BlockingCoordinator,
    client: ClientId,
    src: &[u8],
    dst: &[u8],
    timeout: Option<Duration>,
    in_transaction: bool,
) -> Outcome {
    let reply = rpoplpush(db, config, coordinator, src, dst);
    if !matches!(reply, Reply::NullBulk) {
        return Outcome::Immediate(reply);
    }
    if in_transaction {
        return Outcome::Immediate(Reply::NullBulk);
    }
    coordinator.block(client, &[src.to_vec()], End::Tail, timeout, Some(dst.to_vec()));
    Outcome::Blocked
}
