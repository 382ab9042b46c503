//! Line-oriented command dispatcher: tokenizes a line by whitespace and
//! calls straight into `commands.rs` against one in-process `Database`.
//! Blocking commands (BLPOP/BRPOP/BRPOPLPUSH) are accepted but, since the
//! REPL is single-client, resolve immediately: a key that's already
//! non-empty pops normally; an empty key reports a timeout instead of
//! hanging the only thread able to push to it.

use std::time::Duration;

use crate::blocking::BlockingCoordinator;
use crate::commands::{self, Outcome};
use crate::config::ListConfig;
use crate::database::Database;
use crate::displaylevel;
use crate::error::ListError;
use crate::list_object::End;
use crate::reply::Reply;

/// A single-client REPL never actually has a waiter to wake, so `coordinator`
/// exists only to satisfy the push commands' signature — `signal_ready` is
/// always a no-op against it.
pub struct Repl {
    db: Database,
    config: ListConfig,
    coordinator: BlockingCoordinator,
}

impl Repl {
    pub fn new(config: ListConfig) -> Self {
        Repl { db: Database::new(), config, coordinator: BlockingCoordinator::new() }
    }

    pub fn eval(&mut self, line: &str) -> Reply {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = tokens.split_first() else {
            return Reply::Error(ListError::Syntax("empty command"));
        };
        self.dispatch(&name.to_ascii_uppercase(), args)
    }

    fn dispatch(&mut self, name: &str, args: &[&str]) -> Reply {
        let db = &mut self.db;
        let cfg = &self.config;
        let coordinator = &mut self.coordinator;
        match name {
            "LPUSH" | "RPUSH" => match args.split_first() {
                Some((key, values)) if !values.is_empty() => {
                    let values: Vec<Vec<u8>> = values.iter().map(|v| v.as_bytes().to_vec()).collect();
                    if name == "LPUSH" {
                        commands::lpush(db, cfg, coordinator, key.as_bytes(), &values)
                    } else {
                        commands::rpush(db, cfg, coordinator, key.as_bytes(), &values)
                    }
                }
                _ => Reply::Error(ListError::Syntax("usage: LPUSH|RPUSH key value...")),
            },
            "LPUSHX" | "RPUSHX" => match args.split_first() {
                Some((key, values)) if !values.is_empty() => {
                    let values: Vec<Vec<u8>> = values.iter().map(|v| v.as_bytes().to_vec()).collect();
                    if name == "LPUSHX" {
                        commands::lpushx(db, cfg, coordinator, key.as_bytes(), &values)
                    } else {
                        commands::rpushx(db, cfg, coordinator, key.as_bytes(), &values)
                    }
                }
                _ => Reply::Error(ListError::Syntax("usage: LPUSHX|RPUSHX key value...")),
            },
            "LINSERT" => match args {
                [key, dir, pivot, value] => {
                    let before = match dir.to_ascii_uppercase().as_str() {
                        "BEFORE" => true,
                        "AFTER" => false,
                        _ => return Reply::Error(ListError::Syntax("direction must be BEFORE or AFTER")),
                    };
                    commands::linsert(db, coordinator, key.as_bytes(), before, pivot.as_bytes(), value.as_bytes())
                }
                _ => Reply::Error(ListError::Syntax("usage: LINSERT key BEFORE|AFTER pivot value")),
            },
            "LLEN" => match args {
                [key] => commands::llen(db, key.as_bytes()),
                _ => Reply::Error(ListError::Syntax("usage: LLEN key")),
            },
            "LINDEX" => match args {
                [key, i] => match i.parse() {
                    Ok(i) => commands::lindex(db, key.as_bytes(), i),
                    Err(_) => Reply::Error(ListError::Syntax("index must be an integer")),
                },
                _ => Reply::Error(ListError::Syntax("usage: LINDEX key index")),
            },
            "LSET" => match args {
                [key, i, value] => match i.parse() {
                    Ok(i) => commands::lset(db, key.as_bytes(), i, value.as_bytes()),
                    Err(_) => Reply::Error(ListError::Syntax("index must be an integer")),
                },
                _ => Reply::Error(ListError::Syntax("usage: LSET key index value")),
            },
            "LPOP" => match args {
                [key] => commands::lpop(db, key.as_bytes()),
                _ => Reply::Error(ListError::Syntax("usage: LPOP key")),
            },
            "RPOP" => match args {
                [key] => commands::rpop(db, key.as_bytes()),
                _ => Reply::Error(ListError::Syntax("usage: RPOP key")),
            },
            "LRANGE" => match args {
                [key, start, end] => match (start.parse(), end.parse()) {
                    (Ok(s), Ok(e)) => commands::lrange(db, key.as_bytes(), s, e),
                    _ => Reply::Error(ListError::Syntax("start/end must be integers")),
                },
                _ => Reply::Error(ListError::Syntax("usage: LRANGE key start end")),
            },
            "LTRIM" => match args {
                [key, start, end] => match (start.parse(), end.parse()) {
                    (Ok(s), Ok(e)) => commands::ltrim(db, key.as_bytes(), s, e),
                    _ => Reply::Error(ListError::Syntax("start/end must be integers")),
                },
                _ => Reply::Error(ListError::Syntax("usage: LTRIM key start end")),
            },
            "LREM" => match args {
                [key, count, value] => match count.parse() {
                    Ok(c) => commands::lrem(db, key.as_bytes(), c, value.as_bytes()),
                    Err(_) => Reply::Error(ListError::Syntax("count must be an integer")),
                },
                _ => Reply::Error(ListError::Syntax("usage: LREM key count value")),
            },
            "RPOPLPUSH" => match args {
                [src, dst] => commands::rpoplpush(db, cfg, coordinator, src.as_bytes(), dst.as_bytes()),
                _ => Reply::Error(ListError::Syntax("usage: RPOPLPUSH src dst")),
            },
            "BLPOP" | "BRPOP" => match args.split_last() {
                Some((timeout, keys)) if !keys.is_empty() => {
                    let Ok(secs) = timeout.parse::<f64>() else {
                        return Reply::Error(ListError::Syntax("timeout must be a number"));
                    };
                    if secs < 0.0 || !secs.is_finite() {
                        return Reply::Error(ListError::Syntax("timeout is negative"));
                    }
                    let timeout = if secs == 0.0 { None } else { Some(Duration::from_secs_f64(secs)) };
                    let keys: Vec<Vec<u8>> = keys.iter().map(|k| k.as_bytes().to_vec()).collect();
                    let where_ = if name == "BLPOP" { End::Head } else { End::Tail };
                    displaylevel!(3, "blocking commands resolve immediately in the single-client REPL");
                    match commands::blocking_pop(db, coordinator, 0, &keys, where_, timeout, true) {
                        Outcome::Immediate(r) => r,
                        Outcome::Blocked => unreachable!("in_transaction=true never blocks"),
                    }
                }
                _ => Reply::Error(ListError::Syntax("usage: BLPOP|BRPOP key... timeout")),
            },
            "BRPOPLPUSH" => match args {
                [src, dst, timeout] => {
                    let Ok(secs) = timeout.parse::<f64>() else {
                        return Reply::Error(ListError::Syntax("timeout must be a number"));
                    };
                    if secs < 0.0 || !secs.is_finite() {
                        return Reply::Error(ListError::Syntax("timeout is negative"));
                    }
                    let timeout = if secs == 0.0 { None } else { Some(Duration::from_secs_f64(secs)) };
                    match commands::blocking_move_pop(db, cfg, coordinator, 0, src.as_bytes(), dst.as_bytes(), timeout, true) {
                        Outcome::Immediate(r) => r,
                        Outcome::Blocked => unreachable!("in_transaction=true never blocks"),
                    }
                }
                _ => Reply::Error(ListError::Syntax("usage: BRPOPLPUSH src dst timeout")),
            },
            _ => Reply::Error(ListError::Syntax("unknown command")),
        }
    }
}
