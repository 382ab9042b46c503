//! Minimal abstract reply builder.
//!
//! Stands in for the real wire protocol's RESP reply encoder: commands
//! return a `Reply` value rather than writing bytes onto a socket, and the
//! demo CLI (`src/cli`) renders it to a terminal-friendly string.

use std::fmt;

use crate::error::ListError;
use crate::value::RedisValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Integer(i64),
    Bulk(RedisValue),
    NullBulk,
    Array(Vec<Reply>),
    NullArray,
    SimpleString(&'static str),
    Error(ListError),
}

impl Reply {
    pub fn ok() -> Reply {
        Reply::SimpleString("OK")
    }
}

impl From<ListError> for Reply {
    fn from(e: ListError) -> Self {
        Reply::Error(e)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(n) => write!(f, "(integer) {n}"),
            Reply::Bulk(v) => write!(f, "\"{v}\""),
            Reply::NullBulk => write!(f, "(nil)"),
            Reply::Array(items) => {
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
            Reply::NullArray => write!(f, "(nil)"),
            Reply::SimpleString(s) => write!(f, "{s}"),
            Reply::Error(e) => write!(f, "(error) {e}"),
        }
    }
}
