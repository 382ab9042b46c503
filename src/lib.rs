//! In-memory data-structure core of a Redis-like List type: a packed
//! byte-blob representation for small lists, a pointer-based doubly linked
//! list once they outgrow it, a facade that hides which is active, and a
//! blocking-pop coordinator for BLPOP/BRPOP/BRPOPLPUSH.

pub mod blocking;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod demo_engine;
pub mod error;
pub mod linked_list;
pub mod list_object;
pub mod listpack;
pub mod logging;
pub mod reply;
pub mod value;

pub use blocking::BlockingCoordinator;
pub use config::ListConfig;
pub use database::Database;
pub use error::{ListError, ListResult};
pub use list_object::{End, ListObject};
pub use reply::Reply;
pub use value::RedisValue;
