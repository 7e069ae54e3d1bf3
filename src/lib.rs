//! A networked tuple space in Rust.
//!
//! Many clients share one in-memory key/value store over TCP. The store
//! supports three atomic operations:
//!
//! - `READ key` returns a tuple without removing it
//! - `GET key` removes a tuple and returns it
//! - `PUT key value` inserts a tuple only if the key is absent
//!
//! Requests and replies travel as length-prefixed frames (see [`frame`]). The
//! server runs one Tokio task per connection, all of them sharing a single
//! [`tuple_space::TupleSpace`] and a single [`statistics::Statistics`].

pub mod client;
pub mod commands;
pub mod connection;
pub mod frame;
pub mod input;
pub mod server;
pub mod statistics;
pub mod tuple_space;
