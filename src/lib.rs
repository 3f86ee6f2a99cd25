//! Long-running collector of geotagged posts.
//!
//! Connects to a filtered streaming endpoint, keeps only posts carrying an
//! exact coordinate pair, and appends them as tab-separated rows to a
//! dataset file. Connection trouble is logged and followed by a reconnect.

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod prelude;
pub mod storage;
pub mod streaming;
