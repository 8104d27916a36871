//! Lyrics search over HTTP, backed by the `syncedlyrics` command line tool.

pub mod backend;
pub mod config;
pub mod lyrics;
pub mod pinger;
pub mod server;
