//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - One thread per connection
//! - Commands routed through the shared Engine

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
