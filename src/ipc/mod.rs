//! IPC module for assistant-UI communication

mod protocol;
mod server;

pub use server::Server;
