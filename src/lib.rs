//! ipwatch: public IPv4 change notifier
//!
//! A library for watching the public IPv4 address of this machine through
//! external lookup services and announcing every change to a recipient.

pub mod config;
pub mod monitor;
pub mod network;
pub mod notify;
pub mod time;
pub mod transport;
