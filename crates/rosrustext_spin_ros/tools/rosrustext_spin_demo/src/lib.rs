//! rosrustext_spin_demo
//!
//! Simulated multi-threaded host driving a single-threaded subscription.

pub mod config;
pub mod demo;
pub mod sim_host;
