//! Server crate for the ReelRecs cluster.
//!
//! This crate contains both node roles:
//! - **master**: accepts requests, fans each one out over the workers
//!   through the `Coordinator` and answers with the top recommendations
//! - **worker**: scores the candidate range it is sent
//!
//! plus the master's `ClusterConfig`.

pub mod config;
pub mod coordinator;
mod listener;
pub mod master;
pub mod worker;

pub use config::{ClusterConfig, ConfigError};
pub use coordinator::Coordinator;
pub use master::{MasterNode, DECODE_FAILURE};
pub use worker::WorkerNode;
