//! Clients for the nodes of the recommendation cluster.
//!
//! This crate provides the outbound side of the cluster protocol. It handles:
//! - Dispatching a scoring task to one worker, with connect retries and a
//!   read deadline (`WorkerClient`)
//! - Handing a failed worker's range to the other workers in order
//!   (`WorkerPool::reassign`)
//! - Sending a recommendation request to the master (`MasterClient`)
//! - Classifying failures into retryable and hard errors

pub mod error;
pub mod master;
pub mod pool;
pub mod worker;

pub use error::{DispatchError, MasterClientError};
pub use master::{MasterClient, MASTER_READ_DEADLINE};
pub use pool::{Reassigned, WorkerPool};
pub use worker::{RetryPolicy, WorkerClient};
