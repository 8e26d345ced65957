//! Wire protocol shared by the gateway, the master and the worker nodes.
//!
//! - **messages**: `Task`, `SimilarityResult`, `EnrichedMovie`,
//!   `AggregatedResponse`
//! - **codec**: JSON encoding plus read-until-close framing with a deadline
//!
//! ## Example Usage
//!
//! ```ignore
//! use protocol::{codec, Task, SimilarityResult, READ_DEADLINE};
//!
//! let mut stream = tokio::net::TcpStream::connect("worker1:8082").await?;
//! codec::write_message(&mut stream, &Task::new(target, candidates)).await?;
//! let scores: Vec<SimilarityResult> = codec::read_message(&mut stream, READ_DEADLINE).await?;
//! ```

pub mod codec;
pub mod messages;

pub use codec::{CodecError, READ_DEADLINE};
pub use messages::{AggregatedResponse, EnrichedMovie, SimilarityResult, Task};
