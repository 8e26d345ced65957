//! Errors raised by the node clients.

use protocol::CodecError;
use thiserror::Error;

/// Why a range could not be scored by a worker.
///
/// `Unreachable` and `Transport` mean the node (or the path to it) failed and
/// another node may succeed. `Protocol` means the node answered with
/// something unusable; sending the same task elsewhere in the same way is
/// not attempted.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("worker {node} unreachable after {attempts} attempt(s): {source}")]
    Unreachable {
        node: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("lost connection to worker {node}: {source}")]
    Transport {
        node: String,
        #[source]
        source: CodecError,
    },

    #[error("worker {node} sent an unusable response: {source}")]
    Protocol {
        node: String,
        #[source]
        source: CodecError,
    },

    #[error("no worker could take over the range of failed worker {failed}")]
    Exhausted { failed: String },
}

impl DispatchError {
    /// Whether the range should be offered to another worker
    pub fn is_reassignable(&self) -> bool {
        matches!(
            self,
            DispatchError::Unreachable { .. } | DispatchError::Transport { .. }
        )
    }

    pub(crate) fn from_codec(node: &str, source: CodecError) -> Self {
        if source.is_transport() {
            DispatchError::Transport {
                node: node.to_string(),
                source,
            }
        } else {
            DispatchError::Protocol {
                node: node.to_string(),
                source,
            }
        }
    }
}

/// Failures seen by a caller of the master node.
///
/// The `Display` text is what ends up in front of a user, so it stays short.
#[derive(Error, Debug)]
pub enum MasterClientError {
    #[error("movie '{0}' not found")]
    TitleNotFound(String),

    #[error("failed to connect to the master node at {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to exchange messages with the master node: {0}")]
    Transport(#[source] CodecError),

    #[error("master node sent an unusable response: {0}")]
    Protocol(#[source] CodecError),

    #[error("{0}")]
    Remote(String),

    #[error("no recommendations found")]
    NoRecommendations,
}

impl From<CodecError> for MasterClientError {
    fn from(err: CodecError) -> Self {
        if err.is_transport() {
            MasterClientError::Transport(err)
        } else {
            MasterClientError::Protocol(err)
        }
    }
}
