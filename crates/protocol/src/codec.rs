//! One-shot framing over a byte stream.
//!
//! Every exchange uses its own TCP connection and carries exactly one JSON
//! document per direction. There is no length prefix: the sender writes the
//! document and half-closes its write side, the receiver reads until
//! end-of-stream. A peer that never closes is cut off by the read deadline.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Default deadline for reading a full message once connected
pub const READ_DEADLINE: Duration = Duration::from_secs(5);

/// Errors raised while moving one message across a connection
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("peer did not finish sending within {0:?}")]
    DeadlineElapsed(Duration),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl CodecError {
    /// True when the connection itself failed, as opposed to its payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, CodecError::Io(_) | CodecError::DeadlineElapsed(_))
    }
}

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(message).map_err(CodecError::Encode)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Malformed)
}

/// Write one message and half-close the write side.
pub async fn write_message<W, T>(stream: &mut W, message: &T) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let bytes = encode(message)?;
    stream.write_all(&bytes).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    debug!("wrote {} byte message", bytes.len());
    Ok(())
}

/// Read until the peer closes its write side, or fail once `deadline` passes.
pub async fn read_frame<R>(stream: &mut R, deadline: Duration) -> Result<Vec<u8>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    match tokio::time::timeout(deadline, stream.read_to_end(&mut buf)).await {
        Ok(read) => {
            read?;
            debug!("read {} byte message", buf.len());
            Ok(buf)
        }
        Err(_) => Err(CodecError::DeadlineElapsed(deadline)),
    }
}

/// Read one full message and decode it.
pub async fn read_message<R, T>(stream: &mut R, deadline: Duration) -> Result<T, CodecError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let bytes = read_frame(stream, deadline).await?;
    decode(&bytes)
}
