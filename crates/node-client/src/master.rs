//! Client for the master node, as used by the gateway and the CLI.

use std::time::Duration;

use data_loader::MovieCatalog;
use protocol::{codec, AggregatedResponse, Task};
use tracing::{debug, info};

use crate::error::MasterClientError;
use crate::worker::connect;

/// Default deadline for the master's answer.
///
/// Longer than a worker deadline: a single request may wait out several
/// worker retries and a reassignment before the master replies.
pub const MASTER_READ_DEADLINE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct MasterClient {
    addr: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl MasterClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: MASTER_READ_DEADLINE,
        }
    }

    /// Configure the response deadline (default: 60s)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one request and return the master's answer as-is.
    pub async fn request(&self, task: &Task) -> Result<AggregatedResponse, MasterClientError> {
        let mut stream = connect(&self.addr, self.connect_timeout)
            .await
            .map_err(|source| MasterClientError::Unreachable {
                addr: self.addr.clone(),
                source,
            })?;

        debug!(
            "Sending request for '{}' with {} candidates to master {}",
            task.target_movie.title,
            task.movies.len(),
            self.addr
        );
        codec::write_message(&mut stream, task).await?;
        let response = codec::read_message(&mut stream, self.read_timeout).await?;
        Ok(response)
    }

    /// Resolve `title` in `catalog` and ask for movies similar to it.
    ///
    /// The whole catalog is sent as the candidate set. An unknown title fails
    /// before any connection is opened; an error string from the master and
    /// an empty recommendation list are turned into errors.
    pub async fn recommend_by_title(
        &self,
        catalog: &MovieCatalog,
        title: &str,
    ) -> Result<AggregatedResponse, MasterClientError> {
        let target = catalog
            .find_by_title(title)
            .ok_or_else(|| MasterClientError::TitleNotFound(title.to_string()))?;

        info!("Requesting recommendations for '{}' (id {})", target.title, target.id);
        let task = Task::new(target.clone(), catalog.movies().to_vec());
        let response = self.request(&task).await?;

        if response.is_error() {
            return Err(MasterClientError::Remote(response.error));
        }
        if response.movie_response.is_empty() {
            return Err(MasterClientError::NoRecommendations);
        }
        Ok(response)
    }
}
