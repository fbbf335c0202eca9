//! API client and the shared request/pagination plumbing
//!
//! Resource accessors live in [`crate::resources`] and the polling waiters
//! in [`crate::waiter`]; both are `impl Client` blocks built on the helpers
//! defined here.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::progress::{NoProgress, ProgressObserver};
use crate::request::ApiRequest;
use crate::response::{self, Decoded};
use crate::transport::{HttpTransport, Transport};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Client for the stack management API
///
/// Cheap to clone; all clones share the same immutable configuration,
/// transport and progress observer, so one client can serve many concurrent
/// call chains.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    progress: Arc<dyn ProgressObserver>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client that talks HTTP through reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client from `STACKPORT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            progress: Arc::new(NoProgress),
        }
    }

    /// Report waiter progress to `observer`
    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = observer;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn progress(&self) -> &dyn ProgressObserver {
        self.progress.as_ref()
    }

    /// Build a request bound to this client's base URL and credentials
    pub fn new_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<ApiRequest>
    where
        B: Serialize + ?Sized,
    {
        ApiRequest::build(&self.config, method, path, body, query)
    }

    /// Execute a built request and decode the envelope payload
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Decoded<T>> {
        debug!("{}", request.describe());
        let raw = self.transport.execute(request.clone()).await?;
        debug!(status = raw.status, bytes = raw.body.len(), "{}", request.describe());
        response::decode(&request, &raw)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.new_request(Method::GET, path, None::<&()>, &[])?;
        Ok(self.execute(request).await?.value)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(method, path, Some(body), &[])?;
        Ok(self.execute(request).await?.value)
    }

    /// Fetch every page of a collection endpoint, in server order.
    ///
    /// Starts at page 1 and follows the cursor while `next > current`. Any
    /// failing page aborts the whole listing.
    pub async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut page: u32 = 1;
        let mut fetched: u32 = 0;
        let mut result = Vec::new();

        loop {
            fetched += 1;
            let request = self.new_request(
                Method::GET,
                path,
                None::<&()>,
                &[("page", page.to_string())],
            )?;
            let decoded: Decoded<Vec<T>> = self.execute(request).await?;
            result.extend(decoded.value);

            match decoded.pagination {
                Some(cursor) if cursor.has_more() => page = cursor.next,
                _ => break,
            }
        }

        debug!(path, pages = fetched, items = result.len(), "listing complete");
        Ok(result)
    }

    /// Fetch every page, then keep only the items matching `filter`
    pub async fn list_filtered<T, F>(&self, path: &str, filter: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let items: Vec<T> = self.list_all(path).await?;
        Ok(items.into_iter().filter(|item| filter(item)).collect())
    }
}
