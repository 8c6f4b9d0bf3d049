use std::time::Duration;

use meterbook_core::{CoreError, SyncAction, SyncRequest, SyncResponse, SyncTransport};
use tracing::{debug, instrument};
use ureq::Agent;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP transport: `test` and `load` are GET requests carrying the
/// action as a query parameter, `save` POSTs the JSON request body.
pub struct HttpSyncTransport {
    client: Agent,
    url: String,
}

impl HttpSyncTransport {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Agent::config_builder()
            .timeout_global(Some(TIMEOUT))
            .build()
            .into();
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn exchange(&self, request: &SyncRequest<'_>) -> Result<SyncResponse, ureq::Error> {
        let mut response = match request.action {
            SyncAction::Save => self.client.post(&self.url).send_json(request)?,
            SyncAction::Test | SyncAction::Load => self
                .client
                .get(&self.url)
                .query("action", request.action.key())
                .call()?,
        };
        response.body_mut().read_json::<SyncResponse>()
    }
}

impl SyncTransport for HttpSyncTransport {
    #[instrument(skip_all, fields(action = request.action.key()))]
    fn send(&self, request: &SyncRequest<'_>) -> Result<SyncResponse, CoreError> {
        debug!(url = %self.url, "sending sync request");
        self.exchange(request)
            .map_err(|err| CoreError::Sync(format!("{}: {}", self.url, err)))
    }
}
