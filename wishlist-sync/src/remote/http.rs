/// reqwest-backed transport for the hosted key-value store.
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};

use super::{KvResponse, KvTransport, RemoteError};

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn into_response(resp: reqwest::Response) -> Result<KvResponse, RemoteError> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("Read body failed: {}", e)))?;
        Ok(KvResponse { status, body })
    }
}

impl KvTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<KvResponse, RemoteError> {
        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("GET {} failed: {}", url, e)))?;
        Self::into_response(resp).await
    }

    async fn post(&self, url: &str, body: String) -> Result<KvResponse, RemoteError> {
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("POST {} failed: {}", url, e)))?;
        Self::into_response(resp).await
    }
}
