//! HTTP plumbing for the backend API.
//!
//! Every request goes through [`ApiClient::send`], which attaches the
//! bearer credential and intercepts 401 globally: the stored credential is
//! cleared and the call fails with [`ClientError::SessionExpired`].

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthSession>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthSession>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<reqwest::Response> {
        let req = match self.auth.credential() {
            Some(credential) => req.bearer_auth(credential),
            None => req,
        };

        let resp = req.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("backend rejected credential; invalidating session");
            self.auth.invalidate();
            return Err(ClientError::SessionExpired);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }

        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
        resp.json().await.map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let resp = self.send(self.http.get(self.url(path)).query(query)).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(())
    }

    pub(crate) async fn post_empty(&self, path: &str) -> ClientResult<()> {
        self.send(self.http.post(self.url(path))).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let resp = self.send(self.http.put(self.url(path)).json(body)).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    /// POST returning an opaque binary body (report blobs).
    pub(crate) async fn post_bytes<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Vec<u8>> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
