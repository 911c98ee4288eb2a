//! Client-server API calls made on behalf of puppets.
//!
//! The bridge authenticates with its appservice token and picks the acting
//! user through the `user_id` query parameter, so one client serves every
//! puppet.

use crate::{ProfileWriter, PuppetError, Result as PuppetErrorResult};

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

pub const PROFILE_METADATA_FEATURE: &str = "com.beeper.arbitrary_profile_meta";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    content_uri: String,
}

#[derive(Debug, Default, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    unstable_features: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    errcode: Option<String>,
    error: Option<String>,
}

pub struct HomeserverClient {
    base_url: Url,
    as_token: String,
    client: ReqwestClient,
}

impl HomeserverClient {
    pub fn new(address: &str, as_token: &str, timeout: Duration) -> PuppetErrorResult<Self> {
        let base_url = Url::parse(address).map_err(|e| {
            PuppetError::invalid_argument(format!("invalid homeserver address {address}: {e}"))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(PuppetError::invalid_argument(format!(
                "homeserver address {address} cannot be used as a base URL"
            )));
        }

        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PuppetError::local_write(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            as_token: as_token.to_string(),
            client,
        })
    }

    /// Ask the homeserver whether profiles accept arbitrary fields.
    pub async fn supports_profile_metadata(&self) -> PuppetErrorResult<bool> {
        let url = self.url(&["_matrix", "client", "versions"], None)?;
        let response = self.execute(self.client.get(url)).await?;

        let versions: VersionsResponse = response
            .json()
            .await
            .map_err(|e| PuppetError::local_write(format!("invalid versions response: {e}")))?;

        Ok(versions
            .unstable_features
            .get(PROFILE_METADATA_FEATURE)
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    fn url(&self, segments: &[&str], user_id: Option<&str>) -> PuppetErrorResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PuppetError::invalid_argument("homeserver address has no path"))?
            .pop_if_empty()
            .extend(segments);

        if let Some(user_id) = user_id {
            url.query_pairs_mut().append_pair("user_id", user_id);
        }

        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        user_id: &str,
    ) -> PuppetErrorResult<RequestBuilder> {
        let url = self.url(segments, Some(user_id))?;
        Ok(self.client.request(method, url))
    }

    async fn execute(&self, req: RequestBuilder) -> PuppetErrorResult<Response> {
        let response = req
            .bearer_auth(&self.as_token)
            .send()
            .await
            .map_err(|e| PuppetError::local_write(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorResponse = response.json().await.unwrap_or_default();
        Err(PuppetError::local_write(format!(
            "HTTP {}: {} {}",
            status.as_u16(),
            body.errcode.as_deref().unwrap_or("M_UNKNOWN"),
            body.error.as_deref().unwrap_or("")
        )))
    }
}

#[async_trait]
impl ProfileWriter for HomeserverClient {
    async fn set_display_name(&self, user_id: &str, name: &str) -> PuppetErrorResult<()> {
        let req = self.request(
            Method::PUT,
            &["_matrix", "client", "v3", "profile", user_id, "displayname"],
            user_id,
        )?;
        self.execute(req.json(&json!({ "displayname": name }))).await?;
        debug!("Set display name of {user_id}");
        Ok(())
    }

    async fn set_avatar_url(&self, user_id: &str, content_uri: &str) -> PuppetErrorResult<()> {
        let req = self.request(
            Method::PUT,
            &["_matrix", "client", "v3", "profile", user_id, "avatar_url"],
            user_id,
        )?;
        self.execute(req.json(&json!({ "avatar_url": content_uri }))).await?;
        Ok(())
    }

    async fn upload_media(
        &self,
        user_id: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> PuppetErrorResult<String> {
        let req = self.request(Method::POST, &["_matrix", "media", "v3", "upload"], user_id)?;
        let response = self
            .execute(req.header(CONTENT_TYPE, content_type).body(data))
            .await?;

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| PuppetError::local_write(format!("invalid upload response: {e}")))?;

        Ok(upload.content_uri)
    }

    async fn set_profile_metadata(&self, user_id: &str, metadata: &Value) -> PuppetErrorResult<()> {
        let req = self.request(
            Method::PATCH,
            &["_matrix", "client", "v3", "profile", user_id],
            user_id,
        )?;
        self.execute(req.json(metadata)).await?;
        Ok(())
    }
}
