//! Avatar download and change detection.

use crate::{PuppetError, Result as PuppetErrorResult};

use mp_core::BridgeMode;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use url::Url;

/// Browser user agent sent with avatar downloads; the CDN rejects obvious bots.
pub const AVATAR_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[async_trait]
pub trait AvatarSource: Send + Sync {
    async fn download(&self, url: &str) -> PuppetErrorResult<Vec<u8>>;
}

/// Downloads avatars from the remote network's CDN.
pub struct HttpAvatarSource {
    client: ReqwestClient,
    referer: &'static str,
}

impl HttpAvatarSource {
    pub fn new(mode: BridgeMode, timeout: Duration) -> PuppetErrorResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PuppetError::remote_fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            referer: mode.avatar_referer(),
        })
    }
}

#[async_trait]
impl AvatarSource for HttpAvatarSource {
    async fn download(&self, url: &str) -> PuppetErrorResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("Sec-Fetch-Dest", "image")
            .header("Sec-Fetch-Mode", "no-cors")
            .header("Sec-Fetch-Site", "cross-site")
            .header(REFERER, self.referer)
            .header(ACCEPT, "image/avif,image/webp,*/*")
            .header(USER_AGENT, AVATAR_USER_AGENT)
            .send()
            .await
            .map_err(|e| PuppetError::remote_fetch(format!("failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PuppetError::remote_fetch(format!(
                "unexpected status code {}",
                status.as_u16()
            )));
        }

        let data = response.bytes().await.map_err(|e| {
            PuppetError::remote_fetch(format!("failed to read response data: {e}"))
        })?;

        Ok(data.to_vec())
    }
}

/// Project an avatar URL onto a token that changes when the image does.
///
/// This is the final path segment of the URL, which the remote CDN derives
/// from the image itself. Query strings (signatures, expiry) are ignored. An
/// empty URL means "no avatar" and yields an empty fingerprint.
pub fn avatar_fingerprint(avatar_url: &str) -> String {
    if avatar_url.is_empty() {
        return String::new();
    }

    let basename = Url::parse(avatar_url).ok().and_then(|url| {
        url.path()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    });

    basename.unwrap_or_else(|| avatar_url.to_string())
}

/// Sniff an image content type from its leading bytes.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', ..] => "image/png",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [_, _, _, _, b'f', b't', b'y', b'p', b'a', b'v', b'i', b'f', ..] => "image/avif",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        _ => "application/octet-stream",
    }
}
