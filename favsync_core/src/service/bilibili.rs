//! Video service implementation over the bilibili web API

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, REFERER};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::{Result, ServiceError};
use super::{CollectionId, VideoService, Visibility};
use crate::ratelimit::RATE_LIMIT_STATUS;
use crate::track::{SearchCandidate, VideoId, parse_duration};

/// Default API gateway.
pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";

/// Default browser user agent; the platform rejects obviously headless ones.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

const DEFAULT_REFERER: &str = "https://www.bilibili.com";

/// Envelope code for requests blocked by the anti-automation layer. The
/// block also shows up as plain HTTP 412, depending on which tier caught it.
const BLOCKED_CODE: i64 = -412;

/// Envelope code for requests made without a valid login session.
const NOT_LOGGED_IN_CODE: i64 = -101;

const SEARCH_PATH: &str = "/x/web-interface/search/type";
const FOLDER_ADD_PATH: &str = "/x/v3/fav/folder/add";
const RESOURCE_DEAL_PATH: &str = "/x/v3/fav/resource/deal";

/// Resource type discriminator for videos in the favorites API.
const RESOURCE_TYPE_VIDEO: &str = "2";

/// Cookie pair identifying a logged-in browser session.
///
/// Read from a user-supplied JSON file and passed through verbatim;
/// `bili_jct` doubles as the CSRF token on write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    #[serde(rename = "SESSDATA")]
    pub sessdata: String,
    pub bili_jct: String,
}

/// Connection settings for [`BilibiliClient`].
#[derive(Debug, Clone)]
pub struct BilibiliConfig {
    /// Base URL of the API gateway, without a trailing slash.
    pub api_base: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Description attached to collections this client creates.
    pub collection_intro: String,
}

impl Default for BilibiliConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            collection_intro: "Imported playlist".to_string(),
        }
    }
}

/// Client for the platform's search and favorites endpoints.
pub struct BilibiliClient {
    http: reqwest::Client,
    api_base: String,
    csrf: String,
    collection_intro: String,
}

impl BilibiliClient {
    /// Build a client around a session credential.
    pub fn new(credential: &Credential, config: &BilibiliConfig) -> Result<Self> {
        let cookie = format!(
            "SESSDATA={}; bili_jct={}",
            credential.sessdata, credential.bili_jct
        );
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie).map_err(|_| {
                ServiceError::invalid_credential("cookie values contain invalid characters")
            })?,
        );
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            csrf: credential.bili_jct.clone(),
            collection_intro: config.collection_intro.clone(),
        })
    }

    async fn get_api<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiEnvelope<T>> {
        let url = format!("{}{path}", self.api_base);
        trace!("GET {url}");
        let response = self.http.get(&url).query(params).send().await?;
        decode(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>> {
        let url = format!("{}{path}", self.api_base);
        trace!("POST {url}");
        let response = self.http.post(&url).form(form).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl VideoService for BilibiliClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let params = [("search_type", "video"), ("keyword", query)];
        let envelope: ApiEnvelope<SearchData> = self.get_api(SEARCH_PATH, &params).await?;

        let hits = envelope.data.map(|data| data.result).unwrap_or_default();
        let candidates: Vec<SearchCandidate> =
            hits.into_iter().filter_map(candidate_from_hit).collect();
        debug!("Search \"{query}\" returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    async fn create_collection(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> Result<CollectionId> {
        let privacy = match visibility {
            Visibility::Public => "0",
            Visibility::Private => "1",
        };
        let form = [
            ("title", name.to_string()),
            ("intro", self.collection_intro.clone()),
            ("privacy", privacy.to_string()),
            ("csrf", self.csrf.clone()),
        ];

        let envelope: ApiEnvelope<CreatedFolder> = self.post_form(FOLDER_ADD_PATH, &form).await?;
        let folder = envelope
            .data
            .ok_or_else(|| ServiceError::unexpected("created folder response carried no id"))?;
        debug!("Created favorites collection {} (\"{name}\")", folder.id);
        Ok(CollectionId(folder.id))
    }

    async fn add_to_collection(&self, collection: CollectionId, video: VideoId) -> Result<()> {
        let form = [
            ("rid", video.to_string()),
            ("type", RESOURCE_TYPE_VIDEO.to_string()),
            ("add_media_ids", collection.to_string()),
            ("csrf", self.csrf.clone()),
        ];

        self.post_form::<serde_json::Value>(RESOURCE_DEAL_PATH, &form)
            .await?;
        trace!("Added video {video} to collection {collection}");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::from_status(status.as_u16()));
    }
    accept(response.json().await?)
}

/// Turn envelope-level error codes into typed errors.
fn accept<T>(envelope: ApiEnvelope<T>) -> Result<ApiEnvelope<T>> {
    match envelope.code {
        0 => Ok(envelope),
        BLOCKED_CODE => Err(ServiceError::RateLimited {
            status: RATE_LIMIT_STATUS,
        }),
        NOT_LOGGED_IN_CODE => Err(ServiceError::invalid_credential(envelope.message)),
        code => Err(ServiceError::api(code, envelope.message)),
    }
}

fn candidate_from_hit(hit: SearchHit) -> Option<SearchCandidate> {
    // Hits without a bvid are ads or delisted entries, not playable videos.
    if hit.bvid.is_empty() || hit.aid == 0 {
        return None;
    }
    Some(SearchCandidate {
        id: VideoId(hit.aid),
        title: strip_highlight(&hit.title),
        duration_secs: parse_duration(&hit.duration),
    })
}

/// Search titles arrive with `<em class="keyword">` markers around the
/// matched keyword; strip them so titles log and compare cleanly.
fn strip_highlight(title: &str) -> String {
    title
        .replace(r#"<em class="keyword">"#, "")
        .replace("</em>", "")
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    result: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    aid: u64,
    #[serde(default)]
    bvid: String,
    #[serde(default)]
    title: String,
    /// Duration as the platform formats it, `"4:23"` style.
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct CreatedFolder {
    id: u64,
}
