//! App Store Connect API client
//!
//! [`ConnectApi`] is the seam between the release steps and the network: the
//! steps only see decoded resources, and [`AppStoreConnect`] is the HTTP
//! implementation.

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::auth::Credential;
use crate::error::{ConnectError, Result};
use crate::types::{App, BetaGroup, Build, BuildProcessingState, Platform};

/// Production API root
pub const API_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Status codes accepted when attaching a build to a group
const ATTACH_SUCCESS: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

/// Calls the release steps need from App Store Connect
#[async_trait::async_trait]
pub trait ConnectApi: Send + Sync {
    /// Apps matching a bundle identifier
    async fn list_apps(&self, bundle_id: &str) -> Result<Vec<App>>;

    /// All builds for an app, highest version first
    async fn list_builds_by_version(&self, app_id: &str) -> Result<Vec<Build>>;

    /// The most recently uploaded build for a platform (at most one entry)
    async fn latest_builds(&self, app_id: &str, platform: Platform) -> Result<Vec<Build>>;

    /// Beta groups for an app
    async fn list_beta_groups(&self, app_id: &str) -> Result<Vec<BetaGroup>>;

    /// Attach a build to a beta group
    async fn add_build_to_group(&self, group_id: &str, build_id: &str) -> Result<()>;
}

/// HTTP client for App Store Connect
pub struct AppStoreConnect {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl AppStoreConnect {
    /// Create a client against the production API
    pub fn new(credential: Credential) -> Self {
        Self::with_base_url(credential, API_BASE_URL)
    }

    /// Create a client against another API root
    pub fn with_base_url(credential: Credential, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send an authenticated request and return the response if its status is expected
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        expected: &[StatusCode],
    ) -> Result<reqwest::Response> {
        self.credential.ensure_valid()?;
        let url = self.url(endpoint);

        debug!("API request: {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(self.credential.token())
            .header("Accept", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !expected.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// GET a JSON document
    async fn get_json<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self
            .send(Method::GET, endpoint, None, &[StatusCode::OK])
            .await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl ConnectApi for AppStoreConnect {
    async fn list_apps(&self, bundle_id: &str) -> Result<Vec<App>> {
        let response: Document<AppAttributes> = self.get_json(&endpoints::apps(bundle_id)).await?;
        Ok(response.into_apps())
    }

    async fn list_builds_by_version(&self, app_id: &str) -> Result<Vec<Build>> {
        let response: Document<BuildAttributes> =
            self.get_json(&endpoints::builds_by_version(app_id)).await?;
        Ok(response.into_builds())
    }

    async fn latest_builds(&self, app_id: &str, platform: Platform) -> Result<Vec<Build>> {
        let response: Document<BuildAttributes> = self
            .get_json(&endpoints::latest_build(app_id, platform))
            .await?;
        Ok(response.into_builds())
    }

    async fn list_beta_groups(&self, app_id: &str) -> Result<Vec<BetaGroup>> {
        let response: Document<GroupAttributes> =
            self.get_json(&endpoints::beta_groups(app_id)).await?;
        Ok(response.into_groups())
    }

    async fn add_build_to_group(&self, group_id: &str, build_id: &str) -> Result<()> {
        self.send(
            Method::POST,
            &endpoints::group_builds(group_id),
            Some(attach_body(build_id)),
            ATTACH_SUCCESS,
        )
        .await?;
        Ok(())
    }
}

/// Endpoint paths relative to the API root
pub(crate) mod endpoints {
    use crate::types::Platform;

    pub fn apps(bundle_id: &str) -> String {
        format!("/apps?filter[bundleId]={}", bundle_id)
    }

    pub fn builds_by_version(app_id: &str) -> String {
        format!("/builds?filter[app]={}&sort=-version", app_id)
    }

    pub fn latest_build(app_id: &str, platform: Platform) -> String {
        format!(
            "/builds?filter[app]={}&filter[preReleaseVersion.platform]={}&sort=-uploadedDate&limit=1",
            app_id,
            platform.as_api_str()
        )
    }

    pub fn beta_groups(app_id: &str) -> String {
        format!("/betaGroups?filter[app]={}", app_id)
    }

    pub fn group_builds(group_id: &str) -> String {
        format!("/betaGroups/{}/relationships/builds", group_id)
    }
}

fn attach_body(build_id: &str) -> serde_json::Value {
    serde_json::json!({
        "data": [
            {
                "type": "builds",
                "id": build_id
            }
        ]
    })
}

// -----------------------------------------------------------------------------
// Wire format
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct Document<A> {
    #[serde(default = "Vec::new")]
    data: Vec<Resource<A>>,
}

#[derive(Deserialize)]
struct Resource<A> {
    id: String,
    attributes: A,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppAttributes {
    bundle_id: String,
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildAttributes {
    version: String,
    processing_state: String,
    uploaded_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupAttributes {
    name: String,
    #[serde(default)]
    is_internal_group: bool,
}

impl Document<AppAttributes> {
    fn into_apps(self) -> Vec<App> {
        self.data
            .into_iter()
            .map(|r| App {
                id: r.id,
                bundle_id: r.attributes.bundle_id,
                name: r.attributes.name,
            })
            .collect()
    }
}

impl Document<BuildAttributes> {
    fn into_builds(self) -> Vec<Build> {
        self.data
            .into_iter()
            .map(|r| Build {
                id: r.id,
                version: r.attributes.version,
                processing_state: BuildProcessingState::from_str(&r.attributes.processing_state),
                uploaded_at: r
                    .attributes
                    .uploaded_date
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|d| d.with_timezone(&Utc)),
            })
            .collect()
    }
}

impl Document<GroupAttributes> {
    fn into_groups(self) -> Vec<BetaGroup> {
        self.data
            .into_iter()
            .map(|r| BetaGroup {
                id: r.id,
                name: r.attributes.name,
                is_internal: r.attributes.is_internal_group,
            })
            .collect()
    }
}
