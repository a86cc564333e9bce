//! In-memory [`ConnectApi`] used by the unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::client::ConnectApi;
use crate::error::{ConnectError, Result};
use crate::types::{App, BetaGroup, Build, BuildProcessingState, Platform};

/// A recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListApps(String),
    ListBuilds(String),
    Latest(Platform),
    ListGroups(String),
    Attach { group: String, build: String },
}

#[derive(Default)]
pub(crate) struct FakeConnect {
    pub apps: Vec<App>,
    pub builds: Vec<Build>,
    pub groups: Vec<BetaGroup>,
    /// Successive answers per platform; the last one repeats
    latest: Mutex<HashMap<Platform, VecDeque<Build>>>,
    /// (group, build) pair whose attach call returns HTTP 500
    fail_attach: Option<(String, String)>,
    calls: Mutex<Vec<Call>>,
}

impl FakeConnect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, id: &str, bundle_id: &str) -> Self {
        self.apps.push(App {
            id: id.to_string(),
            bundle_id: bundle_id.to_string(),
            name: None,
        });
        self
    }

    pub fn with_versions(mut self, versions: &[&str]) -> Self {
        self.builds = versions
            .iter()
            .enumerate()
            .map(|(i, v)| build(&format!("build-{}", i), v, BuildProcessingState::Valid))
            .collect();
        self
    }

    pub fn with_group(mut self, id: &str, is_internal: bool) -> Self {
        self.groups.push(BetaGroup {
            id: id.to_string(),
            name: format!("Group {}", id),
            is_internal,
        });
        self
    }

    /// Queue processing states returned for a platform's latest build
    pub fn with_states(
        self,
        platform: Platform,
        build_id: &str,
        states: &[BuildProcessingState],
    ) -> Self {
        {
            let mut latest = self.latest.lock().unwrap();
            let queue = latest.entry(platform).or_default();
            for state in states {
                queue.push_back(build(build_id, "1", *state));
            }
        }
        self
    }

    pub fn failing_attach(mut self, group: &str, build: &str) -> Self {
        self.fail_attach = Some((group.to_string(), build.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attach_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Attach { group, build } => Some((group, build)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn build(id: &str, version: &str, state: BuildProcessingState) -> Build {
    Build {
        id: id.to_string(),
        version: version.to_string(),
        processing_state: state,
        uploaded_at: None,
    }
}

#[async_trait::async_trait]
impl ConnectApi for FakeConnect {
    async fn list_apps(&self, bundle_id: &str) -> Result<Vec<App>> {
        self.record(Call::ListApps(bundle_id.to_string()));
        Ok(self
            .apps
            .iter()
            .filter(|a| a.bundle_id == bundle_id)
            .cloned()
            .collect())
    }

    async fn list_builds_by_version(&self, app_id: &str) -> Result<Vec<Build>> {
        self.record(Call::ListBuilds(app_id.to_string()));
        Ok(self.builds.clone())
    }

    async fn latest_builds(&self, _app_id: &str, platform: Platform) -> Result<Vec<Build>> {
        self.record(Call::Latest(platform));
        let mut latest = self.latest.lock().unwrap();
        let Some(queue) = latest.get_mut(&platform) else {
            return Ok(Vec::new());
        };
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(next.into_iter().collect())
    }

    async fn list_beta_groups(&self, app_id: &str) -> Result<Vec<BetaGroup>> {
        self.record(Call::ListGroups(app_id.to_string()));
        Ok(self.groups.clone())
    }

    async fn add_build_to_group(&self, group_id: &str, build_id: &str) -> Result<()> {
        self.record(Call::Attach {
            group: group_id.to_string(),
            build: build_id.to_string(),
        });
        if let Some((group, build)) = &self.fail_attach {
            if group == group_id && build == build_id {
                return Err(ConnectError::ApiError {
                    status: 500,
                    body: "{\"errors\":[{\"status\":\"500\",\"code\":\"UNEXPECTED_ERROR\"}]}"
                        .to_string(),
                });
            }
        }
        Ok(())
    }
}
