//! The two release flows: bumping the build number and shipping to testers

use tracing::info;

use crate::apps::resolve_app;
use crate::bump::{BumpOutput, VersionBumper};
use crate::client::ConnectApi;
use crate::config::PollPolicy;
use crate::distributor::{distribute, external_groups, plan, DistributionReport};
use crate::error::{ConnectError, Result};
use crate::poller::wait_for_valid_builds;
use crate::types::{App, Platform};
use crate::versions::next_version;

/// Release steps for one app, sharing a client for the whole run
pub struct Release<'a> {
    api: &'a dyn ConnectApi,
    app: App,
}

/// Options for [`Release::release_to_testers`]
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    pub platforms: Vec<Platform>,
    pub poll: PollPolicy,
    pub dry_run: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            poll: PollPolicy::default(),
            dry_run: false,
        }
    }
}

impl<'a> Release<'a> {
    /// Resolve the app for `bundle_id`
    pub async fn for_bundle(api: &'a dyn ConnectApi, bundle_id: &str) -> Result<Release<'a>> {
        let app = resolve_app(api, bundle_id).await?;
        Ok(Self { api, app })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Build number the next upload should carry
    pub async fn next_version(&self) -> Result<u64> {
        next_version(self.api, &self.app.id).await
    }

    /// Compute the next build number and apply it with the version tool
    pub async fn bump_version(&self, bumper: &VersionBumper) -> Result<BumpOutput> {
        let version = self.next_version().await?;
        bumper.bump(version).await
    }

    /// Wait for the latest builds to become valid and attach them to every
    /// external beta group
    pub async fn release_to_testers(&self, options: &ReleaseOptions) -> Result<DistributionReport> {
        if options.platforms.is_empty() {
            return Err(ConnectError::ConfigurationError(
                "at least one platform is required".to_string(),
            ));
        }

        let groups = external_groups(self.api, &self.app.id).await?;
        let builds =
            wait_for_valid_builds(self.api, &self.app.id, &options.platforms, &options.poll)
                .await?;

        if options.dry_run {
            info!("Dry run - not attaching builds");
            return Ok(DistributionReport {
                dry_run: true,
                attachments: plan(&groups, &builds),
            });
        }

        distribute(self.api, &groups, &builds).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeConnect};
    use crate::types::BuildProcessingState::{Processing, Valid};
    use std::time::Duration;

    fn api() -> FakeConnect {
        FakeConnect::new()
            .with_app("1500", "com.example.app")
            .with_versions(&["12", "11"])
            .with_group("internal", true)
            .with_group("external", false)
            .with_states(Platform::Ios, "ios-12", &[Processing, Valid])
            .with_states(Platform::MacOs, "mac-12", &[Valid])
    }

    fn options(dry_run: bool) -> ReleaseOptions {
        ReleaseOptions {
            poll: PollPolicy::new(Duration::from_secs(10), 0),
            dry_run,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_next_version() {
        let api = api();
        let release = Release::for_bundle(&api, "com.example.app").await.unwrap();
        assert_eq!(release.app().id, "1500");
        assert_eq!(release.next_version().await.unwrap(), 13);
    }

    #[tokio::test]
    async fn test_unknown_bundle() {
        let api = api();
        let result = Release::for_bundle(&api, "com.example.missing").await;
        assert!(matches!(result, Err(ConnectError::AppNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_to_testers() {
        let api = api();
        let release = Release::for_bundle(&api, "com.example.app").await.unwrap();

        let report = release.release_to_testers(&options(false)).await.unwrap();

        let attached: Vec<_> = report
            .attachments
            .iter()
            .map(|a| (a.group_id.as_str(), a.build_id.as_str()))
            .collect();
        assert_eq!(attached, vec![("external", "ios-12"), ("external", "mac-12")]);
        assert_eq!(api.attach_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_dry_run_does_not_attach() {
        let api = api();
        let release = Release::for_bundle(&api, "com.example.app").await.unwrap();

        let report = release.release_to_testers(&options(true)).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.attachments.len(), 2);
        assert!(!api
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Attach { .. })));
    }

    #[tokio::test]
    async fn test_release_requires_platform() {
        let api = api();
        let release = Release::for_bundle(&api, "com.example.app").await.unwrap();
        let options = ReleaseOptions {
            platforms: Vec::new(),
            ..options(false)
        };
        assert!(matches!(
            release.release_to_testers(&options).await,
            Err(ConnectError::ConfigurationError(_))
        ));
    }
}
