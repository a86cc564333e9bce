//! Distributing validated builds to external beta groups

use serde::Serialize;
use tracing::{info, instrument};

use crate::client::ConnectApi;
use crate::error::Result;
use crate::types::{BetaGroup, Platform, ValidatedBuild};

/// One build-to-group link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub group_id: String,
    pub group_name: String,
    pub build_id: String,
    pub platform: Platform,
}

/// Links made (or, for a dry run, planned) by a distribution
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionReport {
    pub dry_run: bool,
    pub attachments: Vec<Attachment>,
}

/// Beta groups eligible for distribution, i.e. the external ones
pub async fn external_groups(api: &dyn ConnectApi, app_id: &str) -> Result<Vec<BetaGroup>> {
    let groups: Vec<BetaGroup> = api
        .list_beta_groups(app_id)
        .await?
        .into_iter()
        .filter(|g| !g.is_internal)
        .collect();

    info!(app_id, count = groups.len(), "found external beta groups");
    Ok(groups)
}

/// Every (group, build) link, groups outermost, builds in platform order
pub fn plan(groups: &[BetaGroup], builds: &[ValidatedBuild]) -> Vec<Attachment> {
    groups
        .iter()
        .flat_map(|group| {
            builds.iter().map(move |build| Attachment {
                group_id: group.id.clone(),
                group_name: group.name.clone(),
                build_id: build.id().to_string(),
                platform: build.platform,
            })
        })
        .collect()
}

/// Attach each build to each group
///
/// Stops at the first failed call. Links made before it are left in place.
#[instrument(skip_all, fields(groups = groups.len(), builds = builds.len()))]
pub async fn distribute(
    api: &dyn ConnectApi,
    groups: &[BetaGroup],
    builds: &[ValidatedBuild],
) -> Result<DistributionReport> {
    let mut report = DistributionReport::default();

    for attachment in plan(groups, builds) {
        info!(
            "Adding {} build {} to {}",
            attachment.platform, attachment.build_id, attachment.group_name
        );
        api.add_build_to_group(&attachment.group_id, &attachment.build_id)
            .await?;
        report.attachments.push(attachment);
    }

    Ok(report)
}
