//! Build number lookup

use tracing::{debug, info, warn};

use crate::client::ConnectApi;
use crate::error::{ConnectError, Result};

/// Highest build number uploaded for an app
///
/// The API is asked to sort by descending version, but the maximum is taken
/// over every returned build rather than trusting the order. Builds whose
/// version is not a plain integer (legacy dotted numbers like `1.0.3`) are
/// skipped; if none is numeric the first one's error is returned.
pub async fn current_version(api: &dyn ConnectApi, app_id: &str) -> Result<u64> {
    let builds = api.list_builds_by_version(app_id).await?;
    debug!(app_id, count = builds.len(), "fetched builds");

    let mut highest: Option<u64> = None;
    let mut first_invalid: Option<ConnectError> = None;
    for build in &builds {
        match build.version_number() {
            Ok(version) => highest = Some(highest.map_or(version, |h| h.max(version))),
            Err(err) => {
                warn!(
                    build_id = %build.id,
                    version = %build.version,
                    "skipping non-numeric build version"
                );
                first_invalid.get_or_insert(err);
            }
        }
    }

    let version = match (highest, first_invalid) {
        (Some(version), _) => version,
        (None, Some(err)) => return Err(err),
        (None, None) => return Err(ConnectError::NoPriorBuilds(app_id.to_string())),
    };
    info!(app_id, version, "current build version");
    Ok(version)
}

/// The build number the next upload should carry
pub async fn next_version(api: &dyn ConnectApi, app_id: &str) -> Result<u64> {
    Ok(current_version(api, app_id).await? + 1)
}
