//! Waiting for uploaded builds to finish processing

use tracing::{debug, info, instrument};

use crate::client::ConnectApi;
use crate::config::PollPolicy;
use crate::error::{ConnectError, Result};
use crate::types::{Build, BuildProcessingState, Platform, ValidatedBuild};

/// Most recently uploaded build for a platform
pub async fn latest_build(api: &dyn ConnectApi, app_id: &str, platform: Platform) -> Result<Build> {
    let build = api
        .latest_builds(app_id, platform)
        .await?
        .into_iter()
        .next()
        .ok_or(ConnectError::BuildNotFound(platform))?;

    debug!(
        %platform,
        build_id = %build.id,
        state = %build.processing_state,
        "latest build"
    );
    Ok(build)
}

/// Poll until the latest build of every platform is VALID
///
/// Platforms are checked in order. As soon as one is still processing the
/// poller sleeps for `policy.interval` and starts the round again from the
/// first platform, so the returned builds were all VALID in the same round.
/// FAILED and INVALID builds end the wait immediately.
#[instrument(
    skip(api, policy),
    fields(interval = ?policy.interval, max_attempts = ?policy.max_attempts)
)]
pub async fn wait_for_valid_builds(
    api: &dyn ConnectApi,
    app_id: &str,
    platforms: &[Platform],
    policy: &PollPolicy,
) -> Result<Vec<ValidatedBuild>> {
    let mut attempts: u32 = 0;

    'poll: loop {
        attempts += 1;
        let mut validated = Vec::with_capacity(platforms.len());

        for &platform in platforms {
            let build = latest_build(api, app_id, platform).await?;
            let state = build.processing_state;

            if state.is_failure() {
                return Err(ConnectError::BuildProcessingFailed {
                    build_id: build.id,
                    platform,
                    state,
                });
            }

            if state != BuildProcessingState::Valid {
                if policy.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(ConnectError::Timeout { attempts, platform });
                }
                info!("Waiting for {} build {} to become valid ({})", platform, build.id, state);
                tokio::time::sleep(policy.interval).await;
                continue 'poll;
            }

            validated.push(ValidatedBuild::new(platform, build)?);
        }

        info!(attempts, "all builds valid");
        return Ok(validated);
    }
}
