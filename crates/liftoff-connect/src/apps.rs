//! App lookup by bundle identifier

use tracing::{info, warn};

use crate::client::ConnectApi;
use crate::error::{ConnectError, Result};
use crate::types::App;

/// Resolve the App Store Connect app for a bundle identifier
///
/// The first match wins. Bundle identifiers are unique per account, so more
/// than one match is only logged.
pub async fn resolve_app(api: &dyn ConnectApi, bundle_id: &str) -> Result<App> {
    let mut apps = api.list_apps(bundle_id).await?;

    if apps.len() > 1 {
        warn!(
            bundle_id,
            matches = apps.len(),
            "multiple apps match bundle ID, using the first"
        );
    }

    if apps.is_empty() {
        return Err(ConnectError::AppNotFound(bundle_id.to_string()));
    }
    let app = apps.swap_remove(0);

    info!(bundle_id, app_id = %app.id, "resolved app");
    Ok(app)
}
