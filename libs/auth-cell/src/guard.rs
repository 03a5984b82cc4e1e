use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use shared_utils::extractor::original_path;

use crate::services::session::ProfileSession;

pub const LOGIN_PATH: &str = "/login";

/// Route guard for pages that need a profile. Without one the attempted path
/// is remembered and the client is sent to the login page.
pub async fn require_profile(
    State(session): State<Arc<ProfileSession>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(profile) = session.current().await else {
        let path = original_path(&request);
        debug!("No profile, redirecting {} to login", path);

        session.remember_destination(&path).await;
        return Redirect::to(&login_redirect(&path)).into_response();
    };

    request.extensions_mut().insert(profile);
    next.run(request).await
}

pub fn login_redirect(from: &str) -> String {
    format!("{}?from={}", LOGIN_PATH, urlencoding::encode(from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_destination() {
        assert_eq!(login_redirect("/symptom-checker"), "/login?from=%2Fsymptom-checker");
        assert_eq!(
            login_redirect("/symptom-checker/sessions?lat=1&lon=2#top"),
            "/login?from=%2Fsymptom-checker%2Fsessions%3Flat%3D1%26lon%3D2%23top"
        );
    }
}
