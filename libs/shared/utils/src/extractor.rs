use axum::{
    extract::OriginalUri,
    http::Request,
};

use shared_models::auth::UserProfile;
use shared_models::error::AppError;

// Function to extract the signed-in profile from request extensions (set by the route guard)
pub fn extract_profile<B>(request: &Request<B>) -> Result<UserProfile, AppError> {
    request
        .extensions()
        .get::<UserProfile>()
        .cloned()
        .ok_or_else(|| AppError::Auth("No profile in request extensions - is the route guarded?".to_string()))
}

/// Full path and query the client asked for, even inside a nested router
/// where the request URI has had its prefix stripped.
pub fn original_path<B>(request: &Request<B>) -> String {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_extract_profile_present() {
        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(UserProfile::new("Jo", "jo@x.com"));

        let profile = extract_profile(&request).unwrap();
        assert_eq!(profile.email, "jo@x.com");
    }

    #[test]
    fn test_extract_profile_missing() {
        let request = Request::new(Body::empty());
        assert_matches!(extract_profile(&request), Err(AppError::Auth(_)));
    }

    #[test]
    fn test_original_path_prefers_original_uri() {
        let mut request = Request::builder()
            .uri("/sessions")
            .body(Body::empty())
            .unwrap();
        assert_eq!(original_path(&request), "/sessions");

        request
            .extensions_mut()
            .insert(OriginalUri("/symptom-checker/sessions".parse().unwrap()));
        assert_eq!(original_path(&request), "/symptom-checker/sessions");
    }

    #[test]
    fn test_original_path_keeps_query() {
        let request = Request::builder()
            .uri("/symptom-checker/sessions?lat=1&lon=2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(original_path(&request), "/symptom-checker/sessions?lat=1&lon=2");
    }
}
