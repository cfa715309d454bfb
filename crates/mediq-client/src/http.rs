//! Shared HTTP response helpers.
//!
//! Centralizes the status-code check so endpoint modules stay focused on
//! request construction and response mapping.

use crate::error::ClientError;

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. Otherwise the body is read and
/// parsed into [`ClientError::Api`] with the status mapped onto the error
/// taxonomy.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let error = ClientError::api(status.as_u16(), &body);
    tracing::debug!(status = status.as_u16(), kind = %error.kind(), "backend returned an error");
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediq_core::ErrorKind;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
        assert!(check_response(mock_response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let err = check_response(mock_response(401, r#"{"detail":"Not authenticated"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(err.detail_message(), Some("Not authenticated"));
    }

    #[tokio::test]
    async fn validation_body_is_parsed() {
        let err = check_response(mock_response(
            422,
            r#"{"detail":{"message":"date_from must be before date_to"}}"#,
        ))
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api {
                kind: ErrorKind::ValidationError,
                status: 422,
                ..
            }
        ));
        assert_eq!(err.detail_message(), Some("date_from must be before date_to"));
    }

    #[tokio::test]
    async fn bad_gateway_is_server_error() {
        let err = check_response(mock_response(502, "")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }

    #[tokio::test]
    async fn not_found_is_unknown_error() {
        let err = check_response(mock_response(404, r#"{"detail":"Not Found"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
    }
}
