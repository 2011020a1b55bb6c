use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use schoolhub_core::AppError;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                out.extend(errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages.join(", ")
}

/// Turns a serde data error such as
/// `status: Invalid status. Use: ... at line 1 column 20` into the message
/// the client should see.
fn data_error_message(body_text: &str) -> String {
    let text = body_text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(body_text);
    let text = text
        .rfind(" at line ")
        .map(|idx| &text[..idx])
        .unwrap_or(text);

    match text.split_once(": ") {
        // Custom enum messages read better without the field path.
        Some((_, message)) if message.starts_with("Invalid") => message.to_string(),
        _ => text.to_string(),
    }
}

/// JSON body extractor that also runs `validator` rules.
///
/// Every rejection is a 400 with a message suitable for the envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::bad_request(anyhow!("{} is required", field));
                }

                match rejection {
                    JsonRejection::MissingJsonContentType(_) => AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    )),
                    JsonRejection::JsonDataError(_) => {
                        AppError::bad_request(anyhow!(data_error_message(&error_msg)))
                    }
                    _ => AppError::bad_request(anyhow!("Invalid request body")),
                }
            })?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(anyhow!(format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn path_error_message(rejection: &PathRejection) -> String {
    match rejection {
        PathRejection::FailedToDeserializePathParams(inner) => match inner.kind() {
            ErrorKind::ParseErrorAtKey { key, .. }
            | ErrorKind::DeserializeError { key, .. }
            | ErrorKind::InvalidUtf8InPathParam { key } => format!("Invalid {key} in path."),
            _ => "Invalid path parameter.".to_string(),
        },
        _ => "Invalid path parameter.".to_string(),
    }
}

/// Path extractor whose rejections use the JSON envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidatedPath(value)),
            Err(PathRejection::MissingPathParams(missing)) => {
                Err(AppError::internal(anyhow!(missing.body_text())))
            }
            Err(rejection) => Err(AppError::bad_request(anyhow!(path_error_message(
                &rejection
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn get_path(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn uuid_router() -> Router {
        Router::new()
            .route(
                "/items/{id}",
                get(|ValidatedPath(id): ValidatedPath<Uuid>| async move { Json(id) }),
            )
            .route(
                "/pairs/{left}/{right}",
                get(|ValidatedPath(pair): ValidatedPath<(Uuid, Uuid)>| async move { Json(pair) }),
            )
    }

    #[tokio::test]
    async fn test_valid_uuid_path_is_extracted() {
        let id = Uuid::new_v4();
        let (status, body) = get_path(uuid_router(), &format!("/items/{id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(id));
    }

    #[tokio::test]
    async fn test_malformed_uuid_path_uses_envelope() {
        let (status, body) = get_path(uuid_router(), "/items/not-a-uuid").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid"));
    }

    #[tokio::test]
    async fn test_malformed_uuid_pair_uses_envelope() {
        let id = Uuid::new_v4();
        let (status, body) = get_path(uuid_router(), &format!("/pairs/{id}/123")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_custom_enum_message_drops_field_path() {
        let raw = format!(
            "{DATA_ERROR_PREFIX}status: Invalid status. Use: Active, Completed, or Dropped. at line 1 column 19"
        );
        assert_eq!(
            data_error_message(&raw),
            "Invalid status. Use: Active, Completed, or Dropped."
        );
    }

    #[test]
    fn test_serde_message_keeps_field_path() {
        let raw = format!(
            "{DATA_ERROR_PREFIX}gender: unknown variant `other`, expected `male` or `female` at line 1 column 17"
        );
        assert_eq!(
            data_error_message(&raw),
            "gender: unknown variant `other`, expected `male` or `female`"
        );
    }
}
