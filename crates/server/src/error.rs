use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ronja_core::errors::{ApplicationError, DomainError, InterfaceError};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

/// An `InterfaceError` on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        let error = InterfaceError::ServiceUnavailable {
            message: message.into(),
            correlation_id: correlation_id(),
        };
        log(&error);
        Self(error)
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
            InterfaceError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn log(error: &InterfaceError) {
    match error {
        InterfaceError::BadRequest { .. }
        | InterfaceError::NotFound { .. }
        | InterfaceError::Conflict { .. } => warn!(
            event_name = "http.request.rejected",
            correlation_id = error.correlation_id(),
            error = %error,
            "request rejected"
        ),
        _ => error!(
            event_name = "http.request.failed",
            correlation_id = error.correlation_id(),
            error = %error,
            "request failed"
        ),
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        let error = value.into_interface(correlation_id());
        log(&error);
        Self(error)
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        ApplicationError::from(value).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        DomainError::Validation(value.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        DomainError::Validation(value.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        DomainError::Validation(value.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Missing records answer with an empty body.
        if status == StatusCode::NOT_FOUND {
            return status.into_response();
        }

        let error = match &self.0 {
            InterfaceError::BadRequest { message, .. } | InterfaceError::Conflict { message, .. } => {
                message.clone()
            }
            other => other.user_message().to_string(),
        };
        let body = ErrorBody { error, correlation_id: self.0.correlation_id().to_string() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use ronja_core::domain::EntityId;
    use ronja_core::errors::{ApplicationError, DomainError};

    use super::ApiError;

    #[test]
    fn not_found_has_empty_body() {
        let response =
            ApiError::from(ApplicationError::not_found("customer", EntityId(3))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn persistence_failure_is_service_unavailable() {
        let error = ApiError::from(ApplicationError::Persistence("pool timed out".into()));
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn every_error_gets_its_own_correlation_id() {
        let first = ApiError::from(DomainError::Validation("a".into()));
        let second = ApiError::from(DomainError::Validation("a".into()));
        assert_ne!(first.0.correlation_id(), second.0.correlation_id());
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);
    }
}
