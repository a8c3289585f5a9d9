use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::Context;

use super::{flash, templates};
use crate::error::Error;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::ConstraintViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) | Error::Template(_) | Error::Items(_) | Error::Pdf(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// HTML error page for a failed request
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // internal details stay in the log
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Something went wrong on our side.".to_string()
        } else {
            tracing::debug!(error = %self, "request rejected");
            self.to_string()
        };

        let mut context = Context::new();
        context.insert("flash", &None::<&str>);
        context.insert("status", &status.as_u16());
        context.insert("message", &message);

        let mut response = match templates::render("error.html", &context) {
            Ok(page) => (status, page).into_response(),
            Err(_) => (status, Html(status.to_string())).into_response(),
        };
        flash::discard(&mut response);
        response
    }
}
