use axum::Json;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::utils::escape_html;

#[derive(Debug)]
pub enum AppError {
    UserNotFound(String),
    InternalServerError,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UserNotFound(username) => (
                StatusCode::NOT_FOUND,
                Html(format!("<h2>User {} not found</h2>", escape_html(&username))),
            )
                .into_response(),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error",
                }),
            )
                .into_response(),
        }
    }
}
