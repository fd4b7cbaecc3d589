use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

/// `{status, message, data}` envelope returned by every successful call.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

pub fn success<T: Serialize>(code: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(code).json(ApiResponse {
        status: "success",
        message: message.to_string(),
        data,
    })
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    success(StatusCode::OK, message, data)
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    success(StatusCode::CREATED, message, data)
}
