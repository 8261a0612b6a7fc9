/// The stable response envelope shared by every endpoint:
/// `{statusCode, message, data, success}`.
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub message: String,
    pub data: T,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
            success: true,
        }
    }

    /// 200 envelope
    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(200, message, data))
    }

    /// 201 envelope
    pub fn created(message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::new(201, message, data))
    }
}
