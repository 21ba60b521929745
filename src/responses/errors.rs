use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a proper JSON response
pub fn error_to_response(err: ServerError) -> Response {
    match err {
        ServerError::NotFound => json_error_response(404, "Not Found"),
        ServerError::BadRequest(msg) => json_error_response(400, &msg),
        ServerError::DbError(msg) => json_error_response(500, &msg),
        ServerError::NotifyError(msg) => json_error_response(502, &msg),
        ServerError::InternalError => json_error_response(500, "Internal Server Error"),
    }
}

/// Build a JSON error body in the standard envelope
pub fn json_error_response(status: u16, message: &str) -> Response {
    let body = json!({
        "success": false,
        "error": {
            "message": message,
            "statusCode": status,
        },
    });

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
