// HTTP response utilities for pretty-printed JSON
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use serde::Serialize;

/// Serialize `data` as indented JSON with the given status.
///
/// Slashes are never escaped, so paths and URLs read as written.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, data: &T) -> Response<Body> {
    match serde_json::to_vec_pretty(data) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            tracing::error!("JSON serialization error: {}", e);
            let mut response = Response::new(Body::from(r#"{"error":"serialization failed"}"#));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
    }
}

/// 200 OK with a pretty-printed JSON body.
pub fn json_ok<T: Serialize + ?Sized>(data: &T) -> Response<Body> {
    json_response(StatusCode::OK, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_pretty_and_unescaped() {
        let response = json_ok(&json!({"file": "data/config/pv.json"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text, "{\n  \"file\": \"data/config/pv.json\"\n}");
    }
}
