//! Demo API module
//!
//! One stateless endpoint: `POST /api` takes `{ "input": string }` and
//! returns `{ "output": string }` with the input uppercased. Malformed or
//! missing input is a client error (400), never an internal fault.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::http;
use crate::logger;

#[derive(Debug, Deserialize)]
pub struct ApiRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub output: String,
}

/// Handle `POST /api`
pub async fn handle_uppercase(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let body = if let Ok(collected) = req.collect().await {
        collected.to_bytes()
    } else {
        logger::log_api_request("POST", "/api", 400);
        return Ok(http::build_400_response("Failed to read request body"));
    };

    let parsed: ApiRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_api_request("POST", "/api", 400);
            return Ok(http::build_400_response(&format!("Invalid request: {e}")));
        }
    };

    let response = ApiResponse {
        output: parsed.input.to_uppercase(),
    };
    logger::log_api_request("POST", "/api", 200);
    Ok(http::build_json_response(StatusCode::OK, &response))
}
