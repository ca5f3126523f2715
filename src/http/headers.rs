//! Version preconditions (`If-Match`, `If-None-Match`) and the `ETag` /
//! `Location` headers on entity responses.
//!
//! An entity tag is the decimal version in double quotes (`"3"`). Incoming
//! tags are compared by value only: quotes and a `W/` prefix are stripped.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use crate::model::Version;

/// Format a version as an entity tag.
pub fn etag(version: Version) -> String {
    format!("\"{version}\"")
}

fn parse_tag(raw: &str) -> Option<Version> {
    let tag = raw.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"').parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// The version the client expects to overwrite. Required on updates.
pub fn if_match(headers: &HeaderMap) -> Result<Version, ApiError> {
    let raw = header_str(headers, &header::IF_MATCH)
        .ok_or(ApiError::MissingPrecondition("If-Match"))?;
    parse_tag(raw).ok_or_else(|| ApiError::MalformedPrecondition {
        header: "If-Match",
        value: raw.to_string(),
    })
}

/// The version the client already holds, if it sent one. A tag that is not
/// a version number matches nothing.
pub fn if_none_match(headers: &HeaderMap) -> Option<Version> {
    header_str(headers, &header::IF_NONE_MATCH).and_then(parse_tag)
}

/// A JSON entity response carrying `ETag` and `Location`.
pub fn versioned<T: Serialize>(
    status: StatusCode,
    body: &T,
    version: Version,
    location: &str,
) -> Result<Response, ApiError> {
    let etag = HeaderValue::from_str(&etag(version))
        .map_err(|e| ApiError::Response(format!("invalid etag: {e}")))?;
    let location = HeaderValue::from_str(location)
        .map_err(|e| ApiError::Response(format!("invalid location {location:?}: {e}")))?;

    let mut response = (status, Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::ETAG, etag);
    headers.insert(header::LOCATION, location);
    Ok(response)
}
