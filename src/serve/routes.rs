//! HTTP handlers (spec §6 EXTERNAL INTERFACES).
//!
//! Grounded in the original implementation's `handleGenerate` /
//! `handleMap` / `handleRanking` / `handleASN`, reassembled over
//! `axum` extractors instead of raw `net/http` path parsing.
use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::pipeline::Pipeline;
use crate::serve::json::{render_node, render_snapshot};

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub auth_token: String,
}

const HTTP_DATE_FMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

fn cors_headers(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("600"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("X-Requested-With, Cache-Control, Pragma"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
}

fn last_modified_header(when: DateTime<Utc>) -> HeaderValue {
    HeaderValue::from_str(&when.format(HTTP_DATE_FMT).to_string()).unwrap()
}

pub async fn generate(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    };

    if token != state.auth_token {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let now = Utc::now();
    std::thread::spawn(move || {
        if let Err(e) = state.pipeline.generate(now.timestamp() as u64) {
            log::error!("generation failed: {e}");
        }
    });

    let mut response_headers = HeaderMap::new();
    cors_headers(&mut response_headers);
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

    (
        StatusCode::ACCEPTED,
        response_headers,
        format!("Map generation requested at: {}", now.format(HTTP_DATE_FMT)),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct MapQuery {
    #[serde(rename = "type")]
    output_type: Option<String>,
}

pub async fn map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(published) = state.pipeline.store().current().as_ref().map(|p| {
        (
            render_snapshot(&p.snapshot),
            p.encoded.clone(),
            p.last_modified,
        )
    }) else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Map data not available").into_response();
    };
    let (json_snapshot, encoded, last_modified) = published;

    if let Some(if_modified_since) = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
    {
        if let Ok(since) = NaiveDateTime::parse_from_str(if_modified_since, HTTP_DATE_FMT) {
            let since = DateTime::<Utc>::from_naive_utc_and_offset(since, Utc);
            if last_modified <= since {
                return StatusCode::NOT_MODIFIED.into_response();
            }
        }
    }

    let mut response_headers = HeaderMap::new();
    cors_headers(&mut response_headers);
    response_headers.insert(header::LAST_MODIFIED, last_modified_header(last_modified));

    if query.output_type.as_deref() == Some("json") {
        response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        (
            StatusCode::OK,
            response_headers,
            serde_json::to_vec(&json_snapshot).unwrap_or_default(),
        )
            .into_response()
    } else {
        response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-protobuf"),
        );
        response_headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"map.bin\""),
        );
        (StatusCode::OK, response_headers, encoded).into_response()
    }
}

pub async fn ranking(State(state): State<Arc<AppState>>) -> Response {
    let Some((mut rows, last_modified)) = state.pipeline.store().current().as_ref().map(|p| {
        let rows: Vec<(u32, u32, String, u32)> = p
            .snapshot
            .nodes
            .iter()
            .map(|n| (n.centrality.ranking, n.asn.to_u32(), n.desc.clone(), n.centrality.index))
            .collect();
        (rows, p.last_modified)
    }) else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Map data not available").into_response();
    };
    rows.sort_by_key(|(ranking, ..)| *ranking);

    let mut body = String::new();
    let _ = writeln!(body, "MAP.DN42 Global Rank");
    let _ = writeln!(body, "Last update: {}", last_modified.format(HTTP_DATE_FMT));
    let _ = writeln!(body, "Rank   ASN         Desc                            Index");
    for (rank, asn, desc, index) in rows {
        let _ = writeln!(body, "{rank:<5}  {asn:<10}  {desc:<30}  {index}");
    }

    let mut response_headers = HeaderMap::new();
    cors_headers(&mut response_headers);
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response_headers.insert(header::LAST_MODIFIED, last_modified_header(last_modified));

    (StatusCode::OK, response_headers, body).into_response()
}

pub async fn asn(State(state): State<Arc<AppState>>, Path(raw_asn): Path<String>) -> Response {
    let Ok(asn) = raw_asn.parse::<u32>() else {
        return (StatusCode::BAD_REQUEST, "invalid ASN").into_response();
    };

    let Some(rendered) = state.pipeline.store().current().as_ref().map(|p| {
        p.snapshot
            .find_by_asn(crate::models::Asn::new(asn))
            .map(|node| {
                let whois = state.pipeline.registry().raw_object(node.asn);
                serde_json::to_vec(&render_node(node, whois)).unwrap_or_default()
            })
    }) else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Map data not available").into_response();
    };

    let Some(body) = rendered else {
        return (StatusCode::NOT_FOUND, "ASN not found").into_response();
    };

    let mut response_headers = HeaderMap::new();
    cors_headers(&mut response_headers);
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    (StatusCode::OK, response_headers, body).into_response()
}
