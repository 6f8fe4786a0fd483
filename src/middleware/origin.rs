use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;

/// Origins always allowed in the strict variant, regardless of configuration.
pub const PRODUCTION_ORIGINS: [&str; 3] = [
    "https://yellow-parasol.com",
    "https://braces.fit",
    "http://localhost:8000",
];

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// Exact-match origin set: hardcoded production origins plus configured
/// extras, each normalized by stripping one trailing slash. Built once at
/// startup and shared immutably across requests.
#[derive(Debug, Clone)]
pub struct OriginAllowList {
    origins: Arc<HashSet<String>>,
}

impl OriginAllowList {
    pub fn new(extra_origins: &[String]) -> Self {
        let origins = PRODUCTION_ORIGINS
            .iter()
            .copied()
            .map(str::to_string)
            .chain(extra_origins.iter().cloned())
            .map(|o| normalize(&o))
            .filter(|o| !o.is_empty())
            .collect();

        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.contains(&normalize(origin))
    }
}

fn normalize(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}

/// Strict origin gate: requests without a declared origin pass through
/// (direct API calls, non-browser clients); declared origins must match the
/// allow-list exactly or the request is answered 403 before any body
/// handling. Preflight OPTIONS requests short-circuit with 200 once the
/// `Access-Control-Allow-*` headers are attached.
pub async fn origin_policy_middleware(
    State(allow_list): State<OriginAllowList>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match origin.as_deref() {
        None => {
            tracing::info!("Request without origin header, allowed");
        }
        Some(o) if allow_list.allows(o) => {
            tracing::info!(origin = %o, "Request origin allowed");
        }
        Some(o) => {
            return AppError::OriginDenied(o.to_string()).into_response();
        }
    }

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        attach_cors_headers(response.headers_mut(), origin.as_deref());
        return response;
    }

    let mut response = next.run(req).await;
    attach_cors_headers(response.headers_mut(), origin.as_deref());
    response
}

/// Mirror the allow decision back to the client. The declared origin is
/// echoed; requests without one get a wildcard.
fn attach_cors_headers(headers: &mut HeaderMap, origin: Option<&str>) {
    let allow_origin = origin
        .and_then(|o| HeaderValue::from_str(o).ok())
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
