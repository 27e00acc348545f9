/**
 * Rate Limiting Middleware
 *
 * Fixed-window request limiting per client IP. Each IP may make
 * `max_requests` requests per window; the window starts with its first
 * request. Every response carries `X-RateLimit-Limit` and
 * `X-RateLimit-Remaining`; rejected requests get 429 with `Retry-After`.
 *
 * The client IP comes from the socket address when the server is run with
 * connect info, then from the first `X-Forwarded-For` entry. Requests with
 * neither share one bucket.
 */

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::backend::error::BackendError;
use crate::backend::server::config::RateLimitSettings;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Windows are swept once the table grows past this many clients
const CLEANUP_THRESHOLD: usize = 10_000;

/// Outcome of one rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window resets
    pub reset_in: Duration,
}

/// Per-IP fixed-window counter
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<IpAddr, (u32, Instant)>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window: settings.window,
            max_requests: settings.max_requests,
        }
    }

    /// Count a request from `ip`
    pub fn check(&self, ip: IpAddr) -> RateLimitStatus {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitStatus {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if windows.len() > CLEANUP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, (_, start)| now.duration_since(*start) < window);
        }

        let (count, start) = windows.entry(ip).or_insert((0, now));
        if now.duration_since(*start) >= self.window {
            *count = 0;
            *start = now;
        }

        let allowed = *count < self.max_requests;
        if allowed {
            *count += 1;
        }

        RateLimitStatus {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(*count),
            reset_in: self.window.saturating_sub(now.duration_since(*start)),
        }
    }
}

/// Best-effort client address for rate limiting
fn client_ip(request: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    forwarded_for(request.headers()).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn set_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(status.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(status.remaining));
}

/// Rate limiting middleware
///
/// Returns 429 Too Many Requests once a client exhausts its window.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let status = limiter.check(ip);

    let mut response = if status.allowed {
        next.run(request).await
    } else {
        // Round up so clients never retry early
        let retry_after_secs = status.reset_in.as_millis().div_ceil(1000).max(1) as u64;
        tracing::warn!("Rate limit exceeded for {}", ip);
        BackendError::RateLimited { retry_after_secs }.into_response()
    };
    set_limit_headers(&mut response, &status);
    response
}
