//! Per-client rate limiting of the upload endpoint.
//!
//! Every upload costs roughly eleven upstream requests per artist, so uploads
//! are limited per client IP in three windows. A request passes only if all
//! three windows have capacity left; otherwise the client gets
//! `429 Too Many Requests`.
//!
//! The limiter keys on the peer address, so the router must be served with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use axum::{Router, extract::ConnectInfo, http::Request};
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

/// Uploads per minute per client.
pub const UPLOADS_PER_MINUTE: u32 = 10;

/// Uploads per hour per client.
pub const UPLOADS_PER_HOUR: u32 = 50;

/// Uploads per day per client.
pub const UPLOADS_PER_DAY: u32 = 200;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub per_minute: u32,
    pub per_hour: u32,
    pub per_day: u32,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            per_minute: UPLOADS_PER_MINUTE,
            per_hour: UPLOADS_PER_HOUR,
            per_day: UPLOADS_PER_DAY,
        }
    }
}

#[derive(Debug)]
pub enum RateLimitError {
    /// A window was configured with a quota of zero.
    InvalidQuota { window: Duration, quota: u32 },
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::InvalidQuota { window, quota } => write!(
                f,
                "invalid upload quota {} per {}s",
                quota,
                window.as_secs()
            ),
        }
    }
}

impl std::error::Error for RateLimitError {}

/// Keys the limiter on the client's IP address, ignoring the port.
#[derive(Clone)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Wraps every route of `router` in the minute, hour and day limiters.
///
/// Each window allows a burst of its full quota and refills one request
/// every `window / quota`.
///
/// # Errors
///
/// Returns [`RateLimitError::InvalidQuota`] if any quota is zero.
pub fn limit_uploads<S>(
    router: Router<S>,
    limits: UploadLimits,
) -> Result<Router<S>, RateLimitError>
where
    S: Clone + Send + Sync + 'static,
{
    let windows = [
        (MINUTE, limits.per_minute),
        (HOUR, limits.per_hour),
        (DAY, limits.per_day),
    ];

    let mut router = router;
    for (window, quota) in windows {
        let invalid = || RateLimitError::InvalidQuota { window, quota };
        if quota == 0 {
            return Err(invalid());
        }

        let config = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .period(window / quota)
            .burst_size(quota)
            .finish()
            .ok_or_else(invalid)?;

        router = router.layer(GovernorLayer::new(Arc::new(config)));
    }

    Ok(router)
}
