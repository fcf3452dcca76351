//! Per-IP rate limiting for the public API.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Token bucket settings. Built from `RATE_LIMIT_PER_SECOND` and
/// `RATE_LIMIT_BURST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimit {
    /// Returns `None` when either value is zero, which disables limiting.
    pub fn new(per_second: u64, burst_size: u32) -> Option<Self> {
        (per_second > 0 && burst_size > 0).then_some(Self {
            per_second,
            burst_size,
        })
    }
}

/// Creates a limiter keyed on the socket peer address.
///
/// Requests over the limit receive `429 Too Many Requests`. Needs
/// `into_make_service_with_connect_info::<SocketAddr>()` on the server.
///
/// Returns `None` if governor rejects the configuration.
pub fn layer(
    limit: RateLimit,
) -> Option<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(limit.per_second)
        .burst_size(limit.burst_size)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables() {
        assert!(RateLimit::new(0, 10).is_none());
        assert!(RateLimit::new(5, 0).is_none());
        assert_eq!(
            RateLimit::new(5, 20),
            Some(RateLimit {
                per_second: 5,
                burst_size: 20
            })
        );
    }

    #[test]
    fn test_layer_builds() {
        assert!(layer(RateLimit::new(2, 50).unwrap()).is_some());
    }
}
