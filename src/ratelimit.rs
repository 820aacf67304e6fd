use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::AppError;

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Limits every peer IP to a sustained 10 requests per second, with bursts of up to 50.
pub fn per_peer() -> Arc<Config> {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(10)
			.burst_size(50)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.expect("rate limit period and burst size must be non-zero"),
	)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}

/// Periodically drops limiter state for peers that have not been seen recently,
/// so that the key store does not grow without bound.
pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();

	std::thread::spawn(move || loop {
		std::thread::sleep(CLEANUP_INTERVAL);

		for limiter in &limiters {
			tracing::debug!(size = limiter.len(), "pruning rate limit storage");

			limiter.retain_recent();
		}
	});
}
