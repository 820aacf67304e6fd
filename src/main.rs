#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod permission;
mod ratelimit;
mod route;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::{Layer, ServiceBuilder};
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers only ever need the connection pool; there is no other state
/// shared between requests.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Builds the application router along with its `OpenAPI` document.
pub fn router(state: State) -> Router {
	aide::gen::on_error(|error| tracing::error!(%error, "failed to generate api docs"));
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.nest("/posts/:post_id/comments", route::comment::routes())
		.nest("/groups", route::group::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Trims trailing slashes from request paths before routing, so that `/posts/`
/// and `/posts` reach the same handler.
pub fn trim_trailing_slash(router: Router) -> Router {
	Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(router))
}

#[tokio::main]
async fn main() {
	let config = config::Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(config.otlp_endpoint.as_deref())
		.expect("failed to initialize tracing");

	let state = State {
		database: Database::connect(&config.database_url)
			.await
			.expect("failed to connect to database"),
	};

	let governor = ratelimit::per_peer();
	ratelimit::cleanup_old_limits(&[&governor]);

	let app = trim_trailing_slash(router(state).layer(GovernorLayer { config: governor }));

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to address");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
