use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, openapi};

pub const SPEC_PATH: &str = "/docs/private/api.json";

/// The Scalar reference page at `/docs` and the raw `OpenAPI` document it renders.
pub fn routes() -> ApiRouter {
	ApiRouter::new()
		.api_route_with(
			"/",
			get_with(
				Scalar::new(SPEC_PATH).with_title("Yatube API").axum_handler(),
				|op| op.description("This documentation page."),
			),
			|p| {
				p.security_requirement(openapi::SECURITY_SCHEME_SESSION)
					.security_requirement(openapi::SECURITY_SCHEME_API_KEY)
			},
		)
		.route("/private/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}
