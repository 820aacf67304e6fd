use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur while resolving the caller of a request.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no session cookie or api key")]
	NoSessionCookieOrApiKey,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("invalid api key")]
	InvalidApiKey,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::UNAUTHORIZED
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let code = match self {
			Self::NoSessionCookieOrApiKey => "not_authenticated",
			Self::InvalidSessionCookie | Self::InvalidApiKey => "invalid_credentials",
		};

		error::Message::new(code)
			.content(self.to_string())
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_me_with_api_key(pool: Database) {
		let john = user(&pool, "john").await;
		let app = app(pool);

		let response = app
			.get("/auth/me")
			.add_header(header::AUTHORIZATION, john.authorization())
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["username"], "john");
	}

	#[sqlx::test]
	async fn test_me_with_session_cookie(pool: Database) {
		let john = user(&pool, "john").await;
		let app = app(pool);

		let response = app
			.get("/auth/me")
			.add_header(header::COOKIE, john.session_cookie())
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["id"], json!(john.id));
	}

	#[sqlx::test]
	async fn test_me_rejects_unknown_credentials(pool: Database) {
		let app = app(pool);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<Value>()["errors"][0]["code"],
			"not_authenticated"
		);

		let response = app
			.get("/auth/me")
			.add_header(
				header::AUTHORIZATION,
				HeaderValue::from_str(&format!("Bearer {}", Uuid::new_v4())).unwrap(),
			)
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}
}
