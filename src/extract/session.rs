use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::RouteError,
	openapi::{SECURITY_SCHEME_API_KEY, SECURITY_SCHEME_SESSION},
	route::auth,
	Database,
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";
pub const COOKIE_NAME: &str = "session";

/// The authenticated caller of a request.
///
/// The caller is resolved from an `Authorization: Bearer <key>` header if one is
/// present, otherwise from the session cookie. Neither credential is issued by this
/// service, they are only looked up.
///
/// If no credential is sent, a [`auth::Error::NoSessionCookieOrApiKey`] is returned.
/// If the credential is unknown, a [`auth::Error::InvalidApiKey`] or
/// [`auth::Error::InvalidSessionCookie`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub user: auth::model::User,
}

/// Parses the key out of an `Authorization` header value.
fn parse_api_key(value: &header::HeaderValue) -> Result<Uuid, auth::Error> {
	let value = value.to_str().map_err(|_| auth::Error::InvalidApiKey)?;
	let key = value
		.strip_prefix(AUTHORIZATION_PREFIX)
		.ok_or(auth::Error::InvalidApiKey)?;

	Uuid::parse_str(key.trim()).map_err(|_| auth::Error::InvalidApiKey)
}

/// Finds the session id in the `Cookie` headers.
fn parse_session_cookie(headers: &header::HeaderMap) -> Result<Uuid, auth::Error> {
	let cookie = headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == COOKIE_NAME)
		.ok_or(auth::Error::NoSessionCookieOrApiKey)?;

	Uuid::parse_str(cookie.value()).map_err(|_| auth::Error::InvalidSessionCookie)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		let user = if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
			let key = parse_api_key(value)?;

			sqlx::query_as::<_, auth::model::User>(
				r#"
					SELECT * FROM "user" WHERE id = (
						SELECT user_id FROM api_key WHERE id = $1
					)
				"#,
			)
			.bind(key)
			.fetch_optional(&database)
			.await?
			.ok_or(auth::Error::InvalidApiKey)?
		} else {
			let session_id = parse_session_cookie(&parts.headers)?;

			sqlx::query_as::<_, auth::model::User>(
				r#"
					SELECT * FROM "user" WHERE id = (
						SELECT user_id FROM session WHERE id = $1
					)
				"#,
			)
			.bind(session_id)
			.fetch_optional(&database)
			.await?
			.ok_or(auth::Error::InvalidSessionCookie)?
		};

		tracing::debug!(user = %user.id, "authenticated request");

		Ok(Self { user })
	}
}

impl OperationInput for Session {
	/// Adds the session cookie and API key requirements to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_API_KEY.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
