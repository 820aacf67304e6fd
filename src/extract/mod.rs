//! Request extractors. Each one rejects with [`AppError`] so every bad request
//! is rendered with the same error body.

mod parent;
mod session;

pub use parent::ParentPost;
pub use session::{Session, COOKIE_NAME};

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request::Parts, Response},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Runs the [`Validate`] rules of an extracted value.
fn validated<T: Validate>(value: T) -> Result<T, AppError> {
	value.validate()?;
	Ok(value)
}

/// A JSON request or response body.
///
/// Incoming bodies are checked against the JSON schema of `T` before they are
/// deserialized, then run through its [`Validate`] rules. Unknown fields are
/// ignored, so read-only fields such as `author` or `post` can be sent back
/// unchanged without effect.
///
/// ```rust
/// async fn create_post(Json(input): Json<CreatePostInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum_jsonschema::Json<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: DeserializeOwned + Validate + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum_jsonschema::Json(value) = axum_jsonschema::Json::<T>::from_request(req, state).await?;

		validated(value).map(Self)
	}
}

/// Query string parameters, such as [`Paginate`](crate::route::model::Paginate).
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Query<T>", json_schema)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state).await?;

		validated(value).map(Self)
	}
}

/// Path parameters.
///
/// `T` may name a subset of the route's parameters, so nested comment routes
/// can read `comment_id` while [`ParentPost`] reads `post_id`. A parameter that
/// fails to parse is rejected as not found.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Path<T>", json_schema)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: DeserializeOwned + Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state).await?;

		validated(value).map(Self)
	}
}
