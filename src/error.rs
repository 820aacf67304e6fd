use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A machine-readable error code, such as `unknown_post`.
	pub code: Cow<'a, str>,
	/// A human-readable description of the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<Cow<'a, str>>,
	/// The request field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional structured information about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl<'a> Message<'a> {
	pub fn new(code: impl Into<Cow<'a, str>>) -> Self {
		Self {
			code: code.into(),
			content: None,
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn content(mut self, content: impl Into<Cow<'a, str>>) -> Self {
		self.content = Some(content.into());
		self
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub errors: Vec<Message<'a>>,
}

/// An error that knows how it should be presented to the client.
///
/// The [`std::fmt::Display`] implementation of the error is only used for logging,
/// so it can contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn into_errors(self) -> Vec<Message<'static>>;
}

fn respond(status: StatusCode, errors: Vec<Message<'static>>) -> Response<Body> {
	(status, axum::Json(ErrorResponse { errors })).into_response()
}

/// Errors shared by every route, usually raised by extractors or the database.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0:?}")]
	Json(JsonSchemaRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("rate limit error: {0:?}")]
	RateLimit(GovernorError),
}

impl From<JsonSchemaRejection> for AppError {
	fn from(rejection: JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl From<GovernorError> for AppError {
	fn from(error: GovernorError) -> Self {
		Self::RateLimit(error)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => respond(
				StatusCode::BAD_REQUEST,
				errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						let field = field.to_string();

						errors.iter().map(move |error| {
							let content = error.message.clone().unwrap_or_else(|| {
								format!("The field `{field}` failed the `{}` check.", error.code).into()
							});

							Message::new(error.code.clone())
								.field(field.clone())
								.content(content)
						})
					})
					.collect(),
			),
			Self::Json(rejection) => respond(StatusCode::BAD_REQUEST, body_errors(rejection)),
			Self::Query(rejection) => respond(
				StatusCode::BAD_REQUEST,
				Message::new("invalid_query")
					.content(rejection.body_text())
					.into_vec(),
			),
			// An identifier that cannot be parsed cannot exist either.
			Self::Path(rejection) => respond(
				StatusCode::NOT_FOUND,
				Message::new("not_found")
					.content(rejection.body_text())
					.into_vec(),
			),
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) => respond(
				StatusCode::TOO_MANY_REQUESTS,
				Message::new("too_many_requests")
					.content("Too many requests, slow down.")
					.detail("retry_after", wait_time)
					.into_vec(),
			),
			error => {
				tracing::error!(%error, "internal error");

				respond(
					StatusCode::INTERNAL_SERVER_ERROR,
					Message::new("internal_error").into_vec(),
				)
			}
		}
	}
}

/// Names the request field a schema error points at.
///
/// `required` errors are reported on the parent object, so the missing
/// property is read from the description instead.
fn schema_field(instance: &str, keyword: &str, description: &str) -> Option<String> {
	let field = instance.trim_start_matches('/').replace('/', ".");

	if !keyword.ends_with("/required") {
		return (!field.is_empty()).then_some(field);
	}

	let missing = description.split('"').nth(1)?;

	Some(if field.is_empty() {
		missing.to_owned()
	} else {
		format!("{field}.{missing}")
	})
}

/// Converts a rejected JSON body into one message per problem.
fn body_errors(rejection: JsonSchemaRejection) -> Vec<Message<'static>> {
	match rejection {
		JsonSchemaRejection::Json(rejection) => Message::new("invalid_body")
			.content(rejection.body_text())
			.into_vec(),
		JsonSchemaRejection::Serde(error) => {
			let path = error.path().to_string();
			let message = Message::new("invalid_body").content(error.into_inner().to_string());

			if path == "." {
				message.into_vec()
			} else {
				message.field(path).into_vec()
			}
		}
		JsonSchemaRejection::Schema(errors) => errors
			.into_iter()
			.map(|error| {
				let keyword = error.keyword_location().to_string();
				let description = error.error_description().to_string();
				let code = keyword.rsplit('/').next().unwrap_or_default().to_owned();
				let field = schema_field(
					&error.instance_location().to_string(),
					&keyword,
					&description,
				);

				let message = Message::new(code).content(description);

				match field {
					Some(field) => message.field(field),
					None => message,
				}
			})
			.collect(),
	}
}

impl aide::OperationOutput for AppError {
	type Inner = Self;
}

/// The error type returned by route handlers, either a route-specific
/// error `T` or one of the shared [`AppError`]s.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error(transparent)]
	Route(T),
	#[error(transparent)]
	App(#[from] AppError),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(%error, "route error");
				} else {
					tracing::debug!(%error, "route error");
				}

				respond(status, error.into_errors())
			}
			Self::App(error) => error.into_response(),
		}
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = Self;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_message_builder() {
		let message = Message::new("unknown_post")
			.content("The post does not exist.")
			.detail("post", "abc");

		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value["code"], "unknown_post");
		assert_eq!(value["content"], "The post does not exist.");
		assert_eq!(value["details"]["post"], "abc");
		assert!(value.get("field").is_none());
	}

	async fn body(response: Response<Body>) -> serde_json::Value {
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();

		serde_json::from_slice(&bytes).unwrap()
	}

	#[tokio::test]
	async fn test_validation_error_lists_fields() {
		let mut errors = validator::ValidationErrors::new();
		errors.add("text", validator::ValidationError::new("length"));
		errors.add(
			"size",
			validator::ValidationError::new("range").with_message("Too large.".into()),
		);

		let response = AppError::Validation(errors).into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let body = body(response).await;
		let errors = body["errors"].as_array().unwrap();

		assert_eq!(errors.len(), 2);

		let text = errors.iter().find(|error| error["field"] == "text").unwrap();
		let size = errors.iter().find(|error| error["field"] == "size").unwrap();

		assert_eq!(text["code"], "length");
		assert_eq!(text["content"], "The field `text` failed the `length` check.");
		assert_eq!(size["code"], "range");
		assert_eq!(size["content"], "Too large.");
	}

	#[test]
	fn test_schema_field() {
		assert_eq!(
			schema_field("/text", "/properties/text/minLength", r#""" is shorter than 1 character"#),
			Some("text".to_owned())
		);
		assert_eq!(
			schema_field("", "/required", r#""text" is a required property"#),
			Some("text".to_owned())
		);
		assert_eq!(
			schema_field("/author", "/properties/author/required", r#""id" is a required property"#),
			Some("author.id".to_owned())
		);
		assert_eq!(schema_field("", "/type", r#"null is not of type "object""#), None);
	}

	#[test]
	fn test_database_error_is_internal() {
		let response = AppError::Database(sqlx::Error::RowNotFound).into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
