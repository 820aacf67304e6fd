use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, permission, AppState};

pub mod model;
pub mod route;

/// Name of the foreign key from `post.group_id` to `group.id`.
const GROUP_CONSTRAINT: &str = "post_group_id_fkey";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown group {0}")]
	UnknownGroup(Uuid),
	#[error(transparent)]
	Forbidden(permission::Forbidden),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:post_id",
			get_with(get_post, get_post_docs)
				.put_with(replace_post, replace_post_docs)
				.patch_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

/// Turns a violation of [`GROUP_CONSTRAINT`] into [`Error::UnknownGroup`].
fn map_group_violation(group: Option<Uuid>) -> impl FnOnce(sqlx::Error) -> RouteError {
	move |error| match (&error, group) {
		(sqlx::Error::Database(database), Some(group))
			if database.constraint() == Some(GROUP_CONSTRAINT) =>
		{
			Error::UnknownGroup(group).into()
		}
		_ => error.into(),
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::UnknownGroup(..) => StatusCode::BAD_REQUEST,
			Self::Forbidden(..) => StatusCode::FORBIDDEN,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.content("The post you requested does not exist.")
				.detail("post", post.to_string())
				.into_vec(),
			Self::UnknownGroup(group) => error::Message::new("unknown_group")
				.field("group")
				.content("The group you provided does not exist.")
				.detail("group", group.to_string())
				.into_vec(),
			Self::Forbidden(forbidden) => forbidden.into_message().into_vec(),
		}
	}
}
