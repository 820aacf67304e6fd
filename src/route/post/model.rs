pub use crate::route::model::Paginate;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{permission::Authored, Database};

/// A single post, written by a user and optionally published in a group.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that wrote the post.
	#[serde(skip)]
	pub author_id: Uuid,
	/// The username of the author.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The content of the post.
	#[validate(length(min = 1, max = 10000))]
	pub text: String,
	/// The group the post is published in, if any.
	#[serde(rename = "group")]
	pub group_id: Option<Uuid>,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Post {
	/// Fetches a single post along with its author's username.
	pub async fn find(database: &Database, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				SELECT post.*, "user".username AS author
				FROM post
				INNER JOIN "user" ON "user".id = post.author_id
				WHERE post.id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(database)
		.await
	}
}

impl Authored for Post {
	const RESOURCE: &'static str = "post";

	fn id(&self) -> Uuid {
		self.id
	}

	fn author_id(&self) -> Uuid {
		self.author_id
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct PostPath {
	/// The unique identifier of the post.
	pub post_id: Uuid,
}
