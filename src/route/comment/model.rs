pub use crate::route::model::Paginate;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{permission::Authored, Database};

/// A comment on a post.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The post the comment belongs to. Taken from the request path.
	#[serde(rename = "post", skip_deserializing)]
	pub post_id: Uuid,
	/// The user that wrote the comment.
	#[serde(skip)]
	pub author_id: Uuid,
	/// The username of the author.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The content of the comment.
	#[validate(length(min = 1, max = 2000))]
	pub text: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Comment {
	/// Fetches a comment, but only if it belongs to the given post.
	pub async fn find(
		database: &Database,
		post_id: Uuid,
		id: Uuid,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				SELECT comment.*, "user".username AS author
				FROM comment
				INNER JOIN "user" ON "user".id = comment.author_id
				WHERE comment.id = $1 AND comment.post_id = $2
			"#,
		)
		.bind(id)
		.bind(post_id)
		.fetch_optional(database)
		.await
	}
}

impl Authored for Comment {
	const RESOURCE: &'static str = "comment";

	fn id(&self) -> Uuid {
		self.id
	}

	fn author_id(&self) -> Uuid {
		self.author_id
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The unique identifier of the comment.
	pub comment_id: Uuid,
}
