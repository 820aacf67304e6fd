pub use crate::route::model::Paginate;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A community that posts can be published in.
///
/// Groups are managed outside of the API and are read-only here.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Group {
	/// The unique identifier of the group.
	pub id: Uuid,
	/// The display name of the group.
	pub title: String,
	/// A unique, URL-friendly name for the group.
	pub slug: String,
	/// What the group is about.
	pub description: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct GroupPath {
	/// The unique identifier of the group.
	pub group_id: Uuid,
}
