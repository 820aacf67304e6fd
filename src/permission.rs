use std::fmt;

use uuid::Uuid;

use crate::{error, route::auth::model::User};

/// A resource that belongs to the user who created it.
pub trait Authored {
	/// The name of the resource as presented to the client, e.g. `post`.
	const RESOURCE: &'static str;

	fn id(&self) -> Uuid;

	fn author_id(&self) -> Uuid;
}

/// A write action that only the author of a resource may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	Update,
	Delete,
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Update => "changing",
			Self::Delete => "deleting",
		})
	}
}

/// Returned when someone other than the author tries to change a resource.
#[derive(Debug, thiserror::Error)]
#[error("{action} another user's {resource} is forbidden")]
pub struct Forbidden {
	pub action: Action,
	pub resource: &'static str,
	pub id: Uuid,
}

impl Forbidden {
	pub fn into_message(self) -> error::Message<'static> {
		error::Message::new("permission_denied")
			.content(self.to_string())
			.detail(self.resource, self.id.to_string())
	}
}

/// Fails unless `user` is the author of `resource`.
///
/// This must run before any mutation of the resource.
pub fn ensure_author<R: Authored>(resource: &R, user: &User, action: Action) -> Result<(), Forbidden> {
	if resource.author_id() == user.id {
		return Ok(());
	}

	tracing::info!(
		user = %user.id,
		resource = R::RESOURCE,
		id = %resource.id(),
		?action,
		"rejected write by non-author"
	);

	Err(Forbidden {
		action,
		resource: R::RESOURCE,
		id: resource.id(),
	})
}
