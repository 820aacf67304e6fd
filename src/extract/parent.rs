use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request,
};

use crate::{
	error::RouteError,
	route::post::{
		self,
		model::{Post, PostPath},
	},
	Database,
};

use super::Path;

/// Resolves the post that a nested route is scoped to, using the `post_id`
/// path parameter.
///
/// If the post does not exist, a [`post::Error::UnknownPost`] is returned before
/// the handler runs.
///
/// ```rust
/// async fn route(ParentPost(post): ParentPost) {
///   println!("{}", post.id);
/// }
/// ```
#[derive(Debug)]
pub struct ParentPost(pub Post);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ParentPost
where
	Database: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = RouteError<post::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let Path(path) = Path::<PostPath>::from_request_parts(parts, state).await?;

		let database = Database::from_ref(state);
		let post = Post::find(&database, path.post_id)
			.await?
			.ok_or(post::Error::UnknownPost(path.post_id))?;

		Ok(Self(post))
	}
}

impl OperationInput for ParentPost {
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		axum::extract::Path::<PostPath>::operation_input(ctx, operation);
	}
}
