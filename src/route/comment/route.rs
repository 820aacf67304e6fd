use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, ParentPost, Path, Query, Session},
	openapi::tag,
	permission::{self, Action},
	Database,
};

use super::{model, Error, RouteError};

/// Get comments
/// Returns a paginated response of the comments on a post, newest first.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(database): State<Database>,
	ParentPost(post): ParentPost,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let comments = sqlx::query_as::<_, model::Comment>(
		r#"
			SELECT comment.*, "user".username AS author
			FROM comment
			INNER JOIN "user" ON "user".id = comment.author_id
			WHERE comment.post_id = $1
			ORDER BY comment.created_at DESC, comment.id
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(post.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(comments))
}

/// Get single comment
/// Returns a single comment on a post by its unique id.
#[route(tag = tag::COMMENT)]
pub async fn get_comment(
	State(database): State<Database>,
	ParentPost(post): ParentPost,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = model::Comment::find(&database, post.id, path.comment_id)
		.await?
		.ok_or(Error::UnknownComment(path.comment_id))?;

	Ok(Json(comment))
}

/// Create comment
/// Comments on a post as the authenticated user.
#[route(tag = tag::COMMENT, response(status = 201, description = "The created comment.", shape = "Json<model::Comment>"))]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	ParentPost(post): ParentPost,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			WITH inserted AS (
				INSERT INTO comment (post_id, author_id, text)
				VALUES ($1, $2, $3)
				RETURNING *
			)
			SELECT inserted.*, "user".username AS author
			FROM inserted
			INNER JOIN "user" ON "user".id = inserted.author_id
		"#,
	)
	.bind(post.id)
	.bind(session.user.id)
	.bind(&input.text)
	.fetch_one(&database)
	.await?;

	tracing::info!(
		comment = %comment.id,
		post = %post.id,
		author = %session.user.id,
		"created comment"
	);

	Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// Replace comment
/// Replaces the content of a comment. Only the author of the comment may do this.
#[route(tag = tag::COMMENT)]
pub async fn replace_comment(
	State(database): State<Database>,
	session: Session,
	ParentPost(post): ParentPost,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	edit_comment(&database, &session, post.id, path.comment_id, Some(input.text)).await
}

/// Update comment
/// Updates the given fields of a comment. Only the author of the comment may do this.
#[route(tag = tag::COMMENT)]
pub async fn update_comment(
	State(database): State<Database>,
	session: Session,
	ParentPost(post): ParentPost,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	edit_comment(&database, &session, post.id, path.comment_id, input.text).await
}

/// Text is the only writable field, so a full and a partial update differ only
/// in whether `text` may be absent.
async fn edit_comment(
	database: &Database,
	session: &Session,
	post_id: uuid::Uuid,
	comment_id: uuid::Uuid,
	text: Option<String>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = model::Comment::find(database, post_id, comment_id)
		.await?
		.ok_or(Error::UnknownComment(comment_id))?;

	permission::ensure_author(&comment, &session.user, Action::Update)
		.map_err(Error::Forbidden)?;

	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			WITH updated AS (
				UPDATE comment
				SET text = COALESCE($1, text)
				WHERE id = $2
				RETURNING *
			)
			SELECT updated.*, "user".username AS author
			FROM updated
			INNER JOIN "user" ON "user".id = updated.author_id
		"#,
	)
	.bind(text)
	.bind(comment.id)
	.fetch_optional(database)
	.await?
	.ok_or(Error::UnknownComment(comment_id))?;

	Ok(Json(comment))
}

/// Delete comment
/// Deletes a comment. Only the author of the comment may do this.
#[route(tag = tag::COMMENT, response(status = 204, description = "The comment was deleted."))]
pub async fn delete_comment(
	State(database): State<Database>,
	session: Session,
	ParentPost(post): ParentPost,
	Path(path): Path<model::CommentPath>,
) -> Result<impl IntoApiResponse, RouteError> {
	let comment = model::Comment::find(&database, post.id, path.comment_id)
		.await?
		.ok_or(Error::UnknownComment(path.comment_id))?;

	permission::ensure_author(&comment, &session.user, Action::Delete)
		.map_err(Error::Forbidden)?;

	sqlx::query("DELETE FROM comment WHERE id = $1")
		.bind(comment.id)
		.execute(&database)
		.await?;

	tracing::info!(comment = %comment.id, post = %post.id, "deleted comment");

	Ok(StatusCode::NO_CONTENT.into_response())
}
