use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	permission::{self, Action},
	Database,
};

use super::{map_group_violation, model, Error, RouteError};

/// Get all posts
/// Returns a paginated response of all posts, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let posts = sqlx::query_as::<_, model::Post>(
		r#"
			SELECT post.*, "user".username AS author
			FROM post
			INNER JOIN "user" ON "user".id = post.author_id
			ORDER BY post.created_at DESC, post.id
			LIMIT $1 OFFSET $2
		"#,
	)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Post>, RouteError> {
	let post = model::Post::find(&database, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	Ok(Json(post))
}

/// Create post
/// Creates a new post authored by the authenticated user.
#[route(tag = tag::POST, response(status = 201, description = "The created post.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			WITH inserted AS (
				INSERT INTO post (author_id, text, group_id)
				VALUES ($1, $2, $3)
				RETURNING *
			)
			SELECT inserted.*, "user".username AS author
			FROM inserted
			INNER JOIN "user" ON "user".id = inserted.author_id
		"#,
	)
	.bind(session.user.id)
	.bind(&input.text)
	.bind(input.group_id)
	.fetch_one(&database)
	.await
	.map_err(map_group_violation(input.group_id))?;

	tracing::info!(post = %post.id, author = %session.user.id, "created post");

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Replace post
/// Replaces the content and group of a post. Only the author of the post may do this.
#[route(tag = tag::POST)]
pub async fn replace_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = model::Post::find(&database, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	permission::ensure_author(&post, &session.user, Action::Update).map_err(Error::Forbidden)?;

	let post = sqlx::query_as::<_, model::Post>(
		r#"
			WITH updated AS (
				UPDATE post
				SET text = $1, group_id = $2
				WHERE id = $3
				RETURNING *
			)
			SELECT updated.*, "user".username AS author
			FROM updated
			INNER JOIN "user" ON "user".id = updated.author_id
		"#,
	)
	.bind(&input.text)
	.bind(input.group_id)
	.bind(post.id)
	.fetch_optional(&database)
	.await
	.map_err(map_group_violation(input.group_id))?
	.ok_or(Error::UnknownPost(path.post_id))?;

	Ok(Json(post))
}

/// Update post
/// Updates the given fields of a post. Sending `group: null` removes the post from its group. Only the author of the post may do this.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = model::Post::find(&database, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	permission::ensure_author(&post, &session.user, Action::Update).map_err(Error::Forbidden)?;

	let group = input.group_id.flatten();
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			WITH updated AS (
				UPDATE post
				SET
					text = COALESCE($1, text),
					group_id = CASE WHEN $3 THEN $2 ELSE group_id END
				WHERE id = $4
				RETURNING *
			)
			SELECT updated.*, "user".username AS author
			FROM updated
			INNER JOIN "user" ON "user".id = updated.author_id
		"#,
	)
	.bind(input.text)
	.bind(group)
	.bind(input.group_id.is_some())
	.bind(post.id)
	.fetch_optional(&database)
	.await
	.map_err(map_group_violation(group))?
	.ok_or(Error::UnknownPost(path.post_id))?;

	Ok(Json(post))
}

/// Delete post
/// Deletes a post along with its comments. Only the author of the post may do this.
#[route(tag = tag::POST, response(status = 204, description = "The post was deleted."))]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = model::Post::find(&database, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	permission::ensure_author(&post, &session.user, Action::Delete).map_err(Error::Forbidden)?;

	sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(post.id)
		.execute(&database)
		.await?;

	tracing::info!(post = %post.id, "deleted post");

	Ok(StatusCode::NO_CONTENT.into_response())
}
