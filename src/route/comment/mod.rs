use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, permission, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error(transparent)]
	Forbidden(permission::Forbidden),
}

pub type RouteError = error::RouteError<Error>;

/// Routes for the comments of a single post, nested under `/posts/:post_id/comments`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:comment_id",
			get_with(get_comment, get_comment_docs)
				.put_with(replace_comment, replace_comment_docs)
				.patch_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) => StatusCode::NOT_FOUND,
			Self::Forbidden(..) => StatusCode::FORBIDDEN,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownComment(comment) => error::Message::new("unknown_comment")
				.content("The comment you requested does not exist on this post.")
				.detail("comment", comment.to_string())
				.into_vec(),
			Self::Forbidden(forbidden) => forbidden.into_message().into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_create_uses_path_post_and_caller(pool: Database) {
		let alice = user(&pool, "alice").await;
		let target = post(&pool, &alice, "target").await;
		let other = post(&pool, &alice, "other").await;
		let app = app(pool);

		let response = app
			.post(&format!("/posts/{target}/comments"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.json(&json!({ "text": "nice", "post": other, "author": "mallory" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);

		let comment = response.json::<Value>();

		assert_eq!(comment["post"], json!(target));
		assert_eq!(comment["author"], "alice");
		assert_eq!(comment["text"], "nice");
	}

	#[sqlx::test]
	async fn test_list_only_returns_comments_of_post(pool: Database) {
		let alice = user(&pool, "alice").await;
		let first = post(&pool, &alice, "first").await;
		let second = post(&pool, &alice, "second").await;

		comment(&pool, first, &alice, "on first").await;
		comment(&pool, first, &alice, "also on first").await;
		let stray = comment(&pool, second, &alice, "on second").await;

		let app = app(pool);

		let response = app.get(&format!("/posts/{first}/comments")).await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let comments = response.json::<Value>();
		let comments = comments.as_array().unwrap();

		assert_eq!(comments.len(), 2);
		assert!(comments.iter().all(|comment| comment["post"] == json!(first)));

		let response = app
			.get(&format!("/posts/{first}/comments/{stray}"))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_missing_post_is_not_found(pool: Database) {
		let alice = user(&pool, "alice").await;
		let missing = Uuid::new_v4();
		let app = app(pool.clone());

		let response = app.get(&format!("/posts/{missing}/comments")).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.json::<Value>()["errors"][0]["code"],
			"unknown_post"
		);

		let response = app
			.post(&format!("/posts/{missing}/comments"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.json(&json!({ "text": "nice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(count(&pool, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_create_requires_authentication(pool: Database) {
		let alice = user(&pool, "alice").await;
		let id = post(&pool, &alice, "hello").await;
		let app = app(pool.clone());

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "text": "nice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(count(&pool, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_author_can_update_and_delete(pool: Database) {
		let alice = user(&pool, "alice").await;
		let post_id = post(&pool, &alice, "hello").await;
		let id = comment(&pool, post_id, &alice, "nice").await;
		let app = app(pool.clone());

		let response = app
			.patch(&format!("/posts/{post_id}/comments/{id}"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.json(&json!({}))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["text"], "nice");

		let response = app
			.put(&format!("/posts/{post_id}/comments/{id}"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.json(&json!({ "text": "very nice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["text"], "very nice");
		assert_eq!(response.json::<Value>()["post"], json!(post_id));

		let response = app
			.delete(&format!("/posts/{post_id}/comments/{id}"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.await;

		assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
		assert_eq!(count(&pool, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_non_author_is_forbidden(pool: Database) {
		let alice = user(&pool, "alice").await;
		let bob = user(&pool, "bob").await;
		let post_id = post(&pool, &bob, "bob's post").await;
		let id = comment(&pool, post_id, &alice, "nice").await;
		let app = app(pool.clone());

		for request in [
			app.patch(&format!("/posts/{post_id}/comments/{id}"))
				.json(&json!({ "text": "hijacked" })),
			app.put(&format!("/posts/{post_id}/comments/{id}"))
				.json(&json!({ "text": "hijacked" })),
			app.delete(&format!("/posts/{post_id}/comments/{id}")),
		] {
			let response = request
				.add_header(header::AUTHORIZATION, bob.authorization())
				.await;

			assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
			assert_eq!(
				response.json::<Value>()["errors"][0]["code"],
				"permission_denied"
			);
		}

		let response = app
			.get(&format!("/posts/{post_id}/comments/{id}"))
			.await;

		assert_eq!(response.json::<Value>()["text"], "nice");
		assert_eq!(count(&pool, "comment").await, 1);
	}

	#[sqlx::test]
	async fn test_trailing_slash_is_accepted(pool: Database) {
		let alice = user(&pool, "alice").await;
		let post_id = post(&pool, &alice, "hello").await;
		let app = app(pool);

		let response = app
			.post(&format!("/posts/{post_id}/comments/"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.json(&json!({ "text": "nice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);

		let id = response.json::<Value>()["id"].clone();
		let id = id.as_str().unwrap();

		let response = app.get(&format!("/posts/{post_id}/comments/")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);

		let response = app
			.get(&format!("/posts/{post_id}/comments/{id}/"))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["text"], "nice");
	}

	#[sqlx::test]
	async fn test_deleting_post_removes_comments(pool: Database) {
		let alice = user(&pool, "alice").await;
		let post_id = post(&pool, &alice, "hello").await;
		comment(&pool, post_id, &alice, "nice").await;
		let app = app(pool.clone());

		let response = app
			.delete(&format!("/posts/{post_id}"))
			.add_header(header::AUTHORIZATION, alice.authorization())
			.await;

		assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
		assert_eq!(count(&pool, "comment").await, 0);
	}
}
