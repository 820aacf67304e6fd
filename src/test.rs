//! Helpers for route tests. Every test gets its own database from `#[sqlx::test]`,
//! with the migrations already applied.

pub use axum::http::{header, HeaderValue, StatusCode};
pub use serde_json::{json, Value};
pub use uuid::Uuid;

pub use crate::Database;

use axum_test::TestServer;

pub fn app(database: Database) -> TestServer {
	TestServer::new(crate::trim_trailing_slash(crate::router(crate::State { database }))).unwrap()
}

/// A user provisioned directly in the database, with one session and one API key.
pub struct TestUser {
	pub id: Uuid,
	pub session: Uuid,
	pub key: Uuid,
}

impl TestUser {
	pub fn authorization(&self) -> HeaderValue {
		HeaderValue::from_str(&format!("Bearer {}", self.key)).unwrap()
	}

	pub fn session_cookie(&self) -> HeaderValue {
		HeaderValue::from_str(&format!("{}={}", crate::extract::COOKIE_NAME, self.session)).unwrap()
	}
}

pub async fn user(database: &Database, username: &str) -> TestUser {
	let id = sqlx::query_scalar::<_, Uuid>(r#"INSERT INTO "user" (username) VALUES ($1) RETURNING id"#)
		.bind(username)
		.fetch_one(database)
		.await
		.unwrap();

	let session = sqlx::query_scalar::<_, Uuid>("INSERT INTO session (user_id) VALUES ($1) RETURNING id")
		.bind(id)
		.fetch_one(database)
		.await
		.unwrap();

	let key = sqlx::query_scalar::<_, Uuid>("INSERT INTO api_key (user_id) VALUES ($1) RETURNING id")
		.bind(id)
		.fetch_one(database)
		.await
		.unwrap();

	TestUser { id, session, key }
}

/// Creates a group titled after its slug, e.g. `cats` becomes `Cats`.
pub async fn group(database: &Database, slug: &str) -> Uuid {
	let mut chars = slug.chars();
	let title = chars
		.next()
		.map(|first| first.to_uppercase().chain(chars).collect::<String>())
		.unwrap_or_default();

	sqlx::query_scalar::<_, Uuid>(
		r#"INSERT INTO "group" (title, slug, description) VALUES ($1, $2, '') RETURNING id"#,
	)
	.bind(title)
	.bind(slug)
	.fetch_one(database)
	.await
	.unwrap()
}

pub async fn post(database: &Database, author: &TestUser, text: &str) -> Uuid {
	sqlx::query_scalar::<_, Uuid>("INSERT INTO post (author_id, text) VALUES ($1, $2) RETURNING id")
		.bind(author.id)
		.bind(text)
		.fetch_one(database)
		.await
		.unwrap()
}

pub async fn comment(database: &Database, post: Uuid, author: &TestUser, text: &str) -> Uuid {
	sqlx::query_scalar::<_, Uuid>(
		"INSERT INTO comment (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
	)
	.bind(post)
	.bind(author.id)
	.bind(text)
	.fetch_one(database)
	.await
	.unwrap()
}

/// Counts the rows of a table.
pub async fn count(database: &Database, table: &str) -> i64 {
	sqlx::query_scalar::<_, i64>(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
		.fetch_one(database)
		.await
		.unwrap()
}
