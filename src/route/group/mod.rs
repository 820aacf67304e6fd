use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown group {0}")]
	UnknownGroup(Uuid),
}

pub type RouteError = error::RouteError<Error>;

/// Read-only routes, any other method is answered with `405 Method Not Allowed`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_groups, get_groups_docs))
		.api_route("/:group_id", get_with(get_group, get_group_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownGroup(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let Self::UnknownGroup(group) = self;

		error::Message::new("unknown_group")
			.content("The group you requested does not exist.")
			.detail("group", group.to_string())
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_list_and_retrieve(pool: Database) {
		let dogs = group(&pool, "dogs").await;
		group(&pool, "cats").await;
		let app = app(pool);

		let response = app.get("/groups/").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let groups = response.json::<Value>();

		assert_eq!(groups[0]["slug"], "cats");
		assert_eq!(groups[1]["slug"], "dogs");

		let response = app.get(&format!("/groups/{dogs}/")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["title"], "Dogs");
	}

	#[sqlx::test]
	async fn test_missing_group_is_not_found(pool: Database) {
		let app = app(pool);

		let response = app.get(&format!("/groups/{}", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_writes_are_not_allowed(pool: Database) {
		let alice = user(&pool, "alice").await;
		let dogs = group(&pool, "dogs").await;
		let app = app(pool);

		for request in [
			app.post("/groups").json(&json!({ "title": "Birds", "slug": "birds" })),
			app.post("/groups/").json(&json!({ "title": "Birds", "slug": "birds" })),
			app.put(&format!("/groups/{dogs}/")).json(&json!({ "title": "Wolves" })),
			app.put(&format!("/groups/{dogs}")).json(&json!({ "title": "Wolves" })),
			app.patch(&format!("/groups/{dogs}")).json(&json!({ "title": "Wolves" })),
			app.delete(&format!("/groups/{dogs}")),
		] {
			let response = request
				.add_header(header::AUTHORIZATION, alice.authorization())
				.await;

			assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
		}
	}
}
