use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
};

use super::model;

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}
