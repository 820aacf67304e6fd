use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// Get all groups
/// Returns a paginated response of all groups, ordered by title.
#[route(tag = tag::GROUP)]
pub async fn get_groups(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::Group>>, RouteError> {
	let groups = sqlx::query_as::<_, model::Group>(
		r#"
			SELECT * FROM "group"
			ORDER BY title, id
			LIMIT $1 OFFSET $2
		"#,
	)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(groups))
}

/// Get single group
/// Returns a single group by its unique id.
#[route(tag = tag::GROUP)]
pub async fn get_group(
	State(database): State<Database>,
	Path(path): Path<model::GroupPath>,
) -> Result<Json<model::Group>, RouteError> {
	let group = sqlx::query_as::<_, model::Group>(r#"SELECT * FROM "group" WHERE id = $1"#)
		.bind(path.group_id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(group.ok_or(Error::UnknownGroup(path.group_id))?))
}
