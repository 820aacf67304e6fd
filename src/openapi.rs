use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json};

pub const SECURITY_SCHEME_SESSION: &str = "Session";
pub const SECURITY_SCHEME_API_KEY: &str = "API Key";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const GROUP: &str = "Group";
	pub const COMMENT: &str = "Comment";
}

fn describe_tag(name: &str, description: &str) -> Tag {
	Tag {
		name: name.into(),
		description: Some(description.into()),
		..Default::default()
	}
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Yatube API")
		.summary("Posts, groups and comments")
		.description(include_str!("../README.md"))
		.tag(describe_tag(tag::AUTH, "The authenticated user"))
		.tag(describe_tag(tag::POST, "Posts, writable by their author"))
		.tag(describe_tag(tag::GROUP, "Read-only groups that posts are published in"))
		.tag(describe_tag(tag::COMMENT, "Comments on a single post, writable by their author"))
		.security_scheme(
			SECURITY_SCHEME_API_KEY,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: "Authorization".into(),
				description: Some("An API key, sent as `Bearer <key>`".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: crate::extract::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				errors: error::Message::new("unknown_post")
					.content("The post you requested does not exist.")
					.detail("post", "0f9c2b7e-5d0c-4a8f-9a51-3c2d1e0b7a64")
					.into_vec(),
			})
		})
}
