use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn first_page() -> i64 {
	1
}

#[inline]
fn default_size() -> i64 {
	DEFAULT_PAGE_SIZE
}

/// Deserializes a present field into `Some`, keeping an explicit `null` as
/// `Some(None)`. Paired with `#[serde(default)]`, an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

/// Pagination parameters shared by every list endpoint.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "first_page")]
	pub page: i64,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "default_size")]
	pub size: i64,
}

impl Paginate {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}
}
