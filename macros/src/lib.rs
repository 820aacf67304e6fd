mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a documentation function for the route, named after the annotated
/// function with the suffix `_docs`.
///
/// The first doc comment line becomes the operation summary, the remaining
/// lines its description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two new structs next to the model: `CreateXInput` and `UpdateXInput`.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are left out
/// of both. The remaining fields keep their attributes (minus `#[sqlx(...)]`), and
/// every field of `UpdateXInput` is wrapped in an `Option`. Row-only derives such
/// as `FromRow` are not forwarded.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
