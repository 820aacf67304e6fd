use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);
	let Some((summary, description)) = split_doc_comment(&function.attrs) else {
		return syn::Error::new_spanned(
			&function.sig.ident,
			"#[route] handlers need a doc comment: a summary line, then a description",
		)
		.into_compile_error()
		.into();
	};

	let docs_ident = format_ident!("{}_docs", function.sig.ident);
	let vis = &function.vis;

	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response.shape.map_or_else(|| quote!(()), |x| quote!(#x));

		match response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	quote! {
		#function

		#vis fn #docs_ident(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary).description(#description)
				#(
					.tag(#tags)
				)*
				#(
					#responses
				)*
		}
	}
	.into()
}

/// Splits a doc comment into its first line (the summary) and the rest
/// (the description). A single-line comment is used for both.
fn split_doc_comment(attrs: &[syn::Attribute]) -> Option<(String, String)> {
	let lines = attrs
		.iter()
		.filter(|attr| attr.path().is_ident("doc"))
		.filter_map(|attr| {
			let syn::Meta::NameValue(ref doc) = attr.meta else {
				return None;
			};

			let syn::Expr::Lit(syn::ExprLit {
				lit: syn::Lit::Str(ref literal),
				..
			}) = doc.value
			else {
				return None;
			};

			Some(literal.value().trim().to_owned())
		})
		.filter(|line| !line.is_empty())
		.collect::<Vec<_>>();

	let (summary, rest) = lines.split_first()?;
	let description = if rest.is_empty() {
		summary.clone()
	} else {
		rest.join(" ")
	};

	Some((summary.clone(), description))
}
