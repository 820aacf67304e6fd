use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::{punctuated::Punctuated, Meta, Token};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Returns `true` if the field type is written as `Option<...>`.
fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(ref path) = ty else {
		return false;
	};

	path.path
		.segments
		.last()
		.is_some_and(|segment| segment.ident == "Option")
}

/// Derives that only make sense for the database row, never for request input.
const ROW_ONLY_DERIVES: &[&str] = &["FromRow"];

/// Returns `true` if the attribute is `#[serde(...)]` containing one of `flags`.
fn has_serde_flag(attr: &syn::Attribute, flags: &[&str]) -> bool {
	let Meta::List(ref list) = attr.meta else {
		return false;
	};

	if !list.path.is_ident("serde") {
		return false;
	}

	list.tokens.to_token_stream().into_iter().any(|token| {
		matches!(token, TokenTree::Ident(ref ident) if flags.iter().any(|flag| ident == flag))
	})
}

/// Rewrites a struct-level attribute for the generated input structs.
///
/// `#[derive(...)]` lists lose their row-only entries, everything else is
/// forwarded untouched.
fn input_attr(attr: &syn::Attribute) -> syn::Result<proc_macro2::TokenStream> {
	if !attr.path().is_ident("derive") {
		return Ok(attr.to_token_stream());
	}

	let derives = attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
	let derives = derives.into_iter().filter(|path| {
		path.segments
			.last()
			.map_or(true, |segment| !ROW_ONLY_DERIVES.iter().any(|name| segment.ident == name))
	});

	Ok(quote!(#[derive(#(#derives),*)]))
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}Input", ident);
	let update_ident = format_ident!("Update{}Input", ident);

	let attrs = match receiver
		.attrs
		.iter()
		.map(input_attr)
		.collect::<syn::Result<Vec<_>>>()
	{
		Ok(attrs) => attrs,
		Err(e) => return e.into_compile_error().into(),
	};

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs with named fields")
			.into_compile_error()
			.into();
	};

	// Read-only fields are never part of the input structs.
	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			if field
				.attrs
				.iter()
				.any(|attr| has_serde_flag(attr, &["skip_deserializing", "skip"]))
			{
				return None;
			}

			let attrs = field
				.attrs
				.iter()
				.filter(|attr| !attr.path().is_ident("sqlx"))
				.collect::<Vec<_>>();

			Some((attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	// Nullable fields keep `null` apart from an absent key, so a partial
	// update can clear them.
	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		let nullable = is_option(ty).then(|| {
			quote!(#[serde(default, deserialize_with = "crate::route::model::double_option")])
		});

		quote! {
			#(#attrs)*
			#nullable
			#vis #ident: Option<#ty>,
		}
	});

	quote! {
		#input

		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
