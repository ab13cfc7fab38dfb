use fluentgen_core::config::RunConfig;
use fluentgen_core::emit::RustEmitter;
use fluentgen_core::provider::describe_derive_input;
use fluentgen_core::provider::rust_source::{ATTRIBUTE, DERIVE_NAME, derives};
use fluentgen_core::synthesize::{BuilderDescription, build_description};
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{Data, DeriveInput, parse_macro_input};

/// Path generated code uses to name `MissingRequiredValue`.
const RUNTIME_PATH: &str = "::fluentgen";

/// Generates a `<Name>Builder` with one fluent setter per field and a
/// `build()` returning `Result<Name, MissingRequiredValue>`.
///
/// - `#[builder(default)]` / `#[builder(default = expr)]` on a field makes it
///   optional; unset optional fields keep their default.
/// - `Option<T>` fields may be left unset and become `None`.
/// - `#[builder(name = "..", prefix = "..", optimize_copy)]` on the struct
///   renames the builder, prefixes setters, or shares one default instance
///   when every field is optional (requires `Clone + Send + Sync`).
#[proc_macro_derive(Builder, attributes(builder))]
pub fn builder_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Marks a struct for `fluentgen generate`, which writes its builder to a
/// separate source file.
///
/// The struct is left as written apart from its `#[builder(...)]`
/// attributes, which the generator reads from source. They are checked here
/// so that mistakes show up at compile time. A struct is either marked or
/// derives `Builder`, never both.
#[proc_macro_attribute]
pub fn generate_builder(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    let mut input = parse_macro_input!(item as DeriveInput);

    let checked = check_marked(&args, &input);
    strip_builder_attributes(&mut input);
    let mut tokens = input.into_token_stream();
    if let Err(err) = checked {
        tokens.extend(err.to_compile_error());
    }
    tokens.into()
}

fn describe(input: &DeriveInput) -> syn::Result<BuilderDescription> {
    let (description, declared) = describe_derive_input(input, &[])?;
    let config = declared.resolve();

    build_description(&description, &config, &RunConfig::default())
        .map_err(|e| syn::Error::new_spanned(&input.ident, e))
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let builder = describe(input)?;

    RustEmitter::new(RUNTIME_PATH)
        .with_visibility(input.vis.to_token_stream().to_string())
        .emit_tokens(&builder)
        .map_err(|e| syn::Error::new_spanned(&input.ident, e))
}

fn check_marked(args: &proc_macro2::TokenStream, input: &DeriveInput) -> syn::Result<()> {
    if !args.is_empty() {
        return Err(syn::Error::new_spanned(
            args,
            "`generate_builder` takes no arguments",
        ));
    }
    if derives(&input.attrs, DERIVE_NAME) {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`generate_builder` cannot be combined with `#[derive(Builder)]`",
        ));
    }
    describe(input).map(|_| ())
}

fn strip_builder_attributes(input: &mut DeriveInput) {
    input.attrs.retain(|attr| !attr.path().is_ident(ATTRIBUTE));
    if let Data::Struct(data) = &mut input.data {
        for field in data.fields.iter_mut() {
            field.attrs.retain(|attr| !attr.path().is_ident(ATTRIBUTE));
        }
    }
}
