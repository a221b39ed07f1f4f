use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Attribute, Expr, ExprLit, ExprPath, Ident, Lit, LitStr, Result, Token, Visibility};

use proc_macro_crate::{crate_name, FoundCrate};

/// Tag text that resets every level; never valid as a declared tag.
const WILDCARD: &str = "*";

struct TagDecl {
    /// `///` comments, forwarded onto the generated const.
    docs: Vec<Attribute>,
    /// `#[level = warn]` preset, already mapped to a `Level` variant.
    level: Option<Ident>,
    name: Ident,
    text: LitStr,
}

struct LogTagsInput {
    vis: Visibility,
    root: Ident,
    tags: Vec<TagDecl>,
}

impl Parse for LogTagsInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let vis: Visibility = input.parse()?;
        input.parse::<Token![mod]>()?;
        let root: Ident = input.parse()?;
        let content;
        braced!(content in input);

        let mut tags = Vec::new();
        while !content.is_empty() {
            tags.push(content.parse()?);
        }
        Ok(Self { vis, root, tags })
    }
}

impl Parse for TagDecl {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut docs = Vec::new();
        let mut level = None;
        for attr in input.call(Attribute::parse_outer)? {
            if attr.path().is_ident("doc") {
                docs.push(attr);
            } else if attr.path().is_ident("level") {
                let value = &attr.meta.require_name_value()?.value;
                level = Some(level_variant(value)?);
            } else {
                return Err(syn::Error::new_spanned(
                    attr,
                    "unsupported attribute; expected `#[level = ...]`",
                ));
            }
        }

        let name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let text: LitStr = input.parse()?;
        input.parse::<Token![;]>()?;

        Ok(Self {
            docs,
            level,
            name,
            text,
        })
    }
}

/// Map `warn`, `"warn"`, `Warn`, ... to the `Level` variant ident.
fn level_variant(value: &Expr) -> Result<Ident> {
    let (name, span) = match value {
        Expr::Path(ExprPath { path, .. }) if path.get_ident().is_some() => {
            let ident = &path.segments[0].ident;
            (ident.to_string(), ident.span())
        }
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => (lit.value(), lit.span()),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "expected a level name such as `warn` or \"warn\"",
            ));
        }
    };

    let variant = match name.to_ascii_lowercase().as_str() {
        "none" | "off" => "None",
        "error" => "Error",
        "warn" | "warning" => "Warn",
        "info" => "Info",
        "debug" => "Debug",
        "verbose" => "Verbose",
        _ => {
            return Err(syn::Error::new(
                span,
                format!("unknown log level `{name}`; expected none, error, warn, info, debug or verbose"),
            ));
        }
    };
    Ok(Ident::new(variant, span))
}

// =============================================================================
// Validation (runs at macro expansion time)
// =============================================================================

fn validate(tags: &[TagDecl]) -> Result<()> {
    let mut errors = Vec::new();

    for (i, decl) in tags.iter().enumerate() {
        let text = decl.text.value();
        if text.is_empty() {
            errors.push(syn::Error::new(decl.text.span(), "log tag must not be empty"));
        } else if text == WILDCARD {
            errors.push(syn::Error::new(
                decl.text.span(),
                "`*` resets every tag and cannot be declared as a tag",
            ));
        }

        let earlier = &tags[..i];
        if earlier.iter().any(|prev| prev.name == decl.name) {
            errors.push(syn::Error::new(
                decl.name.span(),
                format!("duplicate tag constant `{}`", decl.name),
            ));
        }
        if earlier.iter().any(|prev| prev.text.value() == text) {
            errors.push(syn::Error::new(
                decl.text.span(),
                format!("tag \"{text}\" is declared more than once"),
            ));
        }
    }

    let mut errors = errors.into_iter();
    match errors.next() {
        None => Ok(()),
        Some(mut first) => {
            first.extend(errors);
            Err(first)
        }
    }
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn tag_level_crate_path() -> TokenStream2 {
    match crate_name("tag-level") {
        Ok(FoundCrate::Itself) => quote!(::tag_level),
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::tag_level),
    }
}

// =============================================================================
// Code generation
// =============================================================================

fn generate(input: &LogTagsInput, krate: &TokenStream2) -> TokenStream2 {
    let consts = input.tags.iter().map(|decl| {
        let TagDecl {
            docs, name, text, ..
        } = decl;
        quote! {
            #(#docs)*
            pub const #name: #krate::Tag = #krate::Tag::new(#text);
        }
    });

    let names = input.tags.iter().map(|decl| &decl.name);
    let presets = input.tags.iter().filter_map(|decl| {
        let level = decl.level.as_ref()?;
        let text = &decl.text;
        Some(quote! {
            #krate::LevelPreset::new(#text, #krate::Level::#level),
        })
    });
    let count = input.tags.len();

    let vis = &input.vis;
    let root = &input.root;
    quote! {
        #vis mod #root {
            #(#consts)*

            /// Every declared tag, in declaration order.
            pub const ALL: &[#krate::Tag] = &[#(#names),*];

            /// Levels declared with `#[level = ...]`, in declaration order.
            pub const PRESETS: &[#krate::LevelPreset] = &[#(#presets)*];

            /// Number of declared tags.
            pub const COUNT: usize = #count;
        }
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Declare a module of log tag constants.
///
/// ```ignore
/// tag_level::log_tags! {
///     pub mod tags {
///         /// Network stack.
///         NET = "net";
///         #[level = warn]
///         WIFI = "wifi";
///     }
/// }
///
/// let config = TagLevelsConfig::new().presets(tags::PRESETS);
/// log_info!(logger, tags::NET, "up");
/// ```
#[proc_macro]
pub fn log_tags(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as LogTagsInput);
    if let Err(error) = validate(&input.tags) {
        return error.to_compile_error().into();
    }
    generate(&input, &tag_level_crate_path()).into()
}
