//! Procedural macros for schoolcast-dispatch

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeSet;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Enable category inference from variant names
    #[darling(default)]
    infer_categories: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit category override
    #[darling(default)]
    category: Option<String>,

    /// Exclude from category inference
    #[darling(default)]
    skip_category: bool,
}

// Verbs that start a global action ("NavigateTo", "ShowToast").
// A variant beginning with one of these is left uncategorized.
const LEADING_VERBS: &[&str] = &[
    "Navigate", "Open", "Close", "Show", "Hide", "Toggle", "Focus", "Select", "Submit", "Cancel",
    "Confirm", "Clear", "Reset", "Set", "Next", "Prev", "Expire",
];

/// Split a PascalCase string into parts
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Infer a category from a variant name.
///
/// - `Admins(..)` → `admins` (a single word carrying a payload names a slice)
/// - `LoginSubmit`, `LoginDidFail` → `login` (first word of a compound name)
/// - `Quit`, `Tick` → none (bare unit variants are global)
/// - `NavigateTo(..)` → none (leading verb)
fn infer_category(name: &str, has_fields: bool) -> Option<String> {
    let parts = split_pascal_case(name);
    let first = parts.first()?;

    if LEADING_VERBS.contains(&first.as_str()) {
        return None;
    }
    if parts.len() == 1 && !has_fields {
        return None;
    }

    Some(to_snake_case(first))
}

/// Derive macro for the Action trait
///
/// Generates `name()` returning the variant name.
///
/// With `#[action(infer_categories)]`, also generates:
/// - an `ActionCategory` impl with `category() -> Option<&'static str>`
/// - `is_{category}()` predicates for each discovered category
/// - `CATEGORIES`, the sorted list of discovered categories
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(infer_categories)]
/// enum Action {
///     Admins(ResourceAction<Admin>),
///     LoginSubmit,
///     LoginDidFail(String),
///     NavigateTo(Page),
///     Quit,
/// }
///
/// assert_eq!(Action::LoginSubmit.category(), Some("login"));
/// assert!(Action::LoginSubmit.is_login());
/// assert_eq!(Action::Quit.category(), None);
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let pattern = |v: &ActionVariant| {
        let variant_name = &v.ident;
        match &v.fields.style {
            darling::ast::Style::Unit => quote! { #name::#variant_name },
            darling::ast::Style::Tuple => quote! { #name::#variant_name(..) },
            darling::ast::Style::Struct => quote! { #name::#variant_name { .. } },
        }
    };

    let name_arms = variants.iter().map(|v| {
        let pat = pattern(v);
        let variant_str = v.ident.to_string();
        quote! { #pat => #variant_str }
    });

    let mut expanded = quote! {
        impl schoolcast_dispatch::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    if opts.infer_categories {
        let mut categories = BTreeSet::new();
        let mut category_arms = Vec::new();

        for v in variants.iter() {
            let has_fields = !matches!(v.fields.style, darling::ast::Style::Unit);
            let category = if v.skip_category {
                None
            } else if let Some(explicit) = &v.category {
                Some(explicit.clone())
            } else {
                infer_category(&v.ident.to_string(), has_fields)
            };

            let pat = pattern(v);
            match &category {
                Some(cat) => {
                    categories.insert(cat.clone());
                    category_arms.push(quote! {
                        #pat => ::core::option::Option::Some(#cat)
                    });
                }
                None => category_arms.push(quote! {
                    #pat => ::core::option::Option::None
                }),
            }
        }

        let predicates = categories.iter().map(|cat| {
            let predicate = format_ident!("is_{}", cat);
            let doc = format!("Whether this action belongs to the `{}` category", cat);
            quote! {
                #[doc = #doc]
                pub fn #predicate(&self) -> bool {
                    schoolcast_dispatch::ActionCategory::category(self) == ::core::option::Option::Some(#cat)
                }
            }
        });
        let all: Vec<&String> = categories.iter().collect();

        expanded.extend(quote! {
            impl schoolcast_dispatch::ActionCategory for #name {
                fn category(&self) -> ::core::option::Option<&'static str> {
                    match self {
                        #(#category_arms),*
                    }
                }
            }

            impl #name {
                /// Every category discovered on this enum, sorted
                pub const CATEGORIES: &'static [&'static str] = &[#(#all),*];

                #(#predicates)*
            }
        });
    }

    TokenStream::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pascal_case() {
        assert_eq!(split_pascal_case("LoginDidFail"), vec!["Login", "Did", "Fail"]);
        assert_eq!(split_pascal_case("Quit"), vec!["Quit"]);
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("Admins"), "admins");
        assert_eq!(to_snake_case("WhatsApp"), "whats_app");
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("Admins", true).as_deref(), Some("admins"));
        assert_eq!(infer_category("LoginSubmit", false).as_deref(), Some("login"));
        assert_eq!(infer_category("SessionDidRestore", true).as_deref(), Some("session"));
        assert_eq!(infer_category("Quit", false), None);
        assert_eq!(infer_category("NavigateTo", true), None);
        assert_eq!(infer_category("ShowToast", true), None);
    }
}
