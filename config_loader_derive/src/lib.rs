use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

/// Derives `config_loader::ConfigType`.
///
/// The file name defaults to the lowercased type name. Both the file name and
/// the environment prefix can be set with `#[config(name = "...", env_prefix = "...")]`.
#[proc_macro_derive(ConfigType, attributes(config))]
pub fn derive_config_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;
    let mut config_name = name.to_string().to_lowercase();
    let mut env_prefix: Option<String> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("config")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                config_name = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else if meta.path.is_ident("env_prefix") {
                env_prefix = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `name` or `env_prefix`"))
            }
        });
        if let Err(e) = parsed {
            return e.to_compile_error().into();
        }
    }

    let prefix = match env_prefix {
        Some(prefix) => quote! { Some(#prefix.to_string()) },
        None => quote! { None },
    };

    let expanded = quote! {
        impl ::config_loader::ConfigType for #name {
            fn get_config_name() -> String {
                #config_name.to_string()
            }

            fn env_prefix() -> Option<String> {
                #prefix
            }
        }
    };

    expanded.into()
}
