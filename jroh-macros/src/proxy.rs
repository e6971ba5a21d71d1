//! Proxy procedural macro implementation
//!
//! This module contains the implementation of the `#[rpc_proxy]` attribute
//! macro. It uses `syn` to parse the annotated trait and `quote` to emit the
//! trait back together with an implementation for `jroh_client::RpcClient`.
//!
//! # Macro Expansion Process
//!
//! 1. **Parse**: Parse the trait with `syn::ItemTrait` and the macro options
//! 2. **Collect**: For each required method, read its procedure name and
//!    argument names, stripping the `#[rpc(...)]` helper attribute
//! 3. **Generate**: Build one method body per procedure that encodes the
//!    arguments and forwards to `RpcClient::call`
//! 4. **Quote**: Emit the cleaned trait and the generated impl
//!
//! # Code Generation Example
//!
//! Input:
//! ```ignore
//! #[rpc_proxy]
//! trait Math {
//!     #[rpc(name = "math.add")]
//!     async fn add(&mut self, a: i64, b: i64) -> Result<i64>;
//! }
//! ```
//!
//! Generated output:
//! ```ignore
//! #[allow(async_fn_in_trait)]
//! trait Math {
//!     async fn add(&mut self, a: i64, b: i64) -> Result<i64>;
//! }
//!
//! impl Math for ::jroh_client::RpcClient {
//!     async fn add(&mut self, a: i64, b: i64) -> Result<i64> {
//!         let params = ::jroh_client::Params::positional(vec![
//!             ::jroh_client::encode_arg(&a)?,
//!             ::jroh_client::encode_arg(&b)?,
//!         ]);
//!         Ok(::jroh_client::RpcClient::call(self, "math.add", params).await?)
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{FnArg, Ident, ItemTrait, LitStr, Pat, TraitItem, TraitItemFn};

/// How arguments are laid out in the `params` member
#[derive(Default)]
struct ProxyOptions {
    named: bool,
}

impl ProxyOptions {
    fn parse(attr: TokenStream) -> syn::Result<Self> {
        let mut options = ProxyOptions::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("named") {
                options.named = true;
                Ok(())
            } else if meta.path.is_ident("positional") {
                options.named = false;
                Ok(())
            } else {
                Err(meta.error("expected `named` or `positional`"))
            }
        });
        syn::parse::Parser::parse2(parser, attr)?;
        Ok(options)
    }
}

/// One trait method turned into a remote call
struct ProxyMethod {
    procedure: String,
    args: Vec<Ident>,
}

pub fn rpc_proxy_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(attr, item) {
        Ok(tokens) => tokens,
        Err(error) => error.to_compile_error(),
    }
}

fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let options = ProxyOptions::parse(attr)?;
    let mut item_trait: ItemTrait = syn::parse2(item)?;

    if !item_trait.generics.params.is_empty() {
        return Err(syn::Error::new(
            item_trait.generics.span(),
            "#[rpc_proxy] does not support generic traits",
        ));
    }

    let mut impl_methods = Vec::new();
    for trait_item in item_trait.items.iter_mut() {
        let TraitItem::Fn(method) = trait_item else {
            continue;
        };
        let proxy = collect_method(method)?;
        // Methods with a default body are helpers, not procedures
        if method.default.is_some() {
            continue;
        }
        impl_methods.push(generate_method(method, &proxy, options.named));
    }

    let trait_ident = &item_trait.ident;
    Ok(quote! {
        #[allow(async_fn_in_trait)]
        #item_trait

        impl #trait_ident for ::jroh_client::RpcClient {
            #(#impl_methods)*
        }
    })
}

/// Validate a method signature and read its `#[rpc(...)]` options
fn collect_method(method: &mut TraitItemFn) -> syn::Result<ProxyMethod> {
    let sig = &method.sig;
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "#[rpc_proxy] methods must be `async fn`",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_some() => {}
        Some(other) => {
            return Err(syn::Error::new(
                other.span(),
                "#[rpc_proxy] methods must take `&mut self`",
            ))
        }
        None => {
            return Err(syn::Error::new(
                sig.ident.span(),
                "#[rpc_proxy] methods must take `&mut self`",
            ))
        }
    }

    let mut args = Vec::new();
    for input in inputs {
        let FnArg::Typed(pat_type) = input else {
            return Err(syn::Error::new(input.span(), "unexpected receiver"));
        };
        match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => args.push(pat_ident.ident.clone()),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "#[rpc_proxy] arguments must be plain identifiers",
                ))
            }
        }
    }

    let mut procedure = sig.ident.to_string();
    let mut kept_attrs = Vec::with_capacity(method.attrs.len());
    for attr in method.attrs.drain(..) {
        if !attr.path().is_ident("rpc") {
            kept_attrs.push(attr);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                procedure = name.value();
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    method.attrs = kept_attrs;

    Ok(ProxyMethod { procedure, args })
}

fn generate_method(method: &TraitItemFn, proxy: &ProxyMethod, named: bool) -> TokenStream {
    let sig = &method.sig;
    let procedure = &proxy.procedure;
    let args = &proxy.args;

    let params = if args.is_empty() {
        quote! { ::jroh_client::Params::None }
    } else if named {
        let keys = args.iter().map(|arg| arg.to_string());
        quote! {
            ::jroh_client::Params::named([
                #( (#keys, ::jroh_client::encode_arg(&#args)?) ),*
            ])
        }
    } else {
        quote! {
            ::jroh_client::Params::positional(vec![
                #( ::jroh_client::encode_arg(&#args)? ),*
            ])
        }
    };

    quote! {
        #sig {
            let params = #params;
            ::std::result::Result::Ok(::jroh_client::RpcClient::call(self, #procedure, params).await?)
        }
    }
}
