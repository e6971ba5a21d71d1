//! Procedural macros for jroh JSON-RPC toolkit
//!
//! This crate provides an attribute macro that turns a Rust trait into a
//! typed JSON-RPC proxy over `jroh_client::RpcClient`. Each trait method
//! becomes one remote procedure: arguments are encoded into `params`, the
//! call is sent, and the result is decoded into the method's return type.
//!
//! # Available Macros
//!
//! ## `#[rpc_proxy]` - JSON-RPC Proxy Trait
//!
//! Without macros, you'd write:
//!
//! ```ignore
//! let sum: i64 = client.call("add", Params::positional(vec![
//!     encode_arg(&5)?,
//!     encode_arg(&3)?,
//! ])).await?;
//! ```
//!
//! With macros, you write:
//!
//! ```ignore
//! #[jroh::rpc_proxy]
//! trait Calculator {
//!     async fn add(&mut self, a: i64, b: i64) -> jroh::client::Result<i64>;
//! }
//!
//! let sum = client.add(5, 3).await?;
//! ```
//!
//! The generated code refers to `::jroh_client`, so the calling crate must
//! depend on `jroh-client` directly or through `jroh`.

mod proxy;

use proc_macro::TokenStream;

/// Attribute macro implementing a trait for `RpcClient` as remote calls
///
/// # Requirements
///
/// Every method without a default body must:
/// - Be an `async fn` taking `&mut self`
/// - Bind each argument to a plain identifier; argument types implement `Serialize`
/// - Return `Result<T, E>` where `T: DeserializeOwned` and `E: From<jroh_core::Error>`
///
/// Methods with a default body are left alone and can build on the others.
///
/// # Options
///
/// - `#[rpc_proxy]` or `#[rpc_proxy(positional)]`: arguments are sent as a
///   positional `params` array in declaration order
/// - `#[rpc_proxy(named)]`: arguments are sent as a `params` object keyed by
///   argument name
///
/// A method with no arguments sends no `params` member at all.
///
/// # Procedure Names
///
/// The procedure name defaults to the method name. Use `#[rpc(name = "...")]`
/// on a method for names that are not valid Rust identifiers:
///
/// ```ignore
/// #[rpc_proxy(named)]
/// trait Wallet {
///     #[rpc(name = "wallet.get_balance")]
///     async fn balance(&mut self, account: String) -> Result<u64>;
///
///     async fn ping(&mut self) -> Result<String>;
/// }
/// ```
///
/// # Limitations
///
/// - Generic traits are not supported
/// - Calls made through the proxy fail with `Error::Internal` while a batch
///   is open on the client
#[proc_macro_attribute]
pub fn rpc_proxy(attr: TokenStream, item: TokenStream) -> TokenStream {
    proxy::rpc_proxy_impl(attr.into(), item.into()).into()
}
