//! JROH - JSON-RPC 2.0 Over HTTP
//!
//! This is the main convenience crate that re-exports all JROH sub-crates.
//! Use this crate if you want a single dependency for making JSON-RPC calls.
//!
//! # Architecture
//!
//! JROH is organized into modular crates:
//!
//! - **jroh-core**: Envelopes, response classification, error mapping, observability
//! - **jroh-client**: HTTP dispatcher with batching, headers and debug tracing
//! - **jroh-macros**: Procedural macro for typed proxy traits
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jroh::RpcClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RpcClient::new("http://localhost:8080/rpc")?;
//!
//!     let sum: i64 = client.call("add", json!([5, 3])).await?;
//!     println!("Result: {}", sum);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Proxy Trait
//!
//! ```rust,no_run
//! use jroh::{rpc_proxy, ClientBuilder};
//!
//! #[rpc_proxy]
//! trait Calculator {
//!     async fn add(&mut self, a: i64, b: i64) -> jroh::client::Result<i64>;
//!
//!     #[rpc(name = "math.sqrt")]
//!     async fn sqrt(&mut self, x: f64) -> jroh::client::Result<f64>;
//! }
//!
//! # async fn example() -> jroh::client::Result<()> {
//! let mut client = ClientBuilder::new("http://localhost:8080/rpc").build()?;
//! let sum = client.add(5, 3).await?;
//! let root = client.sqrt(16.0).await?;
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs from sub-crates
pub use jroh_client as client;
pub use jroh_core as core;
pub use jroh_macros as macros;

// Convenience re-exports of the most commonly used types
pub use jroh_client::{ClientBuilder, RpcClient};
pub use jroh_macros::rpc_proxy;
