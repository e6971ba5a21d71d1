//! Simple JSON-RPC over HTTP client example
//!
//! Calls a calculator service through a proxy trait and through the untyped
//! API, with wire traces printed to stderr.
//!
//! Run with: cargo run --example calculator -- http://127.0.0.1:8080/rpc

use jroh::client::{Error, Params, Result};
use jroh::{rpc_proxy, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct GreetParams {
    name: String,
}

#[derive(Deserialize)]
struct GreetResult {
    message: String,
}

#[rpc_proxy]
trait Calculator {
    async fn add(&mut self, a: i64, b: i64) -> Result<i64>;

    #[rpc(name = "math.divide")]
    async fn divide(&mut self, a: f64, b: f64) -> Result<f64>;
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("jroh::wire=debug")
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080/rpc".to_string());
    println!("Calling JSON-RPC server at {}", url);

    let mut client = ClientBuilder::new(url)
        .timeout(Duration::from_secs(5))
        .debug(true)
        .build()?;

    println!("add(5, 3) = {}", client.add(5, 3).await?);

    match client.divide(1.0, 0.0).await {
        Ok(quotient) => println!("divide(1, 0) = {}", quotient),
        Err(Error::InvalidParams(data)) => println!("divide(1, 0) rejected: {}", data.message),
        Err(e) => return Err(e.into()),
    }

    // Struct params go out as a named `params` object
    let params = Params::from_serialize(&GreetParams {
        name: "Alice".to_string(),
    })?;
    let greeting: GreetResult = client.call("greet", params).await?;
    println!("greet('Alice') = {}", greeting.message);

    Ok(())
}
