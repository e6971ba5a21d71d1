//! Batch request example
//!
//! Queues several calls and sends them as one HTTP request, then shows
//! how a failing member fails the whole batch.
//!
//! Run with: cargo run --example batch -- http://127.0.0.1:8080/rpc

use jroh::client::{BatchCorrelation, Dispatched};
use jroh::ClientBuilder;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080/rpc".to_string());

    let mut client = ClientBuilder::new(url)
        .batch_correlation(BatchCorrelation::ById)
        .build()?;

    // Chained form
    let results = client
        .batch()
        .enqueue("add", json!([1, 2]))
        .enqueue("add", json!([3, 4]))
        .enqueue("echo", json!({"message": "hello"}))
        .send()
        .await?;
    for (i, result) in results.iter().enumerate() {
        println!("result[{}] = {}", i, result);
    }

    // Statement form: execute() reports where each call was queued
    client.batch();
    for n in 0..3 {
        if let Dispatched::Queued { position } = client.execute("square", json!([n])).await? {
            println!("square({}) queued at {}", n, position);
        }
    }
    println!("squares = {:?}", client.send().await?);

    // One bad member fails the batch; the client is back in immediate mode
    let outcome = client
        .batch()
        .enqueue("add", json!([1, 1]))
        .enqueue("no_such_method", ())
        .send()
        .await;
    match outcome {
        Ok(results) => println!("unexpected success: {:?}", results),
        Err(e) => println!("batch failed: {} (batching: {})", e, client.is_batching()),
    }

    Ok(())
}
