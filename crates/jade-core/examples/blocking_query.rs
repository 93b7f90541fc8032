use jade_core::{GptClient, QueryOptions};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads OPENAI_API_TOKEN when no token is passed explicitly
    let mut client = GptClient::new(None)?;

    let options = QueryOptions::new().timeout(Duration::from_secs(60));
    let answer = client.scoped(|client| {
        client.query_with("Name three uses of the Rust borrow checker.", &options)
    })?;

    println!("{answer}");
    Ok(())
}
