//! Annotate a sentence and print the partitioned text

use dexter_client::{DexterClient, Segment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment (DEXTER_URL)
    let client = DexterClient::from_env()?;

    println!("=== Nice Annotate ===");
    let segments = client
        .nice_annotate("Dexter is an American television drama.", 0.8)
        .await?;

    for segment in &segments {
        match segment {
            Segment::Text(text) => println!("  text:   {:?}", text),
            Segment::Entity { mention, entity } => println!("  entity: {:?} -> {}", mention, entity),
        }
    }

    println!("\n=== Relatedness ===");
    let result = client
        .relatedness("Paris", "France", dexter_client::MILNE_WITTEN, true)
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
