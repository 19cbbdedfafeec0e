//! Debug script to inspect raw innertube search responses

use tracing_subscriber::EnvFilter;
use tubescrape_core::{ApiRequest, ClientKind, Endpoint, TubeClient, TubeScraper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tubescrape_core=debug")),
        )
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "rust programming".to_string());
    println!("Fetching search results for '{}'...\n", query);

    // Save the raw document for inspection
    let client = TubeClient::new()?;
    let request = ApiRequest::new(Endpoint::Search, ClientKind::Web).param("query", query.as_str());
    let document = client.post(&request, None, None).await?;
    std::fs::write("debug_search.json", serde_json::to_string_pretty(&document)?)?;
    println!("JSON saved to debug_search.json");

    let scraper = TubeScraper::new()?;
    let mut results = scraper.search(&query).await?;
    results.fetch_page(2).await?;

    for page in results.pages() {
        println!("\n=== Page {} ({} items) ===", page.number(), page.len());
        for item in page.items() {
            println!("{:>20}  {}", item.id(), item.title());
        }
    }
    println!("\nall fetched: {}", results.is_all_fetched());

    Ok(())
}
