//! Debug script to list stream formats of a video

use tracing_subscriber::EnvFilter;
use tubescrape_core::TubeScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tubescrape_core=trace")),
        )
        .init();

    let video = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.youtube.com/watch?v=jNQXAC9IVRw".to_string());

    let scraper = TubeScraper::new()?;
    let streams = scraper.stream_info(&video).await?;

    for stream in streams.items() {
        println!(
            "{:>4} {:>8} kbps  {:<8} {}",
            stream.itag().map(|i| i.to_string()).unwrap_or_default(),
            stream.bitrate() / 1000,
            stream.quality_label().unwrap_or("audio"),
            stream.mime_type()
        );
    }

    if let Some(best) = streams.items().filter(|s| s.is_audio()).max_by_key(|s| s.bitrate()) {
        println!("\nBest audio: {}", best.url());
    }

    Ok(())
}
