use std::process::exit;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use serde_json::json;
use trendlab_client::api::{AdsRequest, CampaignRequest, OfferRequest, ProductSearch, TopicSearch};
use trendlab_client::{Client, ClientConfig, Result};

fn init_logging() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Debug));

    if let Ok(config) = config {
        let _ = log4rs::init_config(config);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // The base URL may be passed as the first argument; otherwise the
    // environment decides.
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(url) => ClientConfig::new(url)?.with_verbose(true),
        None => ClientConfig::from_env()?,
    };
    let client = Client::new(config)?;

    // Check status
    match client.system().health().await {
        Ok(health) => println!("API health: {}", health),
        Err(err) => {
            eprintln!("API unreachable: {}", err.message());
            if err.is_network_error() {
                eprintln!("Is the service running at {}?", client.base_url());
            }
            exit(1);
        }
    }

    // Topics
    let trending = client.topics().trending(None).await?;
    println!("Trending topics: {}", trending);

    let topics = client
        .topics()
        .search(&TopicSearch::new("home workouts"))
        .await?;
    println!("Topic search: {}", topics);

    // Products
    let categories = client.products().categories().await?;
    println!("Product categories: {}", categories);

    let products = client
        .products()
        .search(&ProductSearch {
            max_difficulty: 5,
            ..ProductSearch::new("home workouts")
        })
        .await?;
    println!("Product search: {}", products);

    // Content generation
    let offer = client
        .generate()
        .offer(&OfferRequest::new("home workouts"))
        .await?;
    println!("Offer: {}", offer);

    let ads = client
        .generate()
        .ads(&AdsRequest {
            offer: offer.clone(),
            ..AdsRequest::default()
        })
        .await?;
    println!("Ads: {}", ads);

    let product = json!({"name": "30-day bodyweight plan", "type": "ebook"});
    match client
        .generate()
        .complete(&CampaignRequest::new("home workouts"), &product)
        .await
    {
        Ok(campaign) => println!("Campaign: {}", campaign),
        Err(err) if err.is_timeout() => eprintln!("Campaign generation timed out"),
        Err(err) => eprintln!("Campaign generation failed: {}", err.message()),
    }

    Ok(())
}
