use clap::Parser;
use corona_routes::Scrape;

mod args;
use args::{Args, convert_municipality};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let municipality = convert_municipality(args.municipality);
    ::log::info!("Starting scrape for municipality: {}", municipality.name());

    let mut scrape = Scrape::new(municipality);

    if let Some(path) = &args.config {
        scrape = match scrape.with_config_file(path) {
            Ok(scrape) => scrape,
            Err(e) => {
                ::log::error!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        };
    }
    if let Some(url) = &args.webdriver_url {
        scrape = scrape.with_webdriver_url(url.clone());
    }
    if args.headless {
        scrape = scrape.with_headless(true);
    }

    let start_time = std::time::Instant::now();
    let table = match scrape.run().await {
        Ok(table) => table,
        Err(e) => {
            ::log::error!("Scrape failed: {e}");
            std::process::exit(1);
        }
    };

    ::log::info!(
        "Extracted {} rows in {:.2} seconds",
        table.len(),
        start_time.elapsed().as_secs_f64()
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&table)
    } else {
        serde_json::to_string(&table)
    };
    match json {
        Ok(out) => println!("{out}"),
        Err(e) => {
            ::log::error!("Failed to serialize table: {e}");
            std::process::exit(1);
        }
    }
}
