mod shipping;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "auraverde-cli")]
#[command(about = "Aura Verde shipping command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Quote shipping for an address and cart size
    Quote {
        /// Free-text delivery address
        #[arg(long, conflicts_with_all = ["street", "city", "zip"])]
        address: Option<String>,
        /// Street and number, combined with --city and --zip
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        /// Total number of items in the cart
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        items: i64,
    },
    /// Distance from the store to a coordinate and the tier it falls in
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Print the active shipping policy as YAML
    Policy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = auraverde_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Quote {
            address,
            street,
            city,
            zip,
            items,
        }) => {
            let address = shipping::resolve_address(address, street, city, zip);
            shipping::run_quote(&config, address.as_deref(), items).await?;
        }
        Some(Commands::Distance { lat, lon }) => {
            shipping::run_distance(&config.shipping_policy()?, lat, lon)?;
        }
        Some(Commands::Policy) => shipping::run_policy(&config.shipping_policy()?)?,
        None => println!("auraverde-cli: run with --help to list commands"),
    }

    Ok(())
}
