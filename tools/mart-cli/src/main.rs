//! Mart CLI - Command line storefront for the Mart wholesale marketplace.
//!
//! Commands:
//! - `mart catalog` - Browse products, categories and brands
//! - `mart cart` - Show and change the cart
//! - `mart compare` - Pick up to four products to compare
//! - `mart checkout` - Place an order for the cart
//! - `mart orders` - List and track orders
//! - `mart addresses` - Manage delivery addresses
//! - `mart login` / `mart logout` - Store or drop the access token
//! - `mart config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mart_observability::{init_logging, LogFormat, LogLevel};

use commands::{
    AddressesArgs, CartArgs, CatalogArgs, CheckoutArgs, CompareArgs, ConfigArgs, LoginArgs,
    OrdersArgs,
};

/// Mart CLI - Browse the catalog, manage the cart and place wholesale orders
#[derive(Parser)]
#[command(name = "mart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Show or change the cart
    Cart(CartArgs),

    /// Compare products side by side
    Compare(CompareArgs),

    /// Place an order for the current cart
    Checkout(CheckoutArgs),

    /// List and track orders
    Orders(OrdersArgs),

    /// Manage delivery addresses
    Addresses(AddressesArgs),

    /// Store an access token
    Login(LoginArgs),

    /// Drop the stored access token
    Logout,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let mut log = ctx.config.logging.clone();
    if cli.verbose {
        log = log.with_level(LogLevel::Debug);
    }
    if cli.json {
        log = log.with_format(LogFormat::Json);
    }
    if let Err(e) = init_logging(&log) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Compare(args) => commands::compare::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Addresses(args) => commands::addresses::run(args, &ctx).await,
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
