//! Help HOF CLI - storefront and admin panel in the terminal.
//!
//! Commands:
//! - `hof db` - Create tables and seed defaults
//! - `hof catalog` - Browse the storefront catalog
//! - `hof checkout` - Send an order over WhatsApp
//! - `hof login` / `hof logout` / `hof whoami` - Admin session
//! - `hof product` / `hof category` / `hof order` / `hof settings` - Admin panel
//! - `hof config` - Manage configuration

mod commands;
mod config;
mod context;
mod launcher;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hof_commerce::CommerceError;

use commands::{
    CatalogArgs, CategoryArgs, CheckoutArgs, ConfigArgs, DbArgs, LoginArgs, OrderArgs,
    ProductArgs, SettingsArgs,
};

/// Help HOF - storefront and admin tools
#[derive(Parser)]
#[command(name = "hof")]
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

    /// Work against an in-memory store seeded with the starter catalog
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the database
    Db(DbArgs),

    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Place an order and open it in WhatsApp
    Checkout(CheckoutArgs),

    /// Log in to the admin panel
    Login(LoginArgs),

    /// Log out of the admin panel
    Logout,

    /// Show whether you are logged in
    Whoami,

    /// Manage products
    Product(ProductArgs),

    /// Manage categories
    Category(CategoryArgs),

    /// Manage orders
    Order(OrderArgs),

    /// Manage store settings
    Settings(SettingsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone(), cli.offline) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Db(args) => commands::db::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Category(args) => commands::category::run(args, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Settings(args) => commands::settings::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        // domain errors were already shown as notices
        if e.downcast_ref::<CommerceError>().is_none() {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}
