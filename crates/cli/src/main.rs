//! Shopfront CLI - Storefront client on the command line.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! sf-cli departments
//! sf-cli categories --department d1
//! sf-cli products --search lamp --sort -price --page 2
//! sf-cli product p1 --html
//!
//! # Fill the guest cart, then sign in to move it to your account
//! sf-cli cart add p1 --quantity 2
//! sf-cli login -e shopper@example.com
//! sf-cli cart count
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `department`, `departments`, `categories` - Catalog
//! - `cart add|count|show|set|remove|clear` - Cart
//! - `login`, `register`, `logout` - Account
//!
//! Configuration comes from the environment (see
//! `shopfront_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_storefront::config::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

use commands::Context;
use commands::catalog::ListingArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        #[command(flatten)]
        filters: ListingArgs,

        /// Render HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
    /// Show a product
    Product {
        /// Product ID
        id: String,

        /// Render HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
    /// Show a department and its categories
    Department {
        /// Department ID
        id: String,

        /// Render HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
    /// List departments
    Departments {
        /// Render HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
    /// List categories
    Categories {
        /// Only categories of this department
        #[arg(short, long)]
        department: Option<String>,

        /// Render HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in and move the guest cart to your account
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and move the guest cart to it
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        /// Product ID
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show the number of items in the cart
    Count {
        /// Render the cart badge HTML
        #[arg(long)]
        html: bool,
    },
    /// Show the guest cart
    Show {
        /// Render the cart table HTML
        #[arg(long)]
        html: bool,
    },
    /// Set the quantity of a guest cart line (0 removes it)
    Set {
        /// Product ID
        product_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a product from the guest cart
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Empty the guest cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,sf_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        let _ = writeln!(std::io::stderr(), "Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let ctx = Context::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Products { filters, html } => {
            commands::catalog::products(&ctx, &filters, html, &mut out).await?;
        }
        Commands::Product { id, html } => {
            commands::catalog::product(&ctx, &id, html, &mut out).await?;
        }
        Commands::Department { id, html } => {
            commands::catalog::department(&ctx, &id, html, &mut out).await?;
        }
        Commands::Departments { html } => {
            commands::catalog::departments(&ctx, html, &mut out).await?;
        }
        Commands::Categories { department, html } => {
            commands::catalog::categories(&ctx, department.as_deref(), html, &mut out).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, &product_id, quantity, &mut out).await?,
            CartAction::Count { html } => commands::cart::count(&ctx, html, &mut out).await?,
            CartAction::Show { html } => commands::cart::show(&ctx, html, &mut out).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&ctx, &product_id, quantity, &mut out)?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&ctx, &product_id, &mut out)?;
            }
            CartAction::Clear => commands::cart::clear(&ctx, &mut out)?,
        },
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, password, &mut out).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            commands::auth::register(&ctx, &name, &email, password, &mut out).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
