//! Bazaar - storefront command line client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bazaar products --search mug
//! bazaar product 3
//!
//! # Manage the session
//! bazaar login -u ada -p secret
//! bazaar me
//! bazaar logout
//!
//! # Work with the cart
//! bazaar cart add 3
//! bazaar cart set 3 2
//! bazaar cart show
//! ```

use std::sync::Arc;

use bazaar_application::Session;
use bazaar_application::ports::AuthEvents;
use bazaar_domain::{Credentials, ProductId, ProductInput, ProductQuery, Registration};
use bazaar_infrastructure::{Config, FileCartRepository, FileCredentialStore, ReqwestHttpClient};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Filter by name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category id
        #[arg(short, long)]
        category: Option<i64>,

        /// Server-side ordering, e.g. `price` or `-price`
        #[arg(short, long)]
        ordering: Option<String>,
    },
    /// Show one product
    Product {
        /// Product id
        id: i64,
    },
    /// List categories
    Categories,
    /// Create an account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Shipping address
        #[arg(long)]
        address: Option<String>,
    },
    /// Log in and store the session tokens
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Drop the stored session tokens
    Logout,
    /// Show the authenticated user's profile
    Me,
    /// Work with the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: i64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: i64,
    },
    /// Set a line's quantity; zero removes the line
    Set {
        /// Product id
        id: i64,
        /// New quantity
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

/// Event sink pointing the user back at `login` when the session dies.
struct CliAuthEvents;

impl AuthEvents for CliAuthEvents {
    fn session_expired(&self) {
        eprintln!("session expired, run `bazaar login` to sign in again");
    }
}

type CliSession =
    Session<ReqwestHttpClient, FileCredentialStore, FileCartRepository, CliAuthEvents>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let http = Arc::new(ReqwestHttpClient::new(config.api_base_url.clone())?);
    let credentials = Arc::new(FileCredentialStore::new(&config.data_dir));
    let cart_repo = Arc::new(FileCartRepository::new(&config.data_dir));
    let mut session: CliSession =
        Session::new(http, credentials, cart_repo, Arc::new(CliAuthEvents)).await;

    match cli.command {
        Commands::Products {
            search,
            category,
            ordering,
        } => {
            let query = ProductQuery {
                search,
                category,
                ordering,
            };
            commands::list_products(&session, &query).await?;
        }
        Commands::Product { id } => {
            commands::show_product(&session, ProductId(id)).await?;
        }
        Commands::Categories => commands::list_categories(&session).await?,
        Commands::Register {
            username,
            email,
            password,
            phone,
            address,
        } => {
            let registration = Registration {
                username,
                email,
                password,
                phone_number: phone,
                address,
            };
            commands::register(&session, &registration).await?;
        }
        Commands::Login { username, password } => {
            let credentials = Credentials { username, password };
            commands::login(&mut session, &credentials).await?;
        }
        Commands::Logout => {
            session.logout().await;
            println!("logged out");
        }
        Commands::Me => commands::show_profile(&session).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::show_cart(&session),
            CartAction::Add { id } => {
                // The server is the source of truth for the price lock.
                let product = session.api().product(ProductId(id)).await?;
                session.cart_mut().add_item(ProductInput::from(&product)).await?;
                commands::show_cart(&session);
            }
            CartAction::Remove { id } => {
                session.cart_mut().remove_item(ProductId(id)).await?;
                commands::show_cart(&session);
            }
            CartAction::Set { id, quantity } => {
                session
                    .cart_mut()
                    .update_quantity(ProductId(id), quantity)
                    .await?;
                commands::show_cart(&session);
            }
            CartAction::Clear => {
                session.cart_mut().clear().await?;
                println!("cart emptied");
            }
        },
    }
    Ok(())
}
