//! HopeFlow CLI - browse and manage the charity marketplace from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (token is persisted for later invocations)
//! hope-cli auth login -e donor@example.com -p hunter2
//!
//! # Browse listings
//! hope-cli listings list
//! hope-cli listings show 42
//!
//! # Basket
//! hope-cli basket add 42
//! hope-cli basket show
//!
//! # Favorites
//! hope-cli favorites add 42
//! hope-cli favorites list
//! ```
//!
//! # Commands
//!
//! - `auth` - login, logout, whoami, register
//! - `listings` - list, show, create, photos
//! - `basket` - show, add, remove
//! - `favorites` - list, add, remove
//! - `charities` - list

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use hopeflow_client::{HopeFlow, HopeFlowConfig};

mod commands;

#[derive(Parser)]
#[command(name = "hope-cli")]
#[command(author, version, about = "HopeFlow charity marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session and account management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse and manage listings
    Listings {
        #[command(subcommand)]
        action: ListingAction,
    },
    /// Manage the basket
    Basket {
        #[command(subcommand)]
        action: BasketAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// List charities
    Charities,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and persist the token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the session and the persisted token
    Logout,
    /// Show the currently logged-in user
    Whoami,
    /// Create a new account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum ListingAction {
    /// List listings
    List {
        /// Only listings posted by this user ID
        #[arg(long)]
        seller: Option<i64>,

        /// Only listings purchased by this user ID
        #[arg(long)]
        purchased_by: Option<i64>,
    },
    /// Show one listing
    Show {
        /// Listing ID
        id: i64,
    },
    /// Create a listing
    Create {
        /// Short title
        #[arg(short, long)]
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Asking price, e.g. 19.99
        #[arg(short, long)]
        price: String,

        /// Category ID
        #[arg(short, long)]
        category: i64,

        /// Charity the proceeds go to
        #[arg(long)]
        charity: i64,
    },
    /// List the photos attached to a listing
    Photos {
        /// Listing ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum BasketAction {
    /// Show the basket contents
    Show,
    /// Add a listing to the basket
    Add {
        /// Listing ID
        listing_id: i64,
    },
    /// Remove a line item from the basket
    Remove {
        /// Basket item ID (as shown by `basket show`)
        item_id: i64,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// List favorited listings
    List,
    /// Favorite a listing
    Add {
        /// Listing ID
        listing_id: i64,
    },
    /// Unfavorite a listing
    Remove {
        /// Listing ID
        listing_id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = HopeFlowConfig::from_env()?;
    let client = HopeFlow::new(config)?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&client, &email, &password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&client)?,
            AuthAction::Whoami => commands::auth::whoami(&client).await?,
            AuthAction::Register {
                email,
                password,
                name,
            } => commands::auth::register(&client, &email, &password, &name).await?,
        },
        Commands::Listings { action } => match action {
            ListingAction::List {
                seller,
                purchased_by,
            } => commands::listings::list(&client, seller, purchased_by).await?,
            ListingAction::Show { id } => commands::listings::show(&client, id).await?,
            ListingAction::Create {
                title,
                description,
                price,
                category,
                charity,
            } => {
                commands::listings::create(&client, &title, &description, &price, category, charity)
                    .await?;
            }
            ListingAction::Photos { id } => commands::listings::photos(&client, id).await?,
        },
        Commands::Basket { action } => match action {
            BasketAction::Show => commands::basket::show(&client).await?,
            BasketAction::Add { listing_id } => commands::basket::add(&client, listing_id).await?,
            BasketAction::Remove { item_id } => {
                commands::basket::remove(&client, item_id).await?;
            }
        },
        Commands::Favorites { action } => match action {
            FavoriteAction::List => commands::favorites::list(&client).await?,
            FavoriteAction::Add { listing_id } => {
                commands::favorites::add(&client, listing_id).await?;
            }
            FavoriteAction::Remove { listing_id } => {
                commands::favorites::remove(&client, listing_id).await?;
            }
        },
        Commands::Charities => commands::charities::list(&client).await?,
    }
    Ok(())
}
