//! CLI commands

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_core::StorefrontConfig;
use storefront_http::types::{CommentRequest, OrderRequest, PaymentMethod, RegisterRequest};
use storefront_http::{
    ApiClient, Catalog, ExpiryHandler, FileTokenStore, RefreshError, Session, SessionError,
};
use tracing::{debug, info};

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with phone and password
    Login {
        /// Phone number the account was registered with
        #[arg(long)]
        phone: String,

        /// Account password
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Register a new account; finish with `confirm`
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        phone: String,

        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Confirm a phone number with the SMS code and sign in
    Confirm {
        #[arg(long)]
        phone: String,

        /// Code from the SMS
        #[arg(long)]
        code: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List products, or show one
    Products {
        /// Product ID
        #[arg(long)]
        id: Option<u64>,
    },

    /// Show promotional banners (always fetched; the banner cache only
    /// pays off in long-running embedders)
    Banners {
        /// Content language (defaults to `api.language`)
        #[arg(long)]
        language: Option<String>,
    },

    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    /// Order operations
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Post a product review
    Comment {
        /// Product ID
        #[arg(long)]
        product: u64,

        /// Review text
        #[arg(long)]
        text: String,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },

    /// Generate default configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add {
        /// Product ID
        product: u64,

        #[arg(long, default_value = "1")]
        quantity: u32,
    },

    /// Change the quantity of a cart line
    Update {
        /// Cart line ID
        item: u64,

        #[arg(long)]
        quantity: u32,
    },

    /// Remove a cart line
    Remove {
        /// Cart line ID
        item: u64,
    },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Place an order for the current cart
    Create {
        /// Delivery address
        #[arg(long)]
        address: String,

        /// Contact phone
        #[arg(long)]
        phone: String,

        #[arg(long, value_enum, default_value = "cash")]
        payment: Payment,

        /// Note for the courier
        #[arg(long)]
        comment: Option<String>,
    },

    /// List your orders
    List,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate the client configuration file
    Init {
        /// Output file path (defaults to STATE_DIR/config.toml)
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Payment {
    Cash,
    Card,
}

impl From<Payment> for PaymentMethod {
    fn from(payment: Payment) -> Self {
        match payment {
            Payment::Cash => Self::Cash,
            Payment::Card => Self::Card,
        }
    }
}

impl Commands {
    pub async fn execute(self, settings: StorefrontConfig) -> Result<()> {
        let session = session(&settings)?;

        match self {
            Self::Login { phone, password } => {
                let identity = session.login(phone, password).await?;
                println!(
                    "Signed in as {}",
                    identity.first_name.as_deref().unwrap_or("(no name)")
                );
                Ok(())
            }
            Self::Register {
                first_name,
                phone,
                password,
            } => {
                let request = RegisterRequest {
                    first_name,
                    phone,
                    password,
                };
                print_json(&session.register(&request).await?)?;
                println!("Enter the SMS code with `storefront confirm`");
                Ok(())
            }
            Self::Confirm { phone, code } => {
                let identity = session.confirm(phone, code).await?;
                println!(
                    "Phone confirmed, signed in as {}",
                    identity.first_name.as_deref().unwrap_or("(no name)")
                );
                Ok(())
            }
            Self::Logout => {
                session.logout()?;
                println!("Signed out");
                Ok(())
            }
            Self::Whoami => {
                if session.is_authenticated() {
                    print_json(&session.identity())
                } else {
                    println!("Not signed in");
                    Ok(())
                }
            }
            Self::Products { id } => {
                let catalog = Catalog::from_config(session.client().clone(), &settings);
                match id {
                    Some(id) => print_json(&catalog.product(id).await?),
                    None => print_json(&catalog.products().await?),
                }
            }
            Self::Banners { language } => {
                let catalog = Catalog::from_config(session.client().clone(), &settings);
                let banners = match language {
                    Some(language) => catalog.banners_for(&language).await?,
                    None => catalog.banners().await?,
                };
                print_json(banners.as_ref())
            }
            Self::Cart { command } => command.execute(&session).await,
            Self::Order { command } => command.execute(&session).await,
            Self::Comment {
                product,
                text,
                rating,
            } => {
                let comment = CommentRequest {
                    product,
                    text,
                    rating,
                };
                print_json(&signed_in(session.post_comment(&comment).await)?)
            }
            Self::Config { command } => command.execute(&settings),
        }
    }
}

impl CartCommands {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            Self::Show => print_json(&signed_in(session.cart().await)?),
            Self::Add { product, quantity } => {
                print_json(&signed_in(session.add_to_cart(product, quantity).await)?)
            }
            Self::Update { item, quantity } => {
                print_json(&signed_in(session.update_cart_item(item, quantity).await)?)
            }
            Self::Remove { item } => {
                signed_in(session.remove_cart_item(item).await)?;
                println!("Removed cart line {item}");
                Ok(())
            }
        }
    }
}

impl OrderCommands {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            Self::Create {
                address,
                phone,
                payment,
                comment,
            } => {
                let request = OrderRequest {
                    address,
                    phone,
                    payment_method: payment.into(),
                    comment,
                };
                let order = signed_in(session.create_order(&request).await)?;
                print_json(&order)?;
                if let Some(url) = &order.payment_url {
                    println!("Complete the payment at: {url}");
                }
                Ok(())
            }
            Self::List => print_json(&signed_in(session.orders().await)?),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, settings: &StorefrontConfig) -> Result<()> {
        match self {
            Self::Init { output } => {
                let config_path = output
                    .unwrap_or_else(|| config::default_config_path(&settings.session.state_dir));
                config::generate_default_config(&config_path)?;
                println!(
                    "Generated client configuration at: {}",
                    config_path.display()
                );
                Ok(())
            }
        }
    }
}

fn session(settings: &StorefrontConfig) -> Result<Session> {
    let client = ApiClient::from_config(&settings.api)?;
    let token_path = settings.session.token_path();
    debug!(path = %token_path.display(), "opening session store");
    let store = Arc::new(FileTokenStore::open(token_path));
    let on_expired: Arc<dyn ExpiryHandler> = Arc::new(|cause: &RefreshError| {
        info!(%cause, "session expired");
        eprintln!("Your session has expired. Run `storefront login` to sign in again.");
    });
    Ok(Session::builder(client, store)
        .on_session_expired(on_expired)
        .build())
}

/// Point the user at `login` when a call failed for lack of credentials
fn signed_in<T>(result: Result<T, SessionError>) -> Result<T> {
    match result {
        Err(error) if error.is_auth_expired() => {
            Err(error).context("not signed in; run `storefront login`")
        }
        other => Ok(other?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
