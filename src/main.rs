mod api;
mod commands;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use api::catalog::{NewProduct, ProductFilter, ProductUpdate};
use api::client::ApiClient;
use api::error::ApiError;
use api::store::KeyringStore;
use api::types::{UserCreate, UserUpdate};
use state::AppState;
use ui::{ConsoleNavigator, ConsoleNotifier, NoticeKind};

#[derive(Parser, Debug)]
#[command(name = "glam", about = "Command-line client for the GLAM storefront", version)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000. Overrides GLAM_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Drop the local session
    Logout,
    /// Show the logged-in user from the stored token
    Whoami,
    /// Profile operations
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List products, optionally filtered
    Products {
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Product detail and management
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// List categories
    Categories,
    /// Show one category
    Category { id: i64 },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List your orders
    Orders,
    /// Order detail and cancellation
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Create an order from the current cart
    Checkout,
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Change the password
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Delete the account
    Delete,
}

#[derive(Subcommand, Debug)]
enum ProductAction {
    /// Show one product
    Show { id: i64 },
    /// Create a product, optionally with an image upload
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category_id: i64,
        #[arg(long)]
        stock: u32,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update product fields
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        stock: Option<u32>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        is_active: Option<i32>,
    },
    /// Delete a product
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CartAction {
    /// Show the cart with line totals
    Show,
    /// Show cart totals only
    Summary,
    /// Add a product to the cart
    Add {
        product_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change a cart line's quantity
    Update { item_id: i64, quantity: u32 },
    /// Remove a cart line
    Remove { item_id: i64 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand, Debug)]
enum OrderAction {
    /// Show one order
    Show { id: i64 },
    /// Cancel an order
    Cancel { id: i64 },
}

#[tokio::main]
async fn main() {
    // Share settings with a local .env where present
    let _ = dotenvy::dotenv();

    env_logger::init();

    let cli = Cli::parse();

    // API base URL: --api-url > GLAM_API_URL > localhost default
    let api_base_url = cli
        .api_url
        .clone()
        .or_else(|| std::env::var("GLAM_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    log::info!("GLAM CLI starting against {}", api_base_url);

    let api = ApiClient::new(&api_base_url, Arc::new(KeyringStore));
    let state = AppState::new(api, Box::new(ConsoleNotifier), Box::new(ConsoleNavigator));

    if let Err(err) = run(&state, cli.command).await {
        match err {
            ApiError::SessionExpired => {
                state
                    .notifier
                    .notify("Your session has expired.", NoticeKind::Error);
                state.navigator.to_login();
            }
            other => state.notifier.notify(&other.to_string(), NoticeKind::Error),
        }
        std::process::exit(1);
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Login { email, password } => commands::login(state, &email, &password).await,
        Command::Register {
            email,
            first_name,
            last_name,
            password,
            phone,
            address,
        } => {
            let user = UserCreate {
                first_name,
                last_name,
                email,
                phone,
                address,
                password,
            };
            commands::register(state, user).await
        }
        Command::Logout => {
            commands::logout(state);
            Ok(())
        }
        Command::Whoami => commands::whoami(state),
        Command::Profile { action } => match action {
            ProfileAction::Show => commands::show_profile(state).await,
            ProfileAction::Update {
                first_name,
                last_name,
                phone,
                address,
            } => {
                let update = UserUpdate {
                    first_name,
                    last_name,
                    phone,
                    address,
                };
                commands::update_profile(state, update).await
            }
            ProfileAction::Password { old, new } => {
                commands::change_password(state, old, new).await
            }
            ProfileAction::Delete => commands::delete_account(state).await,
        },
        Command::Products {
            category_id,
            search,
            min_price,
            max_price,
        } => {
            let filter = ProductFilter {
                category_id,
                search,
                min_price,
                max_price,
            };
            commands::list_products(state, filter).await
        }
        Command::Product { action } => match action {
            ProductAction::Show { id } => commands::show_product(state, id).await,
            ProductAction::Add {
                name,
                description,
                price,
                category_id,
                stock,
                sku,
                image,
            } => {
                let new = NewProduct {
                    name,
                    description,
                    price,
                    sku,
                    category_id,
                    stock,
                    image,
                };
                commands::add_product(state, new).await
            }
            ProductAction::Update {
                id,
                name,
                description,
                price,
                stock,
                sku,
                category_id,
                is_active,
            } => {
                let update = ProductUpdate {
                    name,
                    description,
                    price,
                    stock,
                    sku,
                    category_id,
                    is_active,
                };
                commands::update_product(state, id, update).await
            }
            ProductAction::Delete { id } => commands::delete_product(state, id).await,
        },
        Command::Categories => commands::list_categories(state).await,
        Command::Category { id } => commands::show_category(state, id).await,
        Command::Cart { action } => match action {
            CartAction::Show => commands::show_cart(state).await,
            CartAction::Summary => commands::cart_summary(state).await,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart_add(state, product_id, quantity).await,
            CartAction::Update { item_id, quantity } => {
                commands::cart_update(state, item_id, quantity).await
            }
            CartAction::Remove { item_id } => commands::cart_remove(state, item_id).await,
            CartAction::Clear => commands::cart_clear(state).await,
        },
        Command::Orders => commands::list_orders(state).await,
        Command::Order { action } => match action {
            OrderAction::Show { id } => commands::show_order(state, id).await,
            OrderAction::Cancel { id } => commands::cancel_order(state, id).await,
        },
        Command::Checkout => commands::checkout(state).await,
    }
}
