//! Tavola CLI
//!
//! Browse a restaurant menu and manage a persisted cart from the command line.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use tavola::{
    cart::{CartError, CartLedger, Customization, FileStore},
    catalog::{Catalog, CatalogError, CatalogSnapshot, YamlCatalogSource},
    checkout::{CheckoutError, checkout},
    config::{Config, ConfigError},
    logging::{LoggingError, init_logging},
    pricing::{is_available_at, menu},
    products::ProductId,
    promotions::PromoError,
    receipt::{Receipt, ReceiptError},
    restaurants::RestaurantId,
};

/// Tavola command line
#[derive(Debug, Parser)]
#[command(name = "tavola", about = "Restaurant cart and promo code pricing", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List restaurant locations
    Restaurants,

    /// List products orderable at the selected restaurant with their prices
    Menu,

    /// Add a product to the cart
    Add {
        /// Product id
        product: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Sauce, by name
        #[arg(long)]
        sauce: Option<String>,

        /// Side, by name; repeat for several
        #[arg(long = "side")]
        sides: Vec<String>,
    },

    /// Remove a product from the cart
    Remove {
        /// Product id
        product: ProductId,
    },

    /// Set a product's quantity; zero or less removes it
    Set {
        /// Product id
        product: ProductId,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Manage the promo code
    #[command(subcommand)]
    Promo(PromoCommand),

    /// Show the cart with its totals
    Show,

    /// Empty the cart
    Clear,

    /// Place the order
    Checkout,
}

#[derive(Debug, Subcommand)]
enum PromoCommand {
    /// Apply a promo code, replacing any active one
    Apply {
        /// The code
        code: String,
    },

    /// Remove the active promo code
    Remove,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no product with id {0}")]
    UnknownProduct(ProductId),

    #[error("{0} is not available at this restaurant")]
    Unavailable(String),

    #[error("no {kind} named {name}")]
    UnknownComponent { kind: &'static str, name: String },

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Promo(#[from] PromoError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    Config::load_dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user, not only logged"
            )]
            {
                eprintln!("error: {error}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { config, command } = cli;

    init_logging(&config.logging)?;

    let currency = config.currency()?;
    let source = YamlCatalogSource::new(&config.catalog.catalog_path);
    let catalog = Catalog::new(config.retry_policy()?);
    let snapshot = catalog.refresh(&source).await?;

    let mut ledger = CartLedger::load(FileStore::new(&config.cart.storage_dir), snapshot);

    ledger.select_restaurant(config.cart.restaurant.map(RestaurantId::new));

    debug!(?command, restaurant = ?ledger.restaurant(), "running command");

    let mut out = io::stdout().lock();

    match command {
        Command::Restaurants => {
            for restaurant in ledger.catalog().restaurants() {
                writeln!(
                    out,
                    "{:>4}  {}  ({}), minimum order {}",
                    restaurant.id,
                    restaurant.name,
                    restaurant.address,
                    restaurant.min_order_amount.normalize()
                )?;
            }
        }
        Command::Menu => {
            for entry in menu(ledger.catalog(), ledger.restaurant()) {
                writeln!(
                    out,
                    "{:>4}  {:<32} {:>10}",
                    entry.product.id,
                    entry.product.name,
                    entry.price.normalize()
                )?;
            }
        }
        Command::Add {
            product,
            quantity,
            sauce,
            sides,
        } => {
            let customization = customization(ledger.catalog(), sauce, sides)?;
            let item = ledger
                .catalog()
                .product(product)
                .cloned()
                .ok_or(CliError::UnknownProduct(product))?;

            if !is_available_at(ledger.catalog(), product, ledger.restaurant()) {
                return Err(CliError::Unavailable(item.name));
            }

            ledger.add_item(&item, quantity, customization)?;

            writeln!(out, "added {quantity} x {}", item.name)?;
        }
        Command::Remove { product } => ledger.remove_item(product),
        Command::Set { product, quantity } => ledger.update_quantity(product, quantity),
        Command::Promo(PromoCommand::Apply { code }) => {
            let applied = ledger.apply_promo_code(&code)?;

            writeln!(out, "{}", applied.message)?;
        }
        Command::Promo(PromoCommand::Remove) => ledger.remove_promo_code(),
        Command::Show => Receipt::from_ledger(&ledger, currency).write_to(&mut out)?,
        Command::Clear => ledger.clear_cart(),
        Command::Checkout => {
            let receipt = checkout(&mut ledger, currency)?;

            receipt.write_to(&mut out)?;
            writeln!(out, "order placed")?;
        }
    }

    catalog.teardown();

    Ok(())
}

fn customization(
    catalog: &CatalogSnapshot,
    sauce: Option<String>,
    sides: Vec<String>,
) -> Result<Customization, CliError> {
    let mut customization = Customization::default();

    if let Some(sauce) = sauce {
        if !catalog.sauces().any(|component| component.name == sauce) {
            return Err(CliError::UnknownComponent {
                kind: "sauce",
                name: sauce,
            });
        }

        customization = customization.with_sauce(sauce);
    }

    if let Some(missing) = sides
        .iter()
        .find(|side| !catalog.sides().any(|component| &component.name == *side))
    {
        return Err(CliError::UnknownComponent {
            kind: "side",
            name: missing.clone(),
        });
    }

    // No --side flags leaves any earlier side selection in place
    if !sides.is_empty() {
        customization = customization.with_sides(sides);
    }

    Ok(customization)
}
