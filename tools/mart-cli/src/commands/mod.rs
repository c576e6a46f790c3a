//! CLI command implementations.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod compare;
pub mod config;
pub mod orders;

use clap::{Args, Subcommand};
use mart_commerce::catalog::SortOrder;
use mart_commerce::checkout::{AddressType, DeliveryOption, PaymentMethod};
use rust_decimal::Decimal;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    Products(ProductsArgs),
    /// Show one product.
    Product {
        /// Product ID.
        id: String,
    },
    /// List categories and their subcategories.
    Categories,
    /// List brands.
    Brands,
    /// Search products by name, SKU, brand or category.
    Search {
        /// Search term. Omit to list recent searches.
        query: Option<String>,

        /// Maximum number of suggestions.
        #[arg(short, long, default_value_t = mart_commerce::search::DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,

        /// Forget recent searches.
        #[arg(long, conflicts_with = "query")]
        clear: bool,
    },
}

/// Arguments for `catalog products`.
#[derive(Args)]
pub struct ProductsArgs {
    /// Category ID.
    #[arg(long)]
    pub category: Option<String>,

    /// Subcategory ID.
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Brand ID.
    #[arg(long)]
    pub brand: Option<String>,

    /// Free-text search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// featured, price-asc, price-desc, name-asc or newest.
    #[arg(long, default_value = "featured")]
    pub sort: SortOrder,

    /// Page number.
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Hide out-of-stock products.
    #[arg(long)]
    pub in_stock: bool,

    /// Lowest unit price.
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest unit price.
    #[arg(long)]
    pub max_price: Option<Decimal>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,

    /// Delivery option used for the price breakdown.
    #[arg(short, long, global = true)]
    pub delivery: Option<DeliveryOption>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart and its price breakdown.
    Show,
    /// Add a product, one MOQ step or the given quantity.
    Add {
        /// Product ID.
        product: String,
        /// Units to add, rounded up to the product's MOQ.
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Set a product's quantity, rounded up to its MOQ.
    Set {
        /// Product ID.
        product: String,
        /// Units wanted.
        quantity: u32,
    },
    /// Add one MOQ step of a product.
    Inc {
        /// Product ID.
        product: String,
    },
    /// Remove one MOQ step of a product.
    Dec {
        /// Product ID.
        product: String,
    },
    /// Remove a line from the cart.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    #[command(subcommand)]
    pub command: Option<CompareCommand>,
}

#[derive(Subcommand)]
pub enum CompareCommand {
    /// Show the comparison table.
    Show,
    /// Add a product to the comparison.
    Add {
        /// Product ID.
        product: String,
    },
    /// Remove a product from the comparison.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Clear the comparison.
    Clear,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// express, standard or scheduled (default from config).
    #[arg(short, long)]
    pub delivery: Option<DeliveryOption>,

    /// Delivery date for scheduled delivery (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,

    /// credit-terms, upi, card, netbanking, lc or advance.
    #[arg(short, long)]
    pub payment: Option<PaymentMethod>,

    /// Saved address ID (default: the default address).
    #[arg(short, long)]
    pub address: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first.
    List {
        /// Show only the last N orders.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an order's details.
    Show {
        /// Order ID.
        id: String,
    },
    /// Show an order's tracking timeline.
    Track {
        /// Order ID.
        id: String,
    },
}

/// Arguments for the addresses command.
#[derive(Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: Option<AddressesCommand>,
}

#[derive(Subcommand)]
pub enum AddressesCommand {
    /// List saved addresses.
    List,
    /// Save a new address.
    Add(AddAddressArgs),
}

/// Arguments for `addresses add`.
#[derive(Args)]
pub struct AddAddressArgs {
    /// Label, e.g. "Main Warehouse".
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub street: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub pincode: String,

    /// home, office, warehouse or other.
    #[arg(long = "type", default_value = "warehouse")]
    pub address_type: AddressType,

    /// Make this the default address.
    #[arg(long)]
    pub default: bool,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Access token issued by the storefront.
    #[arg(short, long)]
    pub token: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a configuration value.
    Get {
        /// Config key (e.g., api.base_url).
        key: String,
    },
    /// Set a configuration value.
    Set {
        /// Config key (e.g., api.base_url).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Create a default config file.
    Init {
        /// API base URL to write.
        #[arg(long, default_value = "http://localhost:8000/api")]
        base_url: String,
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        Cart(CartArgs),
        Checkout(CheckoutArgs),
        Catalog(CatalogArgs),
    }

    #[test]
    fn test_checkout_args_parse_typed_values() {
        let parsed = Harness::try_parse_from([
            "mart", "checkout", "-d", "scheduled", "--date", "2024-07-01", "-p", "credit-terms", "-y",
        ])
        .unwrap();
        let Command::Checkout(args) = parsed.command else {
            panic!("expected checkout");
        };
        assert_eq!(args.delivery, Some(DeliveryOption::Scheduled));
        assert_eq!(args.payment, Some(PaymentMethod::CreditTerms));
        assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2024, 7, 1));
        assert!(args.yes);
    }

    #[test]
    fn test_unknown_payment_rejected() {
        assert!(Harness::try_parse_from(["mart", "checkout", "-p", "cheque"]).is_err());
    }

    #[test]
    fn test_cart_defaults_to_show() {
        let parsed = Harness::try_parse_from(["mart", "cart", "--delivery", "express"]).unwrap();
        let Command::Cart(args) = parsed.command else {
            panic!("expected cart");
        };
        assert!(args.command.is_none());
        assert_eq!(args.delivery, Some(DeliveryOption::Express));
    }

    #[test]
    fn test_products_price_range() {
        let parsed = Harness::try_parse_from([
            "mart", "catalog", "products", "--min-price", "100", "--max-price", "250.50", "--sort", "price-asc",
        ])
        .unwrap();
        let Command::Catalog(CatalogArgs { command: CatalogCommand::Products(args) }) = parsed.command else {
            panic!("expected catalog products");
        };
        assert_eq!(args.min_price, Some(Decimal::from(100)));
        assert_eq!(args.max_price, Some(Decimal::new(25_050, 2)));
        assert_eq!(args.sort, SortOrder::PriceAsc);
    }
}
