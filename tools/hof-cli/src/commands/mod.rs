//! CLI command implementations.

pub mod auth;
pub mod catalog;
pub mod category;
pub mod checkout;
pub mod config;
pub mod db;
pub mod order;
pub mod product;
pub mod settings;

use clap::{Args, Subcommand};
use hof_commerce::catalog::Badge;
use hof_commerce::checkout::OrderStatus;

/// Arguments for the db command.
#[derive(Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand)]
pub enum DbCommand {
    /// Create tables and insert default settings and categories.
    Init {
        /// Also insert the starter catalog.
        #[arg(long)]
        seed: bool,
    },
    /// Insert the starter catalog.
    Seed,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Search name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category slug.
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List products.
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a product.
    Add {
        #[arg(long)]
        name: String,
        /// Price such as 650, 89.90 or 1.234,56.
        #[arg(long)]
        price: String,
        /// Category slug.
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image: Option<String>,
        /// bestseller, promotion or new.
        #[arg(long, value_parser = parse_badge)]
        badge: Option<BadgeArg>,
    },
    /// Change fields of a product.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// bestseller, promotion, new, or none to clear.
        #[arg(long, value_parser = parse_badge)]
        badge: Option<BadgeArg>,
    },
    /// Delete a product.
    Delete {
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the category command.
#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List categories with their product counts.
    List,
    /// Add a category.
    Add {
        name: String,
        /// Derived from the name when omitted.
        #[arg(long)]
        slug: Option<String>,
    },
    /// Rename a category or change its slug.
    Edit {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete an unused category.
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// List orders, newest first.
    List {
        /// Only orders with this status.
        #[arg(long, value_parser = parse_status)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its items.
    Show { id: String },
    /// Change an order's status.
    Status {
        id: String,
        /// pending, completed or cancelled.
        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },
    /// Delete an order.
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the settings command.
#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the store settings.
    Show,
    /// Set the WhatsApp number orders are sent to.
    Whatsapp { number: String },
    /// Show, replace or reset the message template.
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Change the admin username and password.
    Credentials {
        #[arg(long)]
        username: String,
        /// Prompted when omitted; leave empty to keep the current one.
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    Show,
    /// Replace the template with the contents of a file.
    Set {
        /// File holding the template; `-` reads stdin.
        file: String,
    },
    /// Go back to the built-in template.
    Reset,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Prompted when omitted.
    #[arg(short, long)]
    pub username: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Product id, optionally with a quantity: `tx-1` or `tx-1:2`.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Print the link instead of opening it.
    #[arg(long)]
    pub no_open: bool,
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
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// A badge value from the command line; `none` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeArg(pub Option<Badge>);

fn parse_badge(s: &str) -> Result<BadgeArg, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(BadgeArg(None));
    }
    Badge::from_str(&s.to_lowercase())
        .map(|badge| BadgeArg(Some(badge)))
        .ok_or_else(|| format!("unknown badge '{s}' (bestseller, promotion, new, none)"))
}

fn parse_status(s: &str) -> Result<OrderStatus, String> {
    OrderStatus::from_str(&s.to_lowercase())
        .ok_or_else(|| format!("unknown status '{s}' (pending, completed, cancelled)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_badge() {
        assert_eq!(parse_badge("bestseller"), Ok(BadgeArg(Some(Badge::Bestseller))));
        assert_eq!(parse_badge("NONE"), Ok(BadgeArg(None)));
        assert!(parse_badge("hot").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Completed"), Ok(OrderStatus::Completed));
        assert!(parse_status("shipped").is_err());
    }
}
