//! Product management commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use hof_commerce::catalog::{NewProduct, ProductUpdate};
use hof_commerce::{Currency, Money, ProductId};

use super::catalog::{build_filter, print_products};
use super::{ProductArgs, ProductCommand};
use crate::context::Context;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let admin = ctx.admin(&services)?;
    let currency = ctx.config.currency()?;

    match args.command {
        ProductCommand::List { search, category } => {
            let products = admin.list_products(&build_filter(search, category)).await?;
            if ctx.output.is_json() {
                ctx.output.json(&products);
                return Ok(());
            }
            let categories = admin.list_categories().await?;
            ctx.output.header("Produtos");
            let refs: Vec<_> = products.iter().collect();
            print_products(ctx, &refs, &categories);
            ctx.output.info(&format!("{} produto(s)", products.len()));
        }
        ProductCommand::Add {
            name,
            price,
            category,
            description,
            image,
            badge,
        } => {
            let product = admin
                .add_product(NewProduct {
                    name,
                    description,
                    price: parse_price(&price, currency)?,
                    category,
                    image,
                    badge: badge.and_then(|b| b.0),
                })
                .await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.kv("id", product.id.as_str());
            }
        }
        ProductCommand::Edit {
            id,
            name,
            price,
            category,
            description,
            image,
            badge,
        } => {
            let update = ProductUpdate {
                name,
                description,
                price: price.map(|p| parse_price(&p, currency)).transpose()?,
                category,
                image,
                badge: badge.map(|b| b.0),
            };
            if update.is_empty() {
                bail!("Nothing to change. Pass at least one field, e.g. --price 89.90");
            }
            let product = admin.update_product(&ProductId::new(id), update).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            }
        }
        ProductCommand::Delete { id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Excluir o produto {}?", id))
                    .default(false)
                    .interact()?
            {
                ctx.output.warn("Cancelado");
                return Ok(());
            }
            admin.delete_product(&ProductId::new(id)).await?;
        }
    }

    Ok(())
}

fn parse_price(input: &str, currency: Currency) -> Result<Money> {
    Money::parse(input, currency).with_context(|| format!("Invalid price: {}", input))
}
