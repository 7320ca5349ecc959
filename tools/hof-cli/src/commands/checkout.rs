//! Storefront checkout from the terminal.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use hof_commerce::cart::CartStore;
use hof_commerce::catalog::Product;
use hof_commerce::checkout::{
    format_customer_phone, CustomerForm, Launcher, LinkOpening, OrderComposer, StorefrontSession,
    TaskOutcome,
};

use super::CheckoutArgs;
use crate::context::Context;
use crate::launcher::SystemLauncher;
use crate::output::ConsoleNotifier;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let products = services.catalog.list_products().await?;

    let mut session = StorefrontSession::new(ctx.config.currency()?);
    fill_cart(&mut session.cart, &products, &args.items)?;
    session.form = CustomerForm::new(
        args.name,
        args.phone
            .as_deref()
            .map(format_customer_phone)
            .unwrap_or_default(),
    );
    session.cart_open = true;

    if !ctx.output.is_json() {
        ctx.output.header("Seu Carrinho");
        for line in session.cart.items() {
            ctx.output.list_item(&format!(
                "{}x {} - {}",
                line.quantity,
                line.product.name,
                line.line_total().display()
            ));
        }
        ctx.output.kv("Total", &session.cart.total_price().display());
    }

    let launcher: Arc<dyn Launcher> = if args.no_open {
        Arc::new(SystemLauncher::print_only(ctx.output.clone()))
    } else {
        Arc::new(SystemLauncher::new(ctx.output.clone()))
    };
    let mut composer = OrderComposer::new(
        services.orders.clone(),
        services.settings.clone(),
        launcher,
        Arc::new(ConsoleNotifier::new(ctx.output.clone())),
    )
    .with_reloader(services.settings.clone())
    .with_options(ctx.config.checkout_options());

    let receipt = composer.submit_order(&mut session)?;
    ctx.output.debug(&receipt.link.url());

    let spinner = ctx.output.spinner("Salvando pedido...");
    let reports = composer.join_background().await;
    spinner.finish_and_clear();

    for report in &reports {
        match &report.outcome {
            TaskOutcome::Succeeded => ctx.output.debug(&format!("{} concluído", report.name)),
            TaskOutcome::Failed(reason) | TaskOutcome::Crashed(reason) => ctx
                .output
                .warn(&format!("{} falhou: {}", report.name, reason)),
        }
    }

    if ctx.output.is_json() {
        let background: Vec<_> = reports
            .iter()
            .map(|r| serde_json::json!({ "task": r.name, "ok": r.outcome.is_success() }))
            .collect();
        ctx.output.json(&serde_json::json!({
            "receipt": receipt,
            "url": receipt.link.url(),
            "background": background,
        }));
    } else if receipt.opened == LinkOpening::NewContext {
        ctx.output.success("Pedido aberto no WhatsApp");
    }

    Ok(())
}

/// `tx-1` or `tx-1:3`.
fn parse_item(raw: &str) -> Result<(&str, i64)> {
    let (id, quantity) = match raw.rsplit_once(':') {
        Some((id, qty)) => {
            let qty: i64 = qty
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", raw))?;
            (id.trim(), qty)
        }
        None => (raw.trim(), 1),
    };
    if id.is_empty() {
        bail!("Missing product id in '{}'", raw);
    }
    if quantity < 1 {
        bail!("Quantity must be at least 1 in '{}'", raw);
    }
    Ok((id, quantity))
}

/// Add every `id[:qty]` item; repeated ids accumulate.
fn fill_cart(cart: &mut CartStore, products: &[Product], items: &[String]) -> Result<()> {
    for item in items {
        let (id, quantity) = parse_item(item)?;
        let product = find_product(products, id)?;
        let current = cart.get(&product.id).map_or(0, |line| line.quantity);
        cart.add_item(product.clone());
        cart.update_quantity(&product.id, current.saturating_add(quantity));
    }
    Ok(())
}

fn find_product<'a>(products: &'a [Product], id: &str) -> Result<&'a Product> {
    products
        .iter()
        .find(|p| p.id.as_str() == id)
        .with_context(|| format!("Produto não encontrado: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("tx-1").unwrap(), ("tx-1", 1));
        assert_eq!(parse_item("tx-1:3").unwrap(), ("tx-1", 3));
        assert!(parse_item("tx-1:0").is_err());
        assert!(parse_item("tx-1:abc").is_err());
        assert!(parse_item(":2").is_err());
    }

    #[test]
    fn test_find_product() {
        let products = hof_commerce::catalog::starter_products(hof_commerce::Currency::BRL);
        assert_eq!(find_product(&products, "tx-1").unwrap().id.as_str(), "tx-1");
        assert!(find_product(&products, "nope").is_err());
    }

    #[test]
    fn test_fill_cart_accumulates_repeated_items() {
        let products = hof_commerce::catalog::starter_products(hof_commerce::Currency::BRL);
        let mut cart = CartStore::new(hof_commerce::Currency::BRL);
        let items = vec!["tx-1:2".to_string(), "ac-3".to_string(), "tx-1".to_string()];
        fill_cart(&mut cart, &products, &items).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_fill_cart_clamps_huge_quantities() {
        let products = hof_commerce::catalog::starter_products(hof_commerce::Currency::BRL);
        let mut cart = CartStore::new(hof_commerce::Currency::BRL);
        let items = vec![format!("tx-1:{}", i64::MAX), "tx-1:1".to_string()];
        fill_cart(&mut cart, &products, &items).unwrap();

        assert_eq!(cart.items()[0].quantity, i64::MAX);
    }
}
