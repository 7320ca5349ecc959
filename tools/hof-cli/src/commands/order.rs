//! Order management commands.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use hof_commerce::checkout::Order;
use hof_commerce::OrderId;

use super::{OrderArgs, OrderCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let admin = ctx.admin(&services)?;

    match args.command {
        OrderCommand::List { status } => {
            let mut orders = admin.list_orders().await?;
            if let Some(status) = status {
                orders.retain(|o| o.status == status);
            }
            list_orders(&orders, ctx);
        }
        OrderCommand::Show { id } => {
            let orders = admin.list_orders().await?;
            let order = orders
                .iter()
                .find(|o| o.id.as_str() == id)
                .with_context(|| format!("Pedido não encontrado: {}", id))?;
            show_order(order, ctx);
        }
        OrderCommand::Status { id, status } => {
            let status = admin.update_order_status(&OrderId::new(id), status).await?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "status": status }));
            }
        }
        OrderCommand::Delete { id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Excluir o pedido {}?", id))
                    .default(false)
                    .interact()?
            {
                ctx.output.warn("Cancelado");
                return Ok(());
            }
            admin.delete_order(&OrderId::new(id)).await?;
        }
    }

    Ok(())
}

fn list_orders(orders: &[Order], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return;
    }

    ctx.output.header("Pedidos");
    if orders.is_empty() {
        ctx.output.info("Nenhum pedido encontrado");
        return;
    }

    let widths = [28, 17, 24, 6, 14, 10];
    ctx.output.table_row(
        &["ID", "Data", "Cliente", "Itens", "Total", "Status"],
        &widths,
    );
    for order in orders {
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &order.created_at.format("%d/%m/%Y %H:%M").to_string(),
                &truncate(&order.customer_name, widths[2]),
                &order.item_count().to_string(),
                &order.total.display(),
                &status_badge(order.status),
            ],
            &widths,
        );
    }
}

fn show_order(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    ctx.output.header(&format!("Pedido {}", order.id));
    ctx.output.kv("Cliente", &order.customer_name);
    ctx.output.kv("Telefone", &order.customer_phone);
    ctx.output
        .kv("Data", &order.created_at.format("%d/%m/%Y %H:%M").to_string());
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.info("");
    for line in &order.items {
        ctx.output.list_item(&format!(
            "{}x {} - {}",
            line.quantity,
            line.product_name,
            line.line_total().display()
        ));
    }
    ctx.output.kv("Total", &order.total.display());
}
