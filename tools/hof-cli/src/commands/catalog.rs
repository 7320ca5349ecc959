//! Storefront catalog listing.

use anyhow::Result;
use console::style;
use hof_commerce::catalog::{category_label, CatalogFilter, Category, Product};

use super::CatalogArgs;
use crate::context::Context;
use crate::output::truncate;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let products = services.catalog.list_products().await?;
    let categories = services.catalog.list_categories().await?;

    let filter = build_filter(args.search, args.category);
    let visible = filter.apply(&products);

    if ctx.output.is_json() {
        ctx.output.json(&visible);
        return Ok(());
    }

    ctx.output.header("Catálogo Help HOF");
    if visible.is_empty() {
        ctx.output.info("Nenhum produto encontrado");
        return Ok(());
    }

    print_products(ctx, &visible, &categories);
    ctx.output.info(&format!("{} produto(s)", visible.len()));
    Ok(())
}

/// Filter from optional search text and category slug; `all` means no category.
pub fn build_filter(search: Option<String>, category: Option<String>) -> CatalogFilter {
    let mut filter = CatalogFilter::new();
    if let Some(search) = search {
        filter = filter.text(search);
    }
    if let Some(slug) = category.filter(|s| s != "all") {
        filter = filter.category(slug);
    }
    filter
}

/// Product table shared by the storefront and admin listings.
pub fn print_products(ctx: &Context, products: &[&Product], categories: &[Category]) {
    let widths = [14, 36, 20, 14, 12];
    ctx.output
        .table_row(&["ID", "Produto", "Categoria", "Preço", "Selo"], &widths);
    for product in products {
        let badge = product.badge.map(|b| b.label()).unwrap_or("");
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.name, widths[1]),
                &truncate(category_label(categories, &product.category), widths[2]),
                &product.price.display(),
                badge,
            ],
            &widths,
        );
        if ctx.output.is_verbose() && !product.description.is_empty() {
            println!("    {}", style(&product.description).dim());
        }
    }
}
