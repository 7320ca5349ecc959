//! Category management commands.

use anyhow::Result;
use dialoguer::Confirm;
use hof_commerce::catalog::CategoryInput;
use hof_commerce::CategoryId;

use super::{CategoryArgs, CategoryCommand};
use crate::context::Context;

/// Run the category command.
pub async fn run(args: CategoryArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let admin = ctx.admin(&services)?;

    match args.command {
        CategoryCommand::List => {
            let usage = admin.category_usage().await?;
            if ctx.output.is_json() {
                ctx.output.json(&usage);
                return Ok(());
            }
            ctx.output.header("Categorias");
            let widths = [16, 24, 20, 8];
            ctx.output
                .table_row(&["ID", "Nome", "Slug", "Produtos"], &widths);
            for entry in &usage {
                ctx.output.table_row(
                    &[
                        entry.category.id.as_str(),
                        &entry.category.name,
                        &entry.category.slug,
                        &entry.products.to_string(),
                    ],
                    &widths,
                );
            }
        }
        CategoryCommand::Add { name, slug } => {
            let category = admin.add_category(with_slug(name, slug)).await?;
            if ctx.output.is_json() {
                ctx.output.json(&category);
            } else {
                ctx.output.kv("id", category.id.as_str());
                ctx.output.kv("slug", &category.slug);
            }
        }
        CategoryCommand::Edit { id, name, slug } => {
            let category = admin
                .update_category(&CategoryId::new(id), with_slug(name, slug))
                .await?;
            if ctx.output.is_json() {
                ctx.output.json(&category);
            }
        }
        CategoryCommand::Delete { id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Excluir a categoria {}?", id))
                    .default(false)
                    .interact()?
            {
                ctx.output.warn("Cancelado");
                return Ok(());
            }
            admin.delete_category(&CategoryId::new(id)).await?;
        }
    }

    Ok(())
}

fn with_slug(name: String, slug: Option<String>) -> CategoryInput {
    match slug {
        Some(slug) => CategoryInput::new(name).with_slug(slug),
        None => CategoryInput::new(name),
    }
}
