//! Database bootstrap commands.

use anyhow::Result;

use super::{DbArgs, DbCommand};
use crate::context::Context;

/// Run the db command.
pub async fn run(args: DbArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DbCommand::Init { seed } => init(seed, ctx).await,
        DbCommand::Seed => seed_products(ctx).await,
    }
}

async fn init(seed: bool, ctx: &Context) -> Result<()> {
    let db = ctx.connect().await?;

    let spinner = ctx.output.spinner("Criando tabelas...");
    let result = async {
        db.init_schema().await?;
        db.seed_defaults().await
    }
    .await;
    spinner.finish_and_clear();
    result?;
    ctx.output.success("Banco de dados inicializado");

    if seed {
        let inserted = db.seed_products(ctx.config.currency()?).await?;
        ctx.output
            .success(&format!("{} produtos iniciais inseridos", inserted));
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "initialized": true, "seeded": seed }));
    }
    Ok(())
}

async fn seed_products(ctx: &Context) -> Result<()> {
    let db = ctx.connect().await?;
    let inserted = db.seed_products(ctx.config.currency()?).await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "inserted": inserted }));
    } else if inserted == 0 {
        ctx.output.info("Catálogo inicial já presente");
    } else {
        ctx.output
            .success(&format!("{} produtos iniciais inseridos", inserted));
    }
    Ok(())
}
