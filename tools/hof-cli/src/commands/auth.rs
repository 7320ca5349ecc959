//! Admin login commands.

use anyhow::Result;
use dialoguer::{Input, Password};
use hof_auth::AuthFlag;

use super::LoginArgs;
use crate::context::Context;

pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let auth = ctx.auth(&services)?;

    let username = match args.username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Usuário").interact_text()?,
    };
    let password = Password::new().with_prompt("Senha").interact()?;

    auth.login(&username, &password).await?;
    ctx.output.success("Login realizado com sucesso!");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    AuthFlag::new(ctx.cache()?).clear()?;
    ctx.output.success("Sessão encerrada");
    Ok(())
}

/// Report whether the admin flag is set. Works offline.
pub fn whoami(ctx: &Context) -> Result<()> {
    let authenticated = AuthFlag::new(ctx.cache()?).is_set();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "authenticated": authenticated }));
    } else if authenticated {
        ctx.output.success("Autenticado como administrador");
    } else {
        ctx.output.info("Não autenticado");
    }
    Ok(())
}
