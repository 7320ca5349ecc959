//! Store settings commands.

use std::io::Read;

use anyhow::{Context as _, Result};
use dialoguer::Password;
use hof_commerce::checkout::format_whatsapp_display;

use super::{SettingsArgs, SettingsCommand, TemplateCommand};
use crate::context::Context;

/// Run the settings command.
pub async fn run(args: SettingsArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;
    let admin = ctx.admin(&services)?;

    match args.command {
        SettingsCommand::Show => {
            let settings = admin.settings();
            if ctx.output.is_json() {
                // the password stays out of machine-readable output
                ctx.output.json(&serde_json::json!({
                    "whatsapp_number": settings.whatsapp_number,
                    "admin_username": settings.admin_username,
                    "message_template": settings.message_template,
                }));
                return Ok(());
            }
            ctx.output.header("Configurações");
            ctx.output
                .kv("WhatsApp", &format_whatsapp_display(&settings.whatsapp_number));
            ctx.output.kv("Usuário", &settings.admin_username);
            ctx.output.kv("Modelo de mensagem", "");
            ctx.output.block(&settings.message_template);
        }
        SettingsCommand::Whatsapp { number } => {
            let digits = admin.update_whatsapp_number(&number).await?;
            ctx.output.kv("WhatsApp", &format_whatsapp_display(&digits));
        }
        SettingsCommand::Template { command } => match command {
            TemplateCommand::Show => {
                let template = admin.settings().message_template;
                if ctx.output.is_json() {
                    ctx.output.json(&serde_json::json!({ "message_template": template }));
                } else {
                    println!("{}", template);
                }
            }
            TemplateCommand::Set { file } => {
                let template = read_template(&file)?;
                admin.update_message_template(&template).await?;
            }
            TemplateCommand::Reset => admin.reset_message_template().await?,
        },
        SettingsCommand::Credentials { username, password } => {
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Nova senha (vazio mantém a atual)")
                    .allow_empty_password(true)
                    .interact()?,
            };
            admin.update_credentials(&username, &password).await?;
        }
    }

    Ok(())
}

fn read_template(file: &str) -> Result<String> {
    if file == "-" {
        let mut template = String::new();
        std::io::stdin()
            .read_to_string(&mut template)
            .context("Failed to read template from stdin")?;
        return Ok(template);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read template: {}", file))
}
