use log::info;

use super::prompt_line;
use crate::active::Pointer;
use crate::cli::{SetCommands, UnsetCommands};
use crate::config::PasswordType;
use crate::context::AppContext;
use crate::error::{CliError, Result};

pub async fn run_set(ctx: &AppContext, command: SetCommands) -> Result<()> {
    match command {
        SetCommands::Issue { key } => {
            let client = ctx.client()?;
            let key = ctx.resolve_issue_key(&client, Some(&key)).await?;
            ctx.active.set(Pointer::Issue, &key)?;
            println!("Active issue set to {key}");
        }
        SetCommands::Board { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::Usage("board name must not be empty".into()));
            }
            ctx.active.set(Pointer::Board, name)?;
            println!("Active board set to {name}");
        }
        SetCommands::Password => {
            let password = prompt_line("Password: ")?;
            ctx.secrets.store_password(&ctx.config.username, &password)?;
            info!("stored password for {} in the keyring", ctx.config.username);
            println!("Password stored in the keyring");
            if ctx.config.password_type != PasswordType::Keyring {
                println!(
                    "Set \"password_type\": \"keyring\" in {} to use it",
                    ctx.config_manager.path().display()
                );
            }
        }
    }
    Ok(())
}

pub fn run_unset(ctx: &AppContext, command: UnsetCommands) -> Result<()> {
    let (pointer, label) = match command {
        UnsetCommands::Issue => (Pointer::Issue, "issue"),
        UnsetCommands::Board => (Pointer::Board, "board"),
    };
    if ctx.active.clear(pointer)? {
        println!("Active {label} removed");
    } else {
        println!("No active {label} was set");
    }
    Ok(())
}
