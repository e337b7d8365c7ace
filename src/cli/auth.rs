//! CLI auth command handlers for login, status, and logout.

use std::io::Write;
use std::sync::Arc;

use super::{CliResult, Context};
use crate::auth::{AuthError, CheckOutcome, CredentialStore, DeviceAuthRelay};

/// Handle `vogon auth login`.
///
/// The backend relays the device-code flow; the user approves on another
/// device and presses Enter here to trigger each check.
pub async fn handle_login(ctx: &Context) -> CliResult {
    let store = Arc::new(ctx.config.credential_store());
    let mut relay =
        DeviceAuthRelay::new(ctx.backend.clone(), store).with_profile(ctx.config.profile());

    let session = relay.begin().await?;
    println!("🔗 Visit: {}", session.verification_url);
    println!("📋 Enter code: {}", session.user_code);

    loop {
        print!("⏎  Press Enter once you have approved access... ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            return Err("login cancelled".into());
        }

        match relay.check().await? {
            CheckOutcome::Approved(_) => {
                println!("✅ YouTube account linked!");
                if let Ok(Some(channel)) = ctx.publisher().linked_channel().await {
                    println!("   Channel: {}", channel.display_name());
                }
                return Ok(());
            }
            CheckOutcome::Pending { description } => match description {
                Some(description) => println!("⏳ Not approved yet: {description}"),
                None => println!("⏳ Not approved yet."),
            },
            CheckOutcome::Denied { description } => {
                return Err(AuthError::AccessDenied(description).into());
            }
        }
    }
}

/// Handle `vogon auth status`.
pub async fn handle_status(ctx: &Context) -> CliResult {
    println!("🔐 YouTube Authorization ({})\n", ctx.config.profile());

    let publisher = ctx.publisher();
    match publisher.credentials() {
        Ok(Some(tokens)) if tokens.linked_pair().is_some() => match publisher.linked_channel().await {
            Ok(Some(channel)) => println!("  ✅ Linked to {}", channel.display_name()),
            Ok(None) => println!("  ✅ Linked (account has no channel)"),
            Err(e) => println!("  ⚠️  Credentials stored but channel lookup failed: {e}"),
        },
        Ok(_) => println!("  ❌ Not logged in"),
        Err(e) => println!("  ⚠️  Error: {e}"),
    }
    Ok(())
}

/// Handle `vogon auth logout`.
pub async fn handle_logout(ctx: &Context) -> CliResult {
    ctx.config.credential_store().clear(ctx.config.profile())?;
    println!("✅ Logged out of YouTube");
    Ok(())
}
