//! Access token commands.

use anyhow::{bail, Result};
use mart_data::Credentials;

use super::LoginArgs;
use crate::context::Context;

/// Store the access token used for cart, order and address calls.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let token = args.token.trim();
    if token.is_empty() {
        bail!("Token must not be empty");
    }
    // Always write the stored token, even when MART_TOKEN is in effect.
    Credentials::persistent(ctx.cache.clone()).set(token);
    if std::env::var_os("MART_TOKEN").is_some() {
        ctx.output
            .warn("MART_TOKEN is set and takes precedence over the stored token");
    }
    ctx.output.success("Logged in");
    Ok(())
}

/// Drop the stored access token.
pub async fn logout(ctx: &Context) -> Result<()> {
    let stored = Credentials::persistent(ctx.cache.clone());
    if !stored.is_authenticated() {
        ctx.output.info("Not logged in.");
        return Ok(());
    }
    stored.clear();
    ctx.output.success("Logged out");
    Ok(())
}
