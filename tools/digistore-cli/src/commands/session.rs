//! Session commands.

use anyhow::{bail, Result};
use dialoguer::Password;
use digistore_sdk::digistore_auth::{
    password_strength, validate_email, AuthError, PasswordStrength, RegisterRequest,
    MIN_PASSWORD_LENGTH,
};
use digistore_sdk::Storefront;
use serde_json::json;

use super::{LoginArgs, RegisterArgs};
use crate::context::Context;

fn read_password(given: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn check_email(email: &str) -> Result<()> {
    if !validate_email(email) {
        bail!(AuthError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Log in with an email and password.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    check_email(&args.email)?;
    let password = read_password(args.password, false)?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LENGTH);
    }

    let store = ctx.storefront()?;
    let spinner = ctx.output.spinner(&store.t("common.loading"));
    let result = store.try_login(&args.email, &password).await;
    spinner.finish_and_clear();

    let user = result?;
    let name = user.display_name();
    ctx.output
        .success(&store.t_with("auth.welcome", &[("name", name.as_str())]));
    print_user(&store, ctx);
    Ok(())
}

/// Create an account and log in.
pub async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let password = read_password(args.password, true)?;
    let request = RegisterRequest::new(args.first_name, args.last_name, args.email, password);
    request.validate()?;

    let strength = password_strength(&request.password);
    match strength {
        PasswordStrength::VeryWeak | PasswordStrength::Weak => ctx
            .output
            .warn(&format!("Password strength: {}", strength.as_str())),
        _ => ctx
            .output
            .debug(&format!("Password strength: {}", strength.as_str())),
    }

    let store = ctx.storefront()?;
    let spinner = ctx.output.spinner(&store.t("common.loading"));
    let result = store.try_register(request).await;
    spinner.finish_and_clear();

    let user = match result {
        Ok(user) => user,
        Err(AuthError::EmailAlreadyRegistered(_)) => bail!(store.t("auth.emailTaken")),
        Err(e) => return Err(e.into()),
    };
    let name = user.display_name();
    ctx.output
        .success(&store.t_with("auth.welcome", &[("name", name.as_str())]));
    print_user(&store, ctx);
    Ok(())
}

/// Drop the logged-in user.
pub async fn logout(ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    store.logout();
    ctx.output.success(&store.t("auth.loggedOut"));
    Ok(())
}

/// Show the logged-in user.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    if !store.is_authenticated() {
        if ctx.output.is_json() {
            ctx.output.json(&json!({ "user": null }));
            return Ok(());
        }
        bail!(store.t("auth.notLoggedIn"));
    }
    print_user(&store, ctx);
    Ok(())
}

fn print_user(store: &Storefront, ctx: &Context) {
    let Some(user) = store.user() else {
        return;
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "user": user }));
        return;
    }

    ctx.output.header(&user.display_name());
    ctx.output.kv("id", user.id.as_str());
    ctx.output.kv("email", &user.email);
    ctx.output.kv("orders", &user.orders.len().to_string());
    for order in user.orders.iter().take(5) {
        ctx.output.list_item(&format!(
            "{}  {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            store.format_price(&order.total)
        ));
    }
}
