use super::Context;
use crate::output;
use anyhow::Result;
use colored::Colorize;
use seedline_core::user::LoginForm;

pub async fn login(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let app = ctx.open_app_once()?;
    app.auth().enter_login()?;

    let result = app.auth().login(&LoginForm::new(username, password)).await;
    output::notifications(app.notifications());
    result?;

    println!("Logged in as {}", username.bold());
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let app = ctx.open_app_once()?;
    app.auth().logout()?;
    println!("Logged out");
    Ok(())
}

pub async fn register(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let app = ctx.open_app_once()?;
    let outcome = app.auth().register(&LoginForm::new(username, password)).await;
    output::notifications(app.notifications());
    outcome.into_result()?;
    Ok(())
}

pub async fn whoami(ctx: &Context, id: Option<&str>) -> Result<()> {
    let app = ctx.open_app_once()?;
    let session = app.session().current();

    if !session.is_authenticated() {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    }
    println!(
        "Logged in as {}",
        session.username.as_deref().unwrap_or("<unknown>").bold()
    );

    let profile = match id {
        Some(id) => Some(app.auth().load_profile(id).await?),
        None => app.auth().cached_profile()?,
    };
    if let Some(profile) = profile {
        println!("  id:     {}", profile.id.map(|v| v.to_string()).unwrap_or_default());
        println!("  role:   {}", profile.role.unwrap_or_default());
        println!(
            "  avatar: {}",
            if profile.avatar.is_some() { "yes" } else { "no" }
        );
    }
    Ok(())
}
