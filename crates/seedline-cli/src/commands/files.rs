use super::Context;
use crate::output;
use anyhow::{Result, bail};
use seedline_application::ListState;
use seedline_core::catalog::SharedFile;
use seedline_core::{Navigator, Route};
use std::path::Path;
use std::time::Duration;

const WATCH_CHECK: Duration = Duration::from_millis(500);

fn not_logged_in() -> anyhow::Error {
    anyhow::anyhow!("Not logged in. Run `seedline login <username> -p <password>` first.")
}

fn report(state: &ListState<SharedFile>) -> Result<()> {
    if let Some(err) = &state.last_error {
        bail!("{}", err);
    }
    output::files(&state.items);
    Ok(())
}

pub async fn shared(ctx: &Context, watch: bool) -> Result<()> {
    if !watch {
        let app = ctx.open_app_once()?;
        if !app.router().enter(Route::SharedFiles) {
            return Err(not_logged_in());
        }
        let list = app.shared_files().list();
        list.refresh().await;
        return report(&list.state().await);
    }

    let app = ctx.open_app()?;
    if !app.enter(Route::SharedFiles) {
        return Err(not_logged_in());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(WATCH_CHECK);
    let mut shown: Option<Vec<SharedFile>> = None;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {}
        }

        if app.router().current() == Route::Login {
            app.shutdown();
            return Err(not_logged_in());
        }

        let state = app.shared_files().list().state().await;
        if state.loading || shown.as_ref() == Some(&state.items) {
            continue;
        }
        if let Some(err) = &state.last_error {
            tracing::debug!("Refresh failed, keeping previous list: {}", err);
        }
        if shown.is_some() || state.last_error.is_none() {
            println!();
            output::files(&state.items);
            shown = Some(state.items);
        }
    }

    app.shutdown();
    Ok(())
}

pub async fn mine(ctx: &Context) -> Result<()> {
    let app = ctx.open_app_once()?;
    if !app.router().enter(Route::MyFiles) {
        return Err(not_logged_in());
    }
    let list = app.my_files().list();
    list.refresh().await;
    report(&list.state().await)
}

pub async fn upload(ctx: &Context, path: &Path) -> Result<()> {
    let app = ctx.open_app_once()?;
    if !app.router().enter(Route::MyFiles) {
        return Err(not_logged_in());
    }

    let result = app.my_files().upload_path(path).await;
    output::notifications(app.notifications());
    result?.into_result()?;

    output::files(&app.my_files().list().items().await);
    Ok(())
}

pub async fn download(ctx: &Context, filename: &str) -> Result<()> {
    let app = ctx.open_app_once()?;
    if !app.router().enter(Route::SharedFiles) {
        return Err(not_logged_in());
    }

    let outcome = app.shared_files().download(filename).await;
    output::notifications(app.notifications());
    outcome.into_result()?;
    Ok(())
}
