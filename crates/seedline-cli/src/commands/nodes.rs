use super::Context;
use crate::output;
use anyhow::{Result, anyhow, bail};
use seedline_core::Route;

pub async fn list(ctx: &Context) -> Result<()> {
    let app = ctx.open_app_once()?;
    if !app.router().enter(Route::Nodes) {
        return Err(anyhow!("Not logged in. Run `seedline login` first."));
    }

    let list = app.nodes().list();
    list.refresh().await;
    let state = list.state().await;
    if let Some(err) = state.last_error {
        bail!("{}", err);
    }
    output::nodes(&state.items);
    Ok(())
}
