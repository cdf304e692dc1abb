//! Whoami command implementation.

use anyhow::Result;

use crate::context::AppContext;
use crate::output;

pub fn run(ctx: &AppContext) -> Result<()> {
    let snapshot = ctx.session().snapshot();

    if !snapshot.authenticated && snapshot.refresh_token.is_none() {
        anyhow::bail!("Not signed in. Run 'bigs auth login' first.");
    }

    let avatar = match ctx.api_url() {
        Ok(api) => api.resolve_asset(&snapshot.profile.avatar),
        Err(_) => snapshot.profile.avatar.clone(),
    };

    output::field("Name", &snapshot.profile.display_name);
    output::field("Email", &snapshot.profile.email);
    output::field("Avatar", &avatar);
    output::field(
        "Access token",
        if snapshot.authenticated { "present" } else { "missing (refreshed on next request)" },
    );
    output::field("Session file", &ctx.data_dir().display().to_string());

    Ok(())
}
