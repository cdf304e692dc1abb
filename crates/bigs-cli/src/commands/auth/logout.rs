use anyhow::Result;

use crate::context::AppContext;
use crate::output;

pub fn run(ctx: &AppContext) -> Result<()> {
    ctx.session().clear_auth();
    output::success("Signed out");
    Ok(())
}
