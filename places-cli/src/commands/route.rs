//! Resolve a client path the way the navigation layer would

use anyhow::Result;
use clap::Args;
use places_core::Resolution;

use crate::app::App;

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Path to resolve, e.g. `/places/new`
    pub path: String,
}

pub fn run(app: &App, args: RouteArgs) -> Result<()> {
    match app.gate.resolve(&args.path) {
        Resolution::Render(destination) => println!("render {destination}"),
        Resolution::Redirect(fallback) => println!("redirect {fallback}"),
    }
    Ok(())
}
