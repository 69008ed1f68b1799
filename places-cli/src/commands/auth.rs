//! Session subcommands: login, register, logout, status

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use dialoguer::{Password, theme::ColorfulTheme};
use places_core::api::{AuthOutcome, ImageUpload, LoginForm, SignupForm};
use places_core::{BootstrapOutcome, Owner};

use crate::app::{App, scoped};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Profile image file
    #[arg(long)]
    pub image: PathBuf,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let form = LoginForm {
        email: args.email,
        password: password_or_prompt(args.password)?,
    };

    let owner = Owner::new("login");
    let controller = owner.controller(app.api.transport());
    let outcome = scoped(owner, async {
        app.api
            .login(&controller, &form)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    report_auth(outcome)
}

pub async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    let image = ImageUpload::from_path(&args.image).await?;
    let form = SignupForm {
        name: args.name,
        email: args.email,
        password: password_or_prompt(args.password)?,
        image,
    };

    let owner = Owner::new("register");
    let controller = owner.controller(app.api.transport());
    let outcome = scoped(owner, async {
        app.api
            .register(&controller, &form)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    report_auth(outcome)
}

pub async fn logout(app: &App) -> Result<()> {
    if app.api.logout().await? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    let snapshot = app.session.snapshot();
    match snapshot.user_id() {
        Some(user_id) => println!("Logged in as {user_id}"),
        None => println!("Not logged in"),
    }

    let restored = match &app.bootstrap {
        BootstrapOutcome::Restored { .. } => "restored from disk".to_string(),
        BootstrapOutcome::Anonymous => "no stored session".to_string(),
        BootstrapOutcome::Unavailable { reason } => format!("store unavailable ({reason})"),
    };
    println!("  Session:  {restored}");
    println!("  Store:    {}", app.store.path().display());
    println!("  API:      {}", app.config.api.base_url);
    println!("  Assets:   {}", app.config.api.asset_url);

    let routes = app.gate.routes();
    println!();
    println!("Reachable pages:");
    for binding in routes.bindings() {
        println!("  {}", binding.pattern);
    }
    println!("Everything else goes to {}", routes.fallback());
    Ok(())
}

fn report_auth(outcome: AuthOutcome) -> Result<()> {
    match outcome {
        AuthOutcome::Authenticated { user_id } => {
            println!("Logged in as {user_id}");
            Ok(())
        }
        AuthOutcome::Stale => bail!("Session changed while logging in, please try again"),
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    let password = match password {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}
