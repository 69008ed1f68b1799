//! Place subcommands

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use places_core::api::{ImageUpload, NewPlaceForm, Place, UpdatePlaceForm};
use places_core::{Destination, Owner, Resolution};

use crate::app::{App, scoped};

#[derive(Debug, Args)]
pub struct PlacesArgs {
    /// Id of the user whose places to list
    pub user_id: String,
}

#[derive(Debug, Args)]
pub struct PlaceArgs {
    #[command(subcommand)]
    pub command: PlaceCommands,
}

#[derive(Debug, Subcommand)]
pub enum PlaceCommands {
    /// Show a single place
    Show {
        /// Place id
        place_id: String,
    },
    /// Share a new place
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        address: String,
        /// Image file of the place
        #[arg(long)]
        image: PathBuf,
    },
    /// Edit the title and description of a place you created
    Update {
        /// Place id
        place_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a place you created
    Delete {
        /// Place id
        place_id: String,
    },
}

pub async fn list(app: &App, args: PlacesArgs) -> Result<()> {
    let owner = Owner::new("user-places");
    let controller = owner.controller(app.api.transport());
    let places = scoped(owner, async {
        app.api
            .user_places(&controller, &args.user_id)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    if places.is_empty() {
        println!("No places found for {}.", args.user_id);
        return Ok(());
    }

    let session = app.session.snapshot();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Address").fg(Color::Cyan),
        Cell::new("Yours").fg(Color::Cyan),
    ]);
    for place in &places {
        table.add_row(vec![
            Cell::new(&place.id),
            Cell::new(&place.title),
            Cell::new(&place.address),
            Cell::new(if place.is_owned_by(&session) { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub async fn run(app: &App, args: PlaceArgs) -> Result<()> {
    match args.command {
        PlaceCommands::Show { place_id } => show(app, &place_id).await,
        PlaceCommands::New {
            title,
            description,
            address,
            image,
        } => {
            let form = NewPlaceForm {
                title,
                description,
                address,
                image: ImageUpload::from_path(&image).await?,
            };
            create(app, form).await
        }
        PlaceCommands::Update {
            place_id,
            title,
            description,
        } => update(app, &place_id, UpdatePlaceForm { title, description }).await,
        PlaceCommands::Delete { place_id } => delete(app, &place_id).await,
    }
}

async fn show(app: &App, place_id: &str) -> Result<()> {
    let place = fetch(app, place_id).await?;
    print_place(app, &place);
    Ok(())
}

async fn create(app: &App, form: NewPlaceForm) -> Result<()> {
    ensure_reachable(app, &Destination::NewPlace)?;

    let owner = Owner::new("new-place");
    let controller = owner.controller(app.api.transport());
    let saved = scoped(owner, async {
        app.api
            .create_place(&controller, &form)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    println!("Created place {}", saved.value.id);
    println!("Next: {}", saved.next);
    Ok(())
}

async fn update(app: &App, place_id: &str, form: UpdatePlaceForm) -> Result<()> {
    ensure_reachable(
        app,
        &Destination::UpdatePlace {
            place_id: place_id.to_string(),
        },
    )?;
    ensure_owned(app, &fetch(app, place_id).await?)?;

    let owner = Owner::new("update-place");
    let controller = owner.controller(app.api.transport());
    let saved = scoped(owner, async {
        app.api
            .update_place(&controller, place_id, &form)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    println!("Updated place {}", saved.value.id);
    println!("Next: {}", saved.next);
    Ok(())
}

async fn delete(app: &App, place_id: &str) -> Result<()> {
    ensure_owned(app, &fetch(app, place_id).await?)?;

    let owner = Owner::new("place-item");
    let controller = owner.controller(app.api.transport());
    let response = scoped(owner, async {
        app.api
            .delete_place(&controller, place_id)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    if response.message.is_empty() {
        println!("Deleted place {place_id}");
    } else {
        println!("{}", response.message);
    }
    Ok(())
}

async fn fetch(app: &App, place_id: &str) -> Result<Place> {
    let owner = Owner::new("place");
    let controller = owner.controller(app.api.transport());
    scoped(owner, async {
        app.api
            .place(&controller, place_id)
            .await
            .map_err(anyhow::Error::from)
    })
    .await
}

/// Refuse pages the route gate would redirect away from
fn ensure_reachable(app: &App, destination: &Destination) -> Result<()> {
    match app.gate.resolve(&destination.path()) {
        Resolution::Render(_) => Ok(()),
        Resolution::Redirect(fallback) => {
            bail!("{destination} is not available, redirected to {fallback}")
        }
    }
}

/// Only the creator may edit or delete a place
fn ensure_owned(app: &App, place: &Place) -> Result<()> {
    if !place.is_owned_by(&app.session.snapshot()) {
        bail!("Place {} belongs to another user", place.id);
    }
    Ok(())
}

fn print_place(app: &App, place: &Place) {
    println!("{}", place.title);
    println!("  Id:          {}", place.id);
    println!("  Address:     {}", place.address);
    println!("  Description: {}", place.description);
    if let Some(location) = place.location {
        println!("  Location:    {}, {}", location.lat, location.lng);
    }
    println!("  Creator:     {}", place.creator);
    println!("  Image:       {}", place.image_url(app.api.endpoints()));
}
