//! User directory

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use places_core::Owner;

use crate::app::{App, scoped};

pub async fn run(app: &App) -> Result<()> {
    let owner = Owner::new("users");
    let controller = owner.controller(app.api.transport());
    let users = scoped(owner, async {
        app.api.users(&controller).await.map_err(anyhow::Error::from)
    })
    .await?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Places").fg(Color::Cyan),
        Cell::new("Image").fg(Color::Cyan),
    ]);

    let endpoints = app.api.endpoints();
    for user in &users {
        table.add_row(vec![
            Cell::new(&user.id),
            Cell::new(&user.name),
            Cell::new(user.place_count()),
            Cell::new(user.image_url(endpoints)),
        ]);
    }

    println!("{table}");
    Ok(())
}
