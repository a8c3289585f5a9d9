use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use super::flash::{redirect_with, Flash, Notice};
use super::{page_context, templates};
use crate::db::Database;
use crate::error::Result;
use crate::models::BusinessIdentity;

/// Every field is overwritten; a missing one is stored as empty.
#[derive(Deserialize, Debug)]
pub struct SettingsForm {
    #[serde(default)]
    business_name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
}

pub async fn show(State(db): State<Database>, flash: Flash) -> Result<(Flash, Html<String>)> {
    let settings = db.get_settings().await?;

    let mut context = page_context(&flash);
    context.insert("settings", &settings);

    Ok((flash, templates::render("settings.html", &context)?))
}

pub async fn update(State(db): State<Database>, Form(form): Form<SettingsForm>) -> Result<Response> {
    db.update_settings(&BusinessIdentity {
        business_name: form.business_name,
        address: form.address,
        phone: form.phone,
        email: form.email,
    })
    .await?;

    Ok(redirect_with("/settings", Notice::SettingsUpdated))
}
