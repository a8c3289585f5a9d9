use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use super::flash::{redirect_with, Flash, Notice};
use super::{page_context, templates};
use crate::db::Database;
use crate::error::Result;
use crate::models::NewClient;

#[derive(Deserialize, Debug)]
pub struct ClientForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
}

impl From<ClientForm> for NewClient {
    fn from(form: ClientForm) -> Self {
        NewClient {
            name: form.name,
            address: form.address,
            phone: form.phone,
            email: form.email,
        }
    }
}

pub async fn list(State(db): State<Database>, flash: Flash) -> Result<(Flash, Html<String>)> {
    let clients = db.get_clients().await?;

    let mut context = page_context(&flash);
    context.insert("clients", &clients);

    Ok((flash, templates::render("clients.html", &context)?))
}

pub async fn create(State(db): State<Database>, Form(form): Form<ClientForm>) -> Result<Response> {
    db.create_client(&form.into()).await?;

    Ok(redirect_with("/clients", Notice::ClientAdded))
}
