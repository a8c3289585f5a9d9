use axum::extract::{Path, Query, State};
use axum::response::{Html, Response};
use axum::Form;

use super::flash::{redirect_with, Flash, Notice};
use super::forms::{LineItemForm, ListQuery};
use super::{now, page_context, templates};
use crate::db::{Database, QUOTE_STATUS};
use crate::error::Result;

pub async fn list(
    State(db): State<Database>,
    flash: Flash,
    Query(query): Query<ListQuery>,
) -> Result<(Flash, Html<String>)> {
    let quotes = db.list_quotes(&query.filter(QUOTE_STATUS)?).await?;
    let clients = db.get_clients().await?;
    let services = db.get_services().await?;

    let mut context = page_context(&flash);
    context.insert("quotes", &quotes);
    context.insert("clients", &clients);
    context.insert("services", &services);
    context.insert("filters", &query);
    context.insert("status_options", &[QUOTE_STATUS.set, QUOTE_STATUS.unset]);

    Ok((flash, templates::render("quotes.html", &context)?))
}

pub async fn create(State(db): State<Database>, Form(form): Form<LineItemForm>) -> Result<Response> {
    let (client_id, item) = form.resolve(&db).await?;
    db.create_quote(client_id, &[item], now()).await?;

    Ok(redirect_with("/quotes", Notice::QuoteCreated))
}

pub async fn convert(State(db): State<Database>, Path(id): Path<i64>) -> Result<Response> {
    db.convert_quote(id, now()).await?;

    Ok(redirect_with("/invoices", Notice::QuoteConverted))
}
