use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use super::flash::{redirect_with, Flash, Notice};
use super::forms::{LineItemForm, ListQuery};
use super::{now, page_context, templates};
use crate::db::{Database, INVOICE_STATUS};
use crate::error::Result;
use crate::invoice_gen::InvoiceDocument;

pub async fn list(
    State(db): State<Database>,
    flash: Flash,
    Query(query): Query<ListQuery>,
) -> Result<(Flash, Html<String>)> {
    let invoices = db.list_invoices(&query.filter(INVOICE_STATUS)?).await?;
    let clients = db.get_clients().await?;
    let services = db.get_services().await?;

    let mut context = page_context(&flash);
    context.insert("invoices", &invoices);
    context.insert("clients", &clients);
    context.insert("services", &services);
    context.insert("filters", &query);
    context.insert("status_options", &[INVOICE_STATUS.set, INVOICE_STATUS.unset]);

    Ok((flash, templates::render("invoices.html", &context)?))
}

pub async fn create(State(db): State<Database>, Form(form): Form<LineItemForm>) -> Result<Response> {
    let (client_id, item) = form.resolve(&db).await?;
    db.create_invoice(client_id, &[item], now()).await?;

    Ok(redirect_with("/invoices", Notice::InvoiceCreated))
}

pub async fn mark_paid(State(db): State<Database>, Path(id): Path<i64>) -> Result<Response> {
    db.mark_invoice_paid(id).await?;

    Ok(redirect_with("/invoices", Notice::InvoicePaid))
}

pub async fn pdf(State(db): State<Database>, Path(id): Path<i64>) -> Result<Response> {
    let invoice = db.get_invoice(id).await?;
    let client = db.get_client(invoice.client_id).await?;
    let settings = db.get_settings().await?;

    let document = InvoiceDocument::new(&invoice, &client, &settings)?;
    let bytes = document.render_pdf()?;

    let headers = [
        (CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
        (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", document.filename())),
    ];
    Ok((headers, bytes).into_response())
}
