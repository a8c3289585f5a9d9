use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use super::flash::{redirect_with, Flash, Notice};
use super::forms::parse_id;
use super::{page_context, templates};
use crate::db::{parse_date, Database};
use crate::error::Result;
use crate::models::NewWorkOrder;

#[derive(Deserialize, Debug)]
pub struct WorkOrderForm {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    due_date: String,
}

impl WorkOrderForm {
    fn parse(self) -> Result<NewWorkOrder> {
        Ok(NewWorkOrder {
            client_id: parse_id(&self.client_id, "client_id")?,
            due_date: parse_date(&self.due_date, "due_date")?,
            description: self.description,
            status: self.status,
        })
    }
}

pub async fn list(State(db): State<Database>, flash: Flash) -> Result<(Flash, Html<String>)> {
    let orders = db.get_work_orders().await?;
    let clients = db.get_clients().await?;

    let mut context = page_context(&flash);
    context.insert("orders", &orders);
    context.insert("clients", &clients);

    Ok((flash, templates::render("work_orders.html", &context)?))
}

pub async fn create(State(db): State<Database>, Form(form): Form<WorkOrderForm>) -> Result<Response> {
    db.create_work_order(&form.parse()?).await?;

    Ok(redirect_with("/work-orders", Notice::WorkOrderCreated))
}
