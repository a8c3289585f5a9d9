use axum::extract::State;
use axum::response::Html;
use chrono::Local;

use super::flash::Flash;
use super::{page_context, templates};
use crate::dashboard::DashboardSummary;
use crate::db::Database;
use crate::error::Result;

pub async fn show(State(db): State<Database>, flash: Flash) -> Result<(Flash, Html<String>)> {
    let summary = DashboardSummary::load(&db, Local::now().date_naive()).await?;

    let mut context = page_context(&flash);
    context.insert("summary", &summary);

    Ok((flash, templates::render("dashboard.html", &context)?))
}
