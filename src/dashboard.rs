use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::error::Result;
use crate::models::WorkOrderListing;

pub const UPCOMING_LIMIT: i64 = 5;

/// Everything the landing page shows.
#[derive(Serialize, Debug)]
pub struct DashboardSummary {
    pub client_count: i64,
    pub open_work_orders: i64,
    pub unpaid_invoices: i64,
    pub pending_quotes: i64,
    pub upcoming_orders: Vec<WorkOrderListing>,
}

impl DashboardSummary {
    pub async fn load(db: &Database, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            client_count: db.count_clients().await?,
            open_work_orders: db.count_open_work_orders().await?,
            unpaid_invoices: db.count_unpaid_invoices().await?,
            pending_quotes: db.count_pending_quotes().await?,
            upcoming_orders: db.upcoming_work_orders(today, UPCOMING_LIMIT).await?,
        })
    }
}
