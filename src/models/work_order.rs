use chrono::NaiveDate;
use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct WorkOrder {
    pub id: i64,
    pub client_id: i64,
    pub description: String,
    pub status: String,
    pub due_date: NaiveDate,
}

/// A work order joined with its client's name, for list pages.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct WorkOrderListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: WorkOrder,
    pub client_name: String,
}

#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub client_id: i64,
    pub description: String,
    pub status: String,
    pub due_date: NaiveDate,
}

pub const STATUS_OPEN: &str = "Open";
