use chrono::NaiveDateTime;
use serde::Serialize;

use super::line_item::{decode_items, LineItem};

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Invoice {
    pub id: i64,
    pub client_id: i64,
    pub items: String,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub paid: bool,
    pub date_created: NaiveDateTime,
}

impl Invoice {
    pub fn line_items(&self) -> Result<Vec<LineItem>, serde_json::Error> {
        decode_items(&self.items)
    }
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct InvoiceListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client_name: String,
}
