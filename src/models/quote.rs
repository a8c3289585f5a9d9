use chrono::NaiveDateTime;
use serde::Serialize;

use super::line_item::{decode_items, LineItem};

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Quote {
    pub id: i64,
    pub client_id: i64,
    pub items: String,
    pub total: f64,
    pub converted_to_invoice: bool,
    pub date_created: NaiveDateTime,
}

impl Quote {
    pub fn line_items(&self) -> Result<Vec<LineItem>, serde_json::Error> {
        decode_items(&self.items)
    }
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct QuoteListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quote: Quote,
    pub client_name: String,
}
