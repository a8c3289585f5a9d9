use serde::{Deserialize, Serialize};

use crate::billing::parse_amount;
use crate::db::{Database, ListFilter, StatusWords};
use crate::error::{Error, Result};
use crate::models::LineItem;

/// `?search=&status=&date_from=&date_to=` on the invoice and quote pages.
/// Echoed back into the filter form, so absent values serialize as "".
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date_from: String,
    #[serde(default)]
    pub date_to: String,
}

impl ListQuery {
    pub fn filter(&self, words: StatusWords) -> Result<ListFilter> {
        ListFilter::from_query(
            Some(&self.search),
            Some(&self.status),
            Some(&self.date_from),
            Some(&self.date_to),
            words,
        )
    }
}

/// The single-line quote/invoice form. A catalog service, when picked,
/// supplies whichever of description and amount were left blank.
#[derive(Deserialize, Debug, Default)]
pub struct LineItemForm {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
}

impl LineItemForm {
    pub async fn resolve(&self, db: &Database) -> Result<(i64, LineItem)> {
        let client_id = parse_id(&self.client_id, "client_id")?;

        let service = match self.service_id.trim() {
            "" => None,
            raw => Some(db.get_service(parse_id(raw, "service_id")?).await?),
        };

        let description = match (self.description.as_str(), &service) {
            ("", Some(service)) => service.name.clone(),
            (given, _) => given.to_string(),
        };

        let amount = match (self.amount.trim(), &service) {
            ("", Some(service)) => service.unit_price,
            ("", None) => return Err(Error::Validation("amount is required".to_string())),
            (given, _) => parse_amount(given)?,
        };

        Ok((client_id, LineItem::new(description, amount)))
    }
}

pub fn parse_id(raw: &str, field: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{field} '{raw}' is not a valid id")))
}
