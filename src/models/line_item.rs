use serde::{Deserialize, Serialize};

/// One billable line on a quote or invoice. Stored as a JSON array in the
/// owning row's `items` column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub amount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

pub fn encode_items(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

pub fn decode_items(raw: &str) -> Result<Vec<LineItem>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_stored_shape() {
        let items = decode_items(r#"[{"description": "Deep Cleaning", "amount": 150.0}]"#).unwrap();
        assert_eq!(items, vec![LineItem::new("Deep Cleaning", 150.0)]);
    }

    #[test]
    fn rejects_text_that_is_not_an_item_list() {
        assert!(decode_items("not json").is_err());
        assert!(decode_items(r#"{"description": "x", "amount": 1}"#).is_err());
        assert!(decode_items(r#"[{"description": "x"}]"#).is_err());
    }
}
