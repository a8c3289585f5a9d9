//! HTML page rendering with Tera.
//!
//! Templates are compiled into the binary and parsed once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::response::Html;
use serde_json::Value;
use tera::{Context, Tera};

use crate::error::Result;

const EMBEDDED: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("_filters.html", include_str!("../../templates/_filters.html")),
    ("_line_item_form.html", include_str!("../../templates/_line_item_form.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("clients.html", include_str!("../../templates/clients.html")),
    ("work_orders.html", include_str!("../../templates/work_orders.html")),
    ("invoices.html", include_str!("../../templates/invoices.html")),
    ("quotes.html", include_str!("../../templates/quotes.html")),
    ("settings.html", include_str!("../../templates/settings.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

static TERA: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.register_filter("money", money);
    tera.add_raw_templates(EMBEDDED.iter().copied())
        .expect("embedded templates should always parse");
    tera
});

/// Parse the templates now instead of on the first request.
///
/// # Panics
///
/// Panics if an embedded template fails to parse, which `every_page_renders`
/// guards against.
pub fn init() {
    LazyLock::force(&TERA);
}

pub fn render(name: &str, context: &Context) -> Result<Html<String>> {
    Ok(Html(TERA.render(name, context)?))
}

/// `{{ invoice.total | money }}` renders `$110.00`
fn money(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("money filter expects a number, got {value}")))?;

    Ok(Value::String(format!("${amount:.2}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Settings};

    fn context_with_flash() -> Context {
        let mut context = Context::new();
        context.insert("flash", &Some("Saved"));
        context
    }

    #[test]
    fn every_page_renders() {
        let mut context = context_with_flash();
        context.insert(
            "summary",
            &serde_json::json!({
                "client_count": 1, "open_work_orders": 0, "unpaid_invoices": 0,
                "pending_quotes": 0, "upcoming_orders": []
            }),
        );
        context.insert("clients", &Vec::<Client>::new());
        context.insert("services", &Vec::<Value>::new());
        context.insert("orders", &Vec::<Value>::new());
        context.insert("invoices", &Vec::<Value>::new());
        context.insert("quotes", &Vec::<Value>::new());
        context.insert(
            "filters",
            &serde_json::json!({"search": "", "status": "", "date_from": "", "date_to": ""}),
        );
        context.insert("status_options", &["paid", "unpaid"]);
        context.insert(
            "settings",
            &Settings {
                id: 1,
                business_name: "Building Care Solutions".to_string(),
                address: "".to_string(),
                phone: "".to_string(),
                email: "".to_string(),
            },
        );
        context.insert("status", &404);
        context.insert("message", "gone");

        for (name, _) in EMBEDDED.iter().filter(|(name, _)| !name.starts_with('_')) {
            let html = render(name, &context).unwrap_or_else(|e| panic!("{name}: {e:?}"));
            assert!(html.0.contains("Saved"), "{name} lost the flash message");
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let mut context = context_with_flash();
        context.insert(
            "clients",
            &vec![Client {
                id: 1,
                name: "<script>alert(1)</script>".to_string(),
                address: "".to_string(),
                phone: "".to_string(),
                email: "".to_string(),
            }],
        );

        let html = render("clients.html", &context).unwrap().0;
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn money_formats_two_decimals() {
        let formatted = money(&serde_json::json!(110.0), &HashMap::new()).unwrap();
        assert_eq!(formatted, Value::String("$110.00".to_string()));
        assert!(money(&Value::Null, &HashMap::new()).is_err());
    }
}
