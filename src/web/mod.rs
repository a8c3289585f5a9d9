use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use chrono::{Local, NaiveDateTime};
use tera::Context;
use tower_http::trace::TraceLayer;

use crate::db::Database;

mod clients;
mod dashboard;
mod error;
mod flash;
mod forms;
mod invoices;
mod quotes;
mod settings;
pub mod templates;
mod work_orders;

use flash::Flash;

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::show))
        .route("/clients", get(clients::list).post(clients::create))
        .route("/work-orders", get(work_orders::list).post(work_orders::create))
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route("/invoice/:id/mark-paid", post(invoices::mark_paid))
        .route("/invoice/:id/pdf", get(invoices::pdf))
        .route("/quotes", get(quotes::list).post(quotes::create))
        .route("/quote/:id/convert", post(quotes::convert))
        .route("/settings", get(settings::show).post(settings::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Context every page starts from; the base layout reads `flash`.
fn page_context(flash: &Flash) -> Context {
    let mut context = Context::new();
    context.insert("flash", &flash.message());
    context
}

/// Creation timestamp for new documents, in server-local time
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::CATALOG;
    use crate::db::ListFilter;

    async fn app() -> (Router, Database) {
        let database = Database::in_memory().await;
        (router(AppState { database: database.clone() }), database)
    }

    async fn get(app: &Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn post(app: &Router, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn assert_redirect(response: &Response, to: &str) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], to);
    }

    #[tokio::test]
    async fn acme_invoice_lifecycle() {
        let (app, db) = app().await;

        let response = post(&app, "/clients", "name=Acme+Co&address=1+Main+St&phone=555-0100&email=ap%40acme.example").await;
        assert_redirect(&response, "/clients");
        assert!(response.headers()[SET_COOKIE].to_str().unwrap().starts_with("flash=client-added"));
        let acme = db.get_clients().await.unwrap().remove(0);

        let form = format!("client_id={}&description=Deep+Cleaning&amount=100.00", acme.id);
        assert_redirect(&post(&app, "/invoices", &form).await, "/invoices");

        let invoice = db.list_invoices(&ListFilter::default()).await.unwrap().remove(0).invoice;
        assert_eq!((invoice.subtotal, invoice.tax, invoice.total), (100.0, 10.0, 110.0));
        assert!(!invoice.paid);

        let mark_paid = format!("/invoice/{}/mark-paid", invoice.id);
        assert_redirect(&post(&app, &mark_paid, "").await, "/invoices");
        assert_redirect(&post(&app, &mark_paid, "").await, "/invoices");
        assert!(db.get_invoice(invoice.id).await.unwrap().paid);

        let response = get(&app, &format!("/invoice/{}/pdf", invoice.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            format!("attachment; filename=\"invoice_{}.pdf\"", invoice.id).as_str()
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let page = body_text(get(&app, "/invoices?status=paid").await).await;
        assert!(page.contains("Acme Co"));
        assert!(page.contains("$110.00"));
        let page = body_text(get(&app, "/invoices?status=unpaid").await).await;
        assert!(!page.contains("Acme Co</td>"));
    }

    #[tokio::test]
    async fn unknown_invoice_ids_are_not_found() {
        let (app, _) = app().await;

        assert_eq!(post(&app, "/invoice/99/mark-paid", "").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/invoice/99/pdf").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn quote_for_missing_client_is_rejected() {
        let (app, db) = app().await;

        let response = post(&app, "/quotes", "client_id=999&description=Window+Washing&amount=50").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(db.list_quotes(&ListFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_input_is_a_bad_request() {
        let (app, db) = app().await;
        post(&app, "/clients", "name=Acme+Co").await;

        let response = post(&app, "/work-orders", "client_id=1&description=Lights&status=Open&due_date=next+week").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("due_date"));

        let response = post(&app, "/invoices", "client_id=1&description=Lights&amount=lots").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(get(&app, "/quotes?date_from=yesterday").await.status(), StatusCode::BAD_REQUEST);
        assert!(db.get_work_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overflowing_amounts_are_refused() {
        let (app, db) = app().await;
        post(&app, "/clients", "name=Acme+Co").await;

        let response = post(&app, "/invoices", "client_id=1&description=Tower+refit&amount=1e308").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = post(&app, "/quotes", "client_id=1&description=Tower+refit&amount=1e308").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(db.list_invoices(&ListFilter::default()).await.unwrap().is_empty());
        assert_eq!(get(&app, "/invoices").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/quotes").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn error_page_consumes_a_pending_flash() {
        let (app, _) = app().await;

        let request = Request::builder()
            .uri("/invoice/99/pdf")
            .header(COOKIE, "flash=invoice-paid")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[SET_COOKIE], "flash=; Path=/; Max-Age=0");
    }

    #[tokio::test]
    async fn settings_default_then_update() {
        let (app, db) = app().await;

        let response = get(&app, "/settings").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Building Care Solutions"));
        assert_eq!(db.get_settings().await.unwrap().phone, "858-737-8499");

        let response = post(&app, "/settings", "business_name=Care+Co&address=2+Elm&phone=555&email=a%40b.c").await;
        assert_redirect(&response, "/settings");

        let settings = db.get_settings().await.unwrap();
        assert_eq!(settings.business_name, "Care Co");
        assert_eq!(settings.email, "a@b.c");
    }

    #[tokio::test]
    async fn flash_shows_once_and_is_cleared() {
        let (app, _) = app().await;

        let request = Request::builder()
            .uri("/clients")
            .header(COOKIE, "flash=client-added")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[SET_COOKIE], "flash=; Path=/; Max-Age=0");
        assert!(body_text(response).await.contains("Client added successfully!"));

        let response = get(&app, "/clients").await;
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn catalog_priced_quote_converts_to_invoice() {
        let (app, db) = app().await;
        db.seed_services(CATALOG).await.unwrap();
        post(&app, "/clients", "name=Zeta+Towers").await;

        let window = db
            .get_services()
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.name == "Window Washing")
            .unwrap();

        let page = body_text(get(&app, "/quotes").await).await;
        assert!(page.contains("Window Washing"));

        let form = format!("client_id=1&service_id={}&description=&amount=", window.id);
        assert_redirect(&post(&app, "/quotes", &form).await, "/quotes");

        let quote = db.list_quotes(&ListFilter::default()).await.unwrap().remove(0).quote;
        assert_eq!(quote.total, 100.0);

        let convert = format!("/quote/{}/convert", quote.id);
        assert_redirect(&post(&app, &convert, "").await, "/invoices");
        assert_eq!(post(&app, &convert, "").await.status(), StatusCode::CONFLICT);

        let invoices = db.list_invoices(&ListFilter::default()).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].invoice.total, 110.0);

        let page = body_text(get(&app, "/quotes?status=converted").await).await;
        assert!(page.contains("Zeta Towers</td>"));
    }

    #[tokio::test]
    async fn dashboard_and_lists_render() {
        let (app, _) = app().await;
        post(&app, "/clients", "name=Acme+Co").await;
        post(&app, "/work-orders", "client_id=1&description=Replace+filters&status=Open&due_date=2999-01-01").await;

        let page = body_text(get(&app, "/").await).await;
        assert!(page.contains("Replace filters"));

        for uri in ["/clients", "/work-orders", "/invoices", "/quotes"] {
            assert_eq!(get(&app, uri).await.status(), StatusCode::OK, "{uri}");
        }
    }
}
