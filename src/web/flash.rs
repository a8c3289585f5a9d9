use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, IntoResponseParts, Redirect, Response, ResponseParts};

const COOKIE_NAME: &str = "flash";
const CLEAR_COOKIE: &str = "flash=; Path=/; Max-Age=0";

/// One-shot notices shown after a form post redirects.
///
/// Only the key travels in the cookie, so nothing user-controlled is ever
/// echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ClientAdded,
    WorkOrderCreated,
    InvoiceCreated,
    InvoicePaid,
    QuoteCreated,
    QuoteConverted,
    SettingsUpdated,
}

impl Notice {
    const ALL: [Notice; 7] = [
        Notice::ClientAdded,
        Notice::WorkOrderCreated,
        Notice::InvoiceCreated,
        Notice::InvoicePaid,
        Notice::QuoteCreated,
        Notice::QuoteConverted,
        Notice::SettingsUpdated,
    ];

    fn key(self) -> &'static str {
        match self {
            Notice::ClientAdded => "client-added",
            Notice::WorkOrderCreated => "work-order-created",
            Notice::InvoiceCreated => "invoice-created",
            Notice::InvoicePaid => "invoice-paid",
            Notice::QuoteCreated => "quote-created",
            Notice::QuoteConverted => "quote-converted",
            Notice::SettingsUpdated => "settings-updated",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::ClientAdded => "Client added successfully!",
            Notice::WorkOrderCreated => "Work order created!",
            Notice::InvoiceCreated => "Invoice created!",
            Notice::InvoicePaid => "Invoice marked as paid.",
            Notice::QuoteCreated => "Quote created!",
            Notice::QuoteConverted => "Quote converted to invoice.",
            Notice::SettingsUpdated => "Settings updated!",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.key() == key)
    }
}

/// 303 to `location`, leaving `notice` for the next page
pub fn redirect_with(location: &str, notice: Notice) -> Response {
    let cookie = format!("{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax", notice.key());
    ([(SET_COOKIE, cookie)], Redirect::to(location)).into_response()
}

/// The pending notice, if any. Returning it as part of the response clears
/// the cookie so it shows only once.
#[derive(Debug, Default)]
pub struct Flash(Option<Notice>);

impl Flash {
    pub fn message(&self) -> Option<&'static str> {
        self.0.map(Notice::message)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let notice = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, value)| Notice::from_key(value));

        Ok(Flash(notice))
    }
}

/// Drops any pending notice. Error pages do not show notices, so one left in
/// place would surface on some later, unrelated page.
pub fn discard(response: &mut Response) {
    response
        .headers_mut()
        .append(SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE));
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.0.is_some() {
            res.headers_mut()
                .append(SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE));
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};

    use super::*;

    async fn flash_from(cookie: &str) -> Flash {
        let request = Request::builder().header(COOKIE, cookie).body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        Flash::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[test]
    fn every_notice_round_trips_through_its_key() {
        for notice in Notice::ALL {
            assert_eq!(Notice::from_key(notice.key()), Some(notice));
        }
        assert_eq!(Notice::from_key("<script>"), None);
    }

    #[test]
    fn redirect_sets_the_cookie() {
        let response = redirect_with("/invoices", Notice::InvoicePaid);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/invoices");
        assert!(response.headers()[SET_COOKIE].to_str().unwrap().starts_with("flash=invoice-paid;"));
    }

    #[test]
    fn discard_expires_the_cookie() {
        let mut response = redirect_with("/clients", Notice::ClientAdded);
        discard(&mut response);
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.last().unwrap().to_str().unwrap(), CLEAR_COOKIE);
    }

    #[tokio::test]
    async fn reads_the_notice_among_other_cookies() {
        let flash = flash_from("theme=dark; flash=quote-created; other=1").await;
        assert_eq!(flash.message(), Some("Quote created!"));

        assert_eq!(flash_from("flash=unknown").await.message(), None);
        assert_eq!(flash_from("theme=dark").await.message(), None);
    }
}
