use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// Form fields for a new client. Nothing is validated; empty strings are stored as-is.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}
