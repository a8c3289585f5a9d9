use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Service {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub unit_price: f64,
}
