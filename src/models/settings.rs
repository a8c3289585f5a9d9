use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Settings {
    pub id: i64,
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct BusinessIdentity {
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for BusinessIdentity {
    fn default() -> Self {
        Self {
            business_name: "Building Care Solutions".to_string(),
            address: "8889 Caminito Plaza Centro Unit 7117, San Diego, CA 92122".to_string(),
            phone: "858-737-8499".to_string(),
            email: "mig.buildincaresolutions@gmail.com".to_string(),
        }
    }
}
