mod filter;

pub use filter::{parse_date, ListFilter, StatusWords, INVOICE_STATUS, QUOTE_STATUS};

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::billing::{quote_total, InvoiceTotals};
use crate::catalog::CatalogEntry;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    encode_items, BusinessIdentity, Client, Invoice, InvoiceListing, LineItem, NewClient, NewWorkOrder, Quote,
    QuoteListing, Service, Settings, WorkOrder, WorkOrderListing, STATUS_OPEN,
};

const WORK_ORDER_LISTING: &str = r#"
    SELECT w.id, w.client_id, w.description, w.status, w.due_date, c.name AS client_name
    FROM work_orders w
    JOIN clients c ON c.id = w.client_id
"#;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the SQLite file named by the config
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(config.database_url())?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database with the schema applied
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);

        // every pooled connection to :memory: is a separate database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();

        let db = Self { pool };
        db.migrate().await.unwrap();
        db
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }

    // Client operations
    pub async fn get_clients(&self) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY id ASC")
            .fetch_all(self.get_pool())
            .await?;

        Ok(clients)
    }

    pub async fn get_client(&self, id: i64) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        client.ok_or(Error::not_found("client", id))
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, address, phone, email)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&client.name)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(&client.email)
        .fetch_one(self.get_pool())
        .await?;

        tracing::info!(client_id = client.id, "client created");
        Ok(client)
    }

    pub async fn count_clients(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    // Work order operations
    pub async fn get_work_orders(&self) -> Result<Vec<WorkOrderListing>> {
        let orders = sqlx::query_as::<_, WorkOrderListing>(&format!("{WORK_ORDER_LISTING} ORDER BY w.id ASC"))
            .fetch_all(self.get_pool())
            .await?;

        Ok(orders)
    }

    pub async fn create_work_order(&self, order: &NewWorkOrder) -> Result<WorkOrder> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders (client_id, description, status, due_date)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(order.client_id)
        .bind(&order.description)
        .bind(&order.status)
        .bind(order.due_date)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| Error::from_insert(e, "work order"))?;

        tracing::info!(work_order_id = order.id, client_id = order.client_id, "work order created");
        Ok(order)
    }

    pub async fn count_open_work_orders(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM work_orders WHERE status = ?")
            .bind(STATUS_OPEN)
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    /// Work orders due on or after `today`, soonest first
    pub async fn upcoming_work_orders(&self, today: NaiveDate, limit: i64) -> Result<Vec<WorkOrderListing>> {
        let orders = sqlx::query_as::<_, WorkOrderListing>(&format!(
            "{WORK_ORDER_LISTING} WHERE w.due_date >= ? ORDER BY w.due_date ASC, w.id ASC LIMIT ?"
        ))
        .bind(today)
        .bind(limit)
        .fetch_all(self.get_pool())
        .await?;

        Ok(orders)
    }

    // Quote operations
    #[cfg(test)]
    pub async fn get_quote(&self, id: i64) -> Result<Quote> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        quote.ok_or(Error::not_found("quote", id))
    }

    pub async fn create_quote(&self, client_id: i64, items: &[LineItem], created: NaiveDateTime) -> Result<Quote> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (client_id, items, total, converted_to_invoice, date_created)
            VALUES (?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(encode_items(items)?)
        .bind(quote_total(items)?)
        .bind(created)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| Error::from_insert(e, "quote"))?;

        tracing::info!(quote_id = quote.id, client_id, total = quote.total, "quote created");
        Ok(quote)
    }

    pub async fn list_quotes(&self, filter: &ListFilter) -> Result<Vec<QuoteListing>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT q.id, q.client_id, q.items, q.total, q.converted_to_invoice, q.date_created,
                   c.name AS client_name
            FROM quotes q
            JOIN clients c ON c.id = q.client_id
            WHERE 1 = 1
            "#,
        );
        filter.push_conditions(&mut query, "q.converted_to_invoice", "q.date_created");
        query.push(" ORDER BY q.date_created DESC, q.id DESC");

        let quotes = query
            .build_query_as::<QuoteListing>()
            .fetch_all(self.get_pool())
            .await?;

        Ok(quotes)
    }

    pub async fn count_pending_quotes(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes WHERE converted_to_invoice = 0")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    /// Bill a quote: create an invoice carrying the quote's items and flag the
    /// quote as converted, both or neither.
    pub async fn convert_quote(&self, id: i64, created: NaiveDateTime) -> Result<Invoice> {
        let mut tx = self.pool.begin().await?;

        // claim the quote first so two concurrent conversions cannot both bill it
        let claimed = sqlx::query("UPDATE quotes SET converted_to_invoice = 1 WHERE id = ? AND converted_to_invoice = 0")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(Error::not_found("quote", id))?;

        if claimed == 0 {
            return Err(Error::Conflict(format!("quote {id} has already been converted to an invoice")));
        }

        let items = quote.line_items()?;
        let invoice = insert_invoice(&mut tx, quote.client_id, &items, created).await?;

        tx.commit().await?;

        tracing::info!(quote_id = id, invoice_id = invoice.id, "quote converted to invoice");
        Ok(invoice)
    }

    // Invoice operations
    pub async fn get_invoice(&self, id: i64) -> Result<Invoice> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        invoice.ok_or(Error::not_found("invoice", id))
    }

    pub async fn create_invoice(&self, client_id: i64, items: &[LineItem], created: NaiveDateTime) -> Result<Invoice> {
        let mut conn = self.pool.acquire().await?;
        let invoice = insert_invoice(&mut conn, client_id, items, created).await?;

        tracing::info!(invoice_id = invoice.id, client_id, total = invoice.total, "invoice created");
        Ok(invoice)
    }

    pub async fn list_invoices(&self, filter: &ListFilter) -> Result<Vec<InvoiceListing>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT i.id, i.client_id, i.items, i.subtotal, i.tax, i.total, i.paid, i.date_created,
                   c.name AS client_name
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE 1 = 1
            "#,
        );
        filter.push_conditions(&mut query, "i.paid", "i.date_created");
        query.push(" ORDER BY i.date_created DESC, i.id DESC");

        let invoices = query
            .build_query_as::<InvoiceListing>()
            .fetch_all(self.get_pool())
            .await?;

        Ok(invoices)
    }

    /// Set the paid flag. Marking an already-paid invoice again is not an error.
    pub async fn mark_invoice_paid(&self, id: i64) -> Result<()> {
        let updated = sqlx::query("UPDATE invoices SET paid = 1 WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(Error::not_found("invoice", id));
        }

        tracing::info!(invoice_id = id, "invoice marked paid");
        Ok(())
    }

    pub async fn count_unpaid_invoices(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices WHERE paid = 0")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    // Settings operations
    pub async fn get_settings(&self) -> Result<Settings> {
        let mut conn = self.pool.acquire().await?;
        load_or_create_settings(&mut conn).await
    }

    pub async fn update_settings(&self, identity: &BusinessIdentity) -> Result<Settings> {
        let mut tx = self.pool.begin().await?;

        let current = load_or_create_settings(&mut tx).await?;
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            UPDATE settings
            SET business_name = ?, address = ?, phone = ?, email = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&identity.business_name)
        .bind(&identity.address)
        .bind(&identity.phone)
        .bind(&identity.email)
        .bind(current.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(settings_id = settings.id, "settings updated");
        Ok(settings)
    }

    // Service catalog operations
    pub async fn get_services(&self) -> Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY category ASC, name ASC")
            .fetch_all(self.get_pool())
            .await?;

        Ok(services)
    }

    pub async fn get_service(&self, id: i64) -> Result<Service> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        service.ok_or(Error::not_found("service", id))
    }

    /// Insert each entry not already present by (category, name). Returns how
    /// many rows were added.
    pub async fn seed_services(&self, entries: &[CatalogEntry]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for entry in entries {
            inserted += sqlx::query(
                r#"
                INSERT INTO services (category, name, unit_price)
                SELECT ?, ?, ?
                WHERE NOT EXISTS (SELECT 1 FROM services WHERE category = ? AND name = ?)
                "#,
            )
            .bind(entry.category)
            .bind(entry.name)
            .bind(entry.unit_price)
            .bind(entry.category)
            .bind(entry.name)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }
}

async fn insert_invoice(
    conn: &mut SqliteConnection,
    client_id: i64,
    items: &[LineItem],
    created: NaiveDateTime,
) -> Result<Invoice> {
    let totals = InvoiceTotals::from_items(items)?;

    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (client_id, items, subtotal, tax, total, paid, date_created)
        VALUES (?, ?, ?, ?, ?, 0, ?)
        RETURNING *
        "#,
    )
    .bind(client_id)
    .bind(encode_items(items)?)
    .bind(totals.subtotal)
    .bind(totals.tax)
    .bind(totals.total)
    .bind(created)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| Error::from_insert(e, "invoice"))?;

    Ok(invoice)
}

/// The first settings row wins; an empty table gets the default identity.
async fn load_or_create_settings(conn: &mut SqliteConnection) -> Result<Settings> {
    let existing = sqlx::query_as::<_, Settings>("SELECT * FROM settings ORDER BY id ASC LIMIT 1")
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(settings) = existing {
        return Ok(settings);
    }

    let defaults = BusinessIdentity::default();
    let settings = sqlx::query_as::<_, Settings>(
        r#"
        INSERT INTO settings (business_name, address, phone, email)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&defaults.business_name)
    .bind(&defaults.address)
    .bind(&defaults.phone)
    .bind(&defaults.email)
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(settings_id = settings.id, "default settings created");
    Ok(settings)
}

/// Initialize the database connection pool and bring the schema up to date
pub async fn init(config: &Config) -> anyhow::Result<Database> {
    let db = Database::new(config).await?;

    db.migrate().await?;

    Ok(db)
}
