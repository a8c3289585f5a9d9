mod client;
mod work_order;
mod line_item;
mod quote;
mod invoice;
mod settings;
mod service;

pub use client::{Client, NewClient};
pub use work_order::{WorkOrder, WorkOrderListing, NewWorkOrder, STATUS_OPEN};
pub use line_item::{LineItem, encode_items};
pub use quote::{Quote, QuoteListing};
pub use invoice::{Invoice, InvoiceListing};
pub use settings::{Settings, BusinessIdentity};
pub use service::Service;
