/// A billable service offered by the company, before it has a row id.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub category: &'static str,
    pub name: &'static str,
    pub unit_price: f64,
}

const fn entry(category: &'static str, name: &'static str, unit_price: f64) -> CatalogEntry {
    CatalogEntry {
        category,
        name,
        unit_price,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    entry("Cleaning", "Basic Janitorial", 75.0),
    entry("Cleaning", "Deep Cleaning", 150.0),
    entry("Maintenance", "HVAC Inspection", 120.0),
    entry("Maintenance", "Light Fixture Replacement", 90.0),
    entry("Exterior", "Window Washing", 100.0),
    entry("Exterior", "Pressure Washing", 130.0),
];
