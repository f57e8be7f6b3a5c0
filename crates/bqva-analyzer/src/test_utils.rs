//! Shared test utilities for bqva-analyzer

use bqva_core::{CatalogObject, DatasetRef, ObjectRef, QueryDialect};
use bqva_warehouse::MemoryWarehouse;

/// Parse a fully qualified `project:dataset.name` reference
pub fn obj(reference: &str) -> ObjectRef {
    ObjectRef::parse(reference, None).unwrap()
}

/// Dataset of a `project:dataset.name` reference
pub fn dataset_of(reference: &str) -> DatasetRef {
    obj(reference).dataset_ref()
}

/// A standard-dialect view
pub fn view(reference: &str, query: &str) -> CatalogObject {
    CatalogObject::view(obj(reference), query, QueryDialect::Standard)
}

/// A legacy-dialect view
pub fn legacy_view(reference: &str, query: &str) -> CatalogObject {
    CatalogObject::view(obj(reference), query, QueryDialect::Legacy)
}

pub fn table(reference: &str) -> CatalogObject {
    CatalogObject::table(obj(reference))
}

/// An in-memory warehouse holding `objects`, each in its own dataset
pub fn warehouse_with(objects: Vec<CatalogObject>) -> MemoryWarehouse {
    let warehouse = MemoryWarehouse::new();
    for object in objects {
        warehouse.insert_object(object).unwrap();
    }
    warehouse
}

/// Three datasets chained by views:
///
/// ```text
/// p:reporting.summary (view)
/// ├── p:marts.sales (view)
/// │   ├── p:raw.orders (table)
/// │   └── p:marts.fx_rates (table)
/// └── other:shared.calendar (table)
/// ```
pub fn layered_warehouse() -> MemoryWarehouse {
    warehouse_with(vec![
        view(
            "p:reporting.summary",
            "SELECT * FROM marts.sales s JOIN `other.shared.calendar` c ON s.day = c.day",
        ),
        view(
            "p:marts.sales",
            "SELECT o.*, r.rate FROM raw.orders o LEFT JOIN marts.fx_rates r USING (currency)",
        ),
        table("p:raw.orders"),
        table("p:marts.fx_rates"),
        table("other:shared.calendar"),
    ])
}
