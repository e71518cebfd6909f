//! Aggregation and reporting views
//!
//! Read-only rollups computed on demand over the order store. Pure
//! queries, no side effects; a product that has since disappeared from
//! the catalog degrades to a placeholder label instead of failing the
//! whole aggregation.

mod catalog;
mod views;

pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use views::{
    CustomerSummary, ProductSales, ReportService, RevenueReport, StatusCounts,
};
