//! Report computations

use super::catalog::ProductCatalog;
use crate::orders::storage::{OrderStore, StorageError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderStatus};
use std::collections::HashMap;
use std::sync::Arc;

/// Label used when a product no longer exists in the catalog
const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Revenue over a shop and time window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueReport {
    pub shop_id: i64,
    pub from: i64,
    pub to: i64,
    pub order_count: usize,
    pub revenue: Decimal,
}

/// Order counts per fulfillment status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub shipping: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

/// Per-customer rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub buyer_id: i64,
    pub total_orders: usize,
    pub delivered_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of order totals, cancelled orders excluded
    pub total_spent: Decimal,
    pub last_order_at: Option<i64>,
}

/// Sales rollup for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// Whether an order contributes to revenue figures
fn counts_toward_revenue(order: &Order) -> bool {
    order.status != OrderStatus::Cancelled
}

/// On-demand aggregation queries over the order store
#[derive(Clone)]
pub struct ReportService {
    store: OrderStore,
    catalog: Arc<dyn ProductCatalog>,
}

impl ReportService {
    pub fn new(store: OrderStore, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Revenue of one shop in `[from, to)`, cancelled orders excluded
    pub fn shop_revenue(&self, shop_id: i64, from: i64, to: i64) -> AppResult<RevenueReport> {
        let orders: Vec<Order> = self
            .store
            .find_by_shop(shop_id)
            .map_err(report_err)?
            .into_iter()
            .filter(|o| o.created_at >= from && o.created_at < to)
            .filter(counts_toward_revenue)
            .collect();

        Ok(RevenueReport {
            shop_id,
            from,
            to,
            order_count: orders.len(),
            revenue: orders.iter().map(|o| o.total_amount).sum(),
        })
    }

    /// Order counts grouped by fulfillment status
    pub fn status_counts(&self) -> AppResult<StatusCounts> {
        let mut counts = StatusCounts::default();
        for order in self.store.find_all().map_err(report_err)? {
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Confirmed => counts.confirmed += 1,
                OrderStatus::Shipping => counts.shipping += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }

    /// Rollup of one buyer's order history
    pub fn customer_summary(&self, buyer_id: i64) -> AppResult<CustomerSummary> {
        let orders = self.store.find_by_buyer(buyer_id).map_err(report_err)?;
        let mut summary = CustomerSummary {
            buyer_id,
            total_orders: orders.len(),
            delivered_orders: 0,
            cancelled_orders: 0,
            total_spent: Decimal::ZERO,
            last_order_at: None,
        };
        for order in &orders {
            match order.status {
                OrderStatus::Delivered => summary.delivered_orders += 1,
                OrderStatus::Cancelled => summary.cancelled_orders += 1,
                _ => {}
            }
            if counts_toward_revenue(order) {
                summary.total_spent += order.total_amount;
            }
            if summary.last_order_at.map_or(true, |t| order.created_at > t) {
                summary.last_order_at = Some(order.created_at);
            }
        }
        Ok(summary)
    }

    /// Best-selling products of a shop, by quantity sold
    ///
    /// Cancelled orders are excluded. Products missing from the catalog
    /// keep their rollup under a placeholder name.
    pub async fn top_products(&self, shop_id: i64, limit: usize) -> AppResult<Vec<ProductSales>> {
        let mut rollup: HashMap<i64, (i64, Decimal)> = HashMap::new();
        for order in self.store.find_by_shop(shop_id).map_err(report_err)? {
            if !counts_toward_revenue(&order) {
                continue;
            }
            for item in self.store.get_items(order.id).map_err(report_err)? {
                let slot = rollup
                    .entry(item.product_id)
                    .or_insert((0, Decimal::ZERO));
                slot.0 += item.quantity as i64;
                slot.1 += item.line_total();
            }
        }

        let mut sales = Vec::with_capacity(rollup.len());
        for (product_id, (quantity_sold, revenue)) in rollup {
            let name = self
                .catalog
                .product_name(product_id)
                .await?
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
            sales.push(ProductSales {
                product_id,
                name,
                quantity_sold,
                revenue,
            });
        }
        sales.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then(b.revenue.cmp(&a.revenue))
        });
        sales.truncate(limit);
        Ok(sales)
    }
}

fn report_err(err: StorageError) -> AppError {
    tracing::error!(error = %err, "Storage error while computing report");
    AppError::database(err.to_string())
}
