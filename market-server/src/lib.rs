//! Market Server - food marketplace order backend
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/        # Configuration, state, HTTP server
//! ├── orders/      # Order store and lifecycle service
//! ├── assignment/  # Seller/shipper handoff engine
//! ├── notify/      # Notification sink and dispatcher
//! ├── directory/   # External user directory seam
//! ├── reports/     # Read-only aggregation views
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # Logging setup
//! ```
//!
//! Order mutations always commit the order together with one audit
//! entry; notifications are written outside that unit of work and never
//! roll a transition back.

pub mod api;
pub mod assignment;
pub mod core;
pub mod directory;
pub mod notify;
pub mod orders;
pub mod reports;
pub mod utils;

// Re-export public types
pub use assignment::{AssignStrategy, AssignmentEngine, FirstVerified};
pub use crate::core::{Config, Server, ServerState};
pub use directory::{InMemoryDirectory, UserDirectory};
pub use notify::{NotificationDispatcher, NotificationSink};
pub use orders::{OrderService, OrderStore};
pub use reports::{InMemoryCatalog, ProductCatalog, ReportService};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, create the working directory, and initialize logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    std::fs::create_dir_all(config.log_dir())?;

    let log_dir = config.log_dir();
    if config.is_production() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }
    Ok(())
}
