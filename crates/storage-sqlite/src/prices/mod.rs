//! SQLite storage implementation for daily prices.

mod model;
mod repository;

pub use model::StockPriceRow;
pub use repository::PriceRepository;

// Re-export trait from core for convenience
pub use tickerbeat_core::ingest::PriceStore;
