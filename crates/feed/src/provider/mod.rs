//! Feed provider implementations.

mod traits;
mod yahoo;

pub use traits::FeedProvider;
pub use yahoo::YahooProvider;
