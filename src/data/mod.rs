pub mod selection;
pub mod store;
pub mod types;

pub use selection::{Selection, DEFAULT_PERIOD_DAYS, MAX_PERIOD_DAYS, MIN_PERIOD_DAYS};
pub use store::{QuoteStore, QUOTES};
pub use types::*;
