pub mod backfill;
pub mod types;

pub use backfill::{backfill_delay, backfill_email, backfill_lead_source, backfill_node};
pub use types::*;
