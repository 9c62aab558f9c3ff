//! Service layer
//!
//! Pure aggregation over a loaded ledger, and the session context that the
//! interactive loop threads through each event.

pub mod aggregate;
pub mod session;

pub use aggregate::{
    available_months, in_month, lifetime_summary, summarize, total, BudgetState, BudgetStatus,
    CategorySummary, CategoryTotal,
};
pub use session::Session;
