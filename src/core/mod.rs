//! Core business logic - framework-agnostic ledger, billing and ordering.
//!
//! Nothing in here knows about the terminal front end. Operations live as
//! methods on [`store::LedgerStore`], split by concern across the modules below.

/// Pure bill calculation over record snapshots
pub mod billing;
/// Blob store capability and its backends
pub mod blob;
/// Confirmation capability and mutation outcomes
pub mod confirm;
/// Monthly billing cycle reset
pub mod monthly;
/// Load-time coercion of persisted records
pub mod normalize;
/// Menu, order pricing and order placement
pub mod order;
/// Severity-tagged user-facing messages
pub mod status;
/// The ledger and its persistence
pub mod store;
/// Student records and per-student operations
pub mod student;

pub use billing::{BillBreakdown, BillingRates, LedgerTotals, compute_bill, compute_ledger_totals};
pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use confirm::{Applied, Confirm, FixedAnswer, Outcome};
pub use monthly::ResetOutcome;
pub use order::{Menu, MenuItem, OrderQuote, Selections, compute_order_total, parse_quantity};
pub use status::{Severity, Status};
pub use store::LedgerStore;
pub use student::{EnrollmentChange, StudentRecord};
