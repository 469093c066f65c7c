//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod ledger_blob;

pub use ledger_blob::{Column as LedgerBlobColumn, Entity as LedgerBlob, Model as LedgerBlobModel};
