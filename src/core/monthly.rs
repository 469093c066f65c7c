//! Monthly billing cycle reset.
//!
//! At the start of a new billing cycle every student's plan meal count and
//! individual charges go back to zero. The reset touches all records in one
//! pass and saves once, so the stored ledger is either fully reset or not
//! written at all.

use crate::core::{
    blob::BlobStore,
    confirm::{Applied, Confirm},
    store::LedgerStore,
};
use tracing::info;

/// What a reset request ended up doing.
#[derive(Debug)]
pub enum ResetOutcome {
    /// The ledger is empty; nothing was asked or changed
    NothingToReset,
    /// The caller declined; nothing changed
    Cancelled,
    /// Every record was reset; carries the number of records
    Reset(Applied<usize>),
}

impl<S: BlobStore> LedgerStore<S> {
    /// Starts a new billing cycle once the caller confirms.
    ///
    /// A failed save is reported in the returned [`Applied`]; the reset has
    /// already been applied to every record by then.
    ///
    /// # Arguments
    /// * `confirm` - Asked before anything is reset; not asked for an empty ledger
    ///
    /// # Returns
    /// * `ResetOutcome::NothingToReset` - The ledger is empty
    /// * `ResetOutcome::Cancelled` - The caller declined
    /// * `ResetOutcome::Reset` - Number of records reset
    pub async fn reset_monthly_cycle<C: Confirm>(&mut self, confirm: &mut C) -> ResetOutcome {
        if self.records.is_empty() {
            return ResetOutcome::NothingToReset;
        }

        let prompt = "Are you sure you want to reset monthly meal counts AND individual charges \
                      for ALL students to 0? This is typically done at the start of a new billing cycle.";
        if !confirm.confirm(prompt) {
            info!("Monthly reset cancelled");
            return ResetOutcome::Cancelled;
        }

        for student in &mut self.records {
            student.meals_taken_this_month = 0;
            student.individual_charges_this_month = 0.0;
        }
        let count = self.records.len();
        info!("Reset monthly counters for {} students", count);

        let save_error = self.save().await.err();
        ResetOutcome::Reset(Applied::new(count, save_error))
    }
}
