//! Student records and the operations that target a single student.
//!
//! Every mutation follows the same discipline: check preconditions, change
//! the in-memory record, then save the whole ledger. A failed save is
//! reported alongside the result and never undoes the change.

use crate::{
    core::{
        blob::BlobStore,
        confirm::{Applied, Confirm, Outcome},
        store::LedgerStore,
    },
    errors::{Error, Result},
};
use serde::Serialize;
use tracing::{info, warn};

/// One student in the ledger.
///
/// Serialized field names are the persisted blob format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub(crate) roll_no: String,
    pub(crate) name: String,
    pub(crate) room_no: String,
    pub(crate) mess_enrolled: bool,
    pub(crate) meals_taken_this_month: u32,
    pub(crate) individual_charges_this_month: f64,
}

impl StudentRecord {
    /// A fresh record: not enrolled, no meals, no charges.
    pub(crate) fn new(roll_no: &str, name: &str, room_no: &str) -> Self {
        Self {
            roll_no: roll_no.to_string(),
            name: name.to_string(),
            room_no: room_no.to_string(),
            mess_enrolled: false,
            meals_taken_this_month: 0,
            individual_charges_this_month: 0.0,
        }
    }

    /// Roll number, unique ignoring case.
    #[must_use]
    pub fn roll_no(&self) -> &str {
        &self.roll_no
    }

    /// Student name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Room number, possibly empty.
    #[must_use]
    pub fn room_no(&self) -> &str {
        &self.room_no
    }

    /// Whether the student is on the monthly meal plan.
    #[must_use]
    pub const fn mess_enrolled(&self) -> bool {
        self.mess_enrolled
    }

    /// Plan meals recorded in the current billing cycle.
    #[must_use]
    pub const fn meals_taken_this_month(&self) -> u32 {
        self.meals_taken_this_month
    }

    /// Individual order charges accumulated in the current billing cycle.
    #[must_use]
    pub const fn individual_charges_this_month(&self) -> f64 {
        self.individual_charges_this_month
    }

    pub(crate) fn matches_roll_no(&self, roll_no: &str) -> bool {
        self.roll_no.to_lowercase() == roll_no.to_lowercase()
    }
}

/// Enrollment before and after a [`LedgerStore::set_enrollment`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentChange {
    /// Enrollment before the call
    pub previous: bool,
    /// Enrollment after the call
    pub current: bool,
    /// Plan meals already recorded this month
    pub meals_taken_this_month: u32,
}

impl EnrollmentChange {
    /// True when the student left the plan with meals already recorded;
    /// those meals stay on record but are no longer billed.
    #[must_use]
    pub const fn leaves_unbilled_meals(&self) -> bool {
        self.previous && !self.current && self.meals_taken_this_month > 0
    }
}

impl<S: BlobStore> LedgerStore<S> {
    /// Registers a new student.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number, trimmed
    /// * `name` - Student name, trimmed
    /// * `room_no` - Room number, trimmed, may be empty
    ///
    /// # Returns
    /// A copy of the new record
    ///
    /// # Errors
    /// - `Error::Validation` if the roll number or name is blank
    /// - `Error::DuplicateStudent` if the roll number is taken (ignoring case)
    pub async fn add_student(
        &mut self,
        roll_no: &str,
        name: &str,
        room_no: &str,
    ) -> Result<Applied<StudentRecord>> {
        let roll_no = roll_no.trim();
        let name = name.trim();
        let room_no = room_no.trim();

        if roll_no.is_empty() || name.is_empty() {
            return Err(Error::validation("Roll Number and Name are required."));
        }

        if self.position(roll_no).is_some() {
            return Err(Error::DuplicateStudent {
                roll_no: roll_no.to_string(),
            });
        }

        let record = StudentRecord::new(roll_no, name, room_no);
        self.records.push(record.clone());
        info!("Added student {} ({})", record.roll_no, record.name);

        let save_error = self.save().await.err();
        Ok(Applied::new(record, save_error))
    }

    /// Removes a student once the caller confirms.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number of the student to remove
    /// * `confirm` - Asked before anything is removed
    ///
    /// # Returns
    /// * `Outcome::Completed` - The removed record
    /// * `Outcome::Cancelled` - The caller declined; nothing changed
    ///
    /// # Errors
    /// Returns `Error::StudentNotFound` if no student matches.
    pub async fn delete_student<C: Confirm>(
        &mut self,
        roll_no: &str,
        confirm: &mut C,
    ) -> Result<Outcome<StudentRecord>> {
        let index = self.require_index(roll_no)?;
        let student = &self.records[index];

        let prompt = format!(
            "Are you sure you want to delete student \"{}\" (Roll No: {})? This action cannot be undone.",
            student.name, student.roll_no
        );
        if !confirm.confirm(&prompt) {
            info!("Deletion of {} cancelled", student.roll_no);
            return Ok(Outcome::Cancelled);
        }

        let removed = self.records.remove(index);
        info!("Deleted student {} ({})", removed.roll_no, removed.name);

        let save_error = self.save().await.err();
        Ok(Outcome::Completed(Applied::new(removed, save_error)))
    }

    /// Puts a student on or takes them off the monthly plan.
    ///
    /// Never blocked by recorded meals: meals stay on record and are billed
    /// only while the student is enrolled.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number of the student
    /// * `enrolled` - Whether the student should be on the plan
    ///
    /// # Returns
    /// Enrollment before and after, with the meals already recorded
    ///
    /// # Errors
    /// Returns `Error::StudentNotFound` if no student matches.
    pub async fn set_enrollment(
        &mut self,
        roll_no: &str,
        enrolled: bool,
    ) -> Result<Applied<EnrollmentChange>> {
        let index = self.require_index(roll_no)?;
        let student = &mut self.records[index];

        let change = EnrollmentChange {
            previous: student.mess_enrolled,
            current: enrolled,
            meals_taken_this_month: student.meals_taken_this_month,
        };
        student.mess_enrolled = enrolled;

        if change.leaves_unbilled_meals() {
            warn!(
                "{} left the plan with {} meals recorded; they will not be billed",
                student.roll_no, student.meals_taken_this_month
            );
        } else {
            info!("Set enrollment of {} to {}", student.roll_no, enrolled);
        }

        let save_error = self.save().await.err();
        Ok(Applied::new(change, save_error))
    }

    /// Records one plan meal for an enrolled student.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number of the student
    ///
    /// # Returns
    /// The new plan meal count
    ///
    /// # Errors
    /// - `Error::StudentNotFound` if no student matches
    /// - `Error::NotEnrolled` if the student is not on the plan
    pub async fn record_plan_meal(&mut self, roll_no: &str) -> Result<Applied<u32>> {
        let index = self.require_index(roll_no)?;
        let student = &mut self.records[index];

        if !student.mess_enrolled {
            return Err(Error::NotEnrolled {
                name: student.name.clone(),
            });
        }

        student.meals_taken_this_month = student.meals_taken_this_month.saturating_add(1);
        let meals = student.meals_taken_this_month;
        info!("Plan meal recorded for {} ({} this month)", student.roll_no, meals);

        let save_error = self.save().await.err();
        Ok(Applied::new(meals, save_error))
    }

    /// Takes back one plan meal.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number of the student
    ///
    /// # Returns
    /// The new plan meal count
    ///
    /// # Errors
    /// - `Error::StudentNotFound` if no student matches
    /// - `Error::NothingToReduce` if no meals are recorded; the count never
    ///   goes below zero
    pub async fn reduce_plan_meal(&mut self, roll_no: &str) -> Result<Applied<u32>> {
        let index = self.require_index(roll_no)?;
        let student = &mut self.records[index];

        if student.meals_taken_this_month == 0 {
            return Err(Error::NothingToReduce {
                name: student.name.clone(),
            });
        }

        student.meals_taken_this_month -= 1;
        let meals = student.meals_taken_this_month;
        info!("Plan meal count reduced for {} ({} this month)", student.roll_no, meals);

        let save_error = self.save().await.err();
        Ok(Applied::new(meals, save_error))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::core::confirm::FixedAnswer;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_student_defaults() -> Result<()> {
        let mut store = setup_memory_store().await;
        let applied = store.add_student("  101 ", " Amit Kumar ", " A101 ").await?;
        assert!(applied.is_persisted());
        assert_eq!(applied.value.roll_no(), "101");

        let student = store.find_by_roll_no("101").unwrap();
        assert_eq!(student.name(), "Amit Kumar");
        assert_eq!(student.room_no(), "A101");
        assert!(!student.mess_enrolled());
        assert_eq!(student.meals_taken_this_month(), 0);
        assert_eq!(student.individual_charges_this_month(), 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_student_keeps_insertion_order() -> Result<()> {
        let mut store = setup_memory_store().await;
        for roll in ["300", "100", "200"] {
            store.add_student(roll, "Someone", "").await?;
        }
        let rolls: Vec<&str> = store.records().iter().map(StudentRecord::roll_no).collect();
        assert_eq!(rolls, vec!["300", "100", "200"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_student_requires_roll_and_name() {
        let mut store = setup_memory_store().await;
        assert!(matches!(
            store.add_student("   ", "Amit", "").await,
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            store.add_student("101", "  ", "").await,
            Err(Error::Validation { .. })
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_add_student_rejects_case_insensitive_duplicate() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("CS101", "Amit", "").await?;

        let result = store.add_student("cs101", "Other", "").await;
        assert!(matches!(result, Err(Error::DuplicateStudent { .. })));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_then_reduce_round_trip() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;
        store.set_enrollment("101", true).await?;
        store.record_plan_meal("101").await?;
        let before = store.find_by_roll_no("101").unwrap().meals_taken_this_month();

        assert_eq!(store.record_plan_meal("101").await?.value, before + 1);
        assert_eq!(store.reduce_plan_meal("101").await?.value, before);
        assert_eq!(
            store.find_by_roll_no("101").unwrap().meals_taken_this_month(),
            before
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_record_plan_meal_requires_enrollment() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;

        let err = store.record_plan_meal("101").await.unwrap_err();
        assert!(matches!(err, Error::NotEnrolled { .. }));
        assert_eq!(err.severity(), crate::core::status::Severity::Warning);
        assert_eq!(store.find_by_roll_no("101").unwrap().meals_taken_this_month(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reduce_plan_meal_never_goes_negative() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;

        let err = store.reduce_plan_meal("101").await.unwrap_err();
        assert!(matches!(err, Error::NothingToReduce { .. }));
        assert_eq!(store.find_by_roll_no("101").unwrap().meals_taken_this_month(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_operations_on_unknown_or_blank_roll() {
        let mut store = setup_memory_store().await;
        assert!(matches!(
            store.record_plan_meal("404").await,
            Err(Error::StudentNotFound { .. })
        ));
        assert!(matches!(
            store.reduce_plan_meal("404").await,
            Err(Error::StudentNotFound { .. })
        ));
        assert!(matches!(
            store.set_enrollment("404", true).await,
            Err(Error::StudentNotFound { .. })
        ));
        assert!(matches!(
            store.delete_student("404", &mut FixedAnswer(true)).await,
            Err(Error::StudentNotFound { .. })
        ));
        assert!(matches!(
            store.record_plan_meal("  ").await,
            Err(Error::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_enrollment_keeps_recorded_meals() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;
        store.set_enrollment("101", true).await?;
        store.record_plan_meal("101").await?;
        store.record_plan_meal("101").await?;

        let change = store.set_enrollment("101", false).await?.value;
        assert!(change.previous);
        assert!(!change.current);
        assert!(change.leaves_unbilled_meals());

        let student = store.find_by_roll_no("101").unwrap();
        assert!(!student.mess_enrolled());
        assert_eq!(student.meals_taken_this_month(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_student_confirmed() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;
        store.add_student("102", "Priya", "").await?;

        let outcome = store.delete_student("101", &mut FixedAnswer(true)).await?;
        let Outcome::Completed(applied) = outcome else {
            panic!("deletion should have completed");
        };
        assert_eq!(applied.value.name(), "Amit");
        assert!(store.find_by_roll_no("101").is_none());
        assert_eq!(store.len(), 1);

        let reloaded = reload(store).await;
        assert!(reloaded.find_by_roll_no("101").is_none());
        assert!(reloaded.find_by_roll_no("102").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_student_cancelled() -> Result<()> {
        let mut store = setup_memory_store().await;
        store.add_student("101", "Amit", "").await?;

        let mut prompts = Vec::new();
        let outcome = store
            .delete_student("101", &mut |prompt: &str| {
                prompts.push(prompt.to_string());
                false
            })
            .await?;
        assert!(outcome.is_cancelled());
        assert!(prompts[0].contains("\"Amit\" (Roll No: 101)"));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_failure_keeps_mutation() -> Result<()> {
        let mut store = setup_failing_store(&[("101", "Amit")]).await;

        let applied = store.set_enrollment("101", true).await?;
        assert!(matches!(applied.save_error, Some(Error::Persistence { .. })));

        let applied = store.record_plan_meal("101").await?;
        assert!(!applied.is_persisted());
        assert_eq!(applied.value, 1);
        assert_eq!(store.find_by_roll_no("101").unwrap().meals_taken_this_month(), 1);
        Ok(())
    }
}
