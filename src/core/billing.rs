//! Monthly bill calculation.
//!
//! All functions here are pure: they read a record snapshot and the fixed
//! rates and return structured data for the front end to format.

use crate::core::student::StudentRecord;

/// Rates fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingRates {
    /// Cost of one plan meal
    pub cost_per_plan_meal: f64,
    /// Fixed fee added to every bill (may be 0)
    pub monthly_plan_base_charge: f64,
}

/// Breakdown of one student's bill for the current month.
#[derive(Debug, Clone, PartialEq)]
pub struct BillBreakdown {
    /// Whether the student is on the monthly plan right now
    pub enrolled: bool,
    /// Plan meals recorded this month, reported even when not billed
    pub meals_taken: u32,
    /// Rate applied per plan meal
    pub cost_per_plan_meal: f64,
    /// Plan meal charge; zero unless currently enrolled
    pub plan_meal_cost: f64,
    /// Accumulated individual order charges
    pub individual_cost: f64,
    /// Fixed monthly fee
    pub base_charge: f64,
    /// Base charge + plan meal cost + individual cost
    pub total_bill: f64,
}

impl BillBreakdown {
    /// True when meals were recorded but the student is no longer enrolled,
    /// so they do not count towards the bill.
    #[must_use]
    pub const fn has_unbilled_meals(&self) -> bool {
        !self.enrolled && self.meals_taken > 0
    }
}

/// Computes the bill for one student.
///
/// Enrollment is evaluated at bill time: meals recorded while enrolled cost
/// nothing if the student has since left the plan.
///
/// # Arguments
/// * `record` - The student being billed
/// * `rates` - Plan meal cost and monthly base charge
///
/// # Returns
/// Each component of the bill and the total
#[must_use]
pub fn compute_bill(record: &StudentRecord, rates: &BillingRates) -> BillBreakdown {
    let enrolled = record.mess_enrolled();
    let meals_taken = record.meals_taken_this_month();
    let plan_meal_cost = if enrolled {
        f64::from(meals_taken) * rates.cost_per_plan_meal
    } else {
        0.0
    };
    let individual_cost = record.individual_charges_this_month();

    BillBreakdown {
        enrolled,
        meals_taken,
        cost_per_plan_meal: rates.cost_per_plan_meal,
        plan_meal_cost,
        individual_cost,
        base_charge: rates.monthly_plan_base_charge,
        total_bill: rates.monthly_plan_base_charge + plan_meal_cost + individual_cost,
    }
}

/// Sums of every bill in the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerTotals {
    /// Number of students
    pub students: usize,
    /// Number of students currently on the plan
    pub enrolled: usize,
    /// Total plan meal charges
    pub plan_meal_cost: f64,
    /// Total individual order charges
    pub individual_cost: f64,
    /// Total base charges
    pub base_charges: f64,
    /// Sum of all bills
    pub grand_total: f64,
}

/// Aggregates the bills of all students.
#[must_use]
pub fn compute_ledger_totals(records: &[StudentRecord], rates: &BillingRates) -> LedgerTotals {
    records
        .iter()
        .map(|record| compute_bill(record, rates))
        .fold(LedgerTotals::default(), |mut totals, bill| {
            totals.students += 1;
            if bill.enrolled {
                totals.enrolled += 1;
            }
            totals.plan_meal_cost += bill.plan_meal_cost;
            totals.individual_cost += bill.individual_cost;
            totals.base_charges += bill.base_charge;
            totals.grand_total += bill.total_bill;
            totals
        })
}

/// Formats a currency amount with two decimal places.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
