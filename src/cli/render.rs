//! Text rendering for the terminal front end.
//!
//! Pure formatting of ledger snapshots, bills and the menu. Amounts are
//! always shown with two decimal places.

use crate::{
    core::{
        billing::{BillBreakdown, LedgerTotals, format_amount},
        order::{Menu, OrderQuote},
        student::StudentRecord,
    },
    errors::Result,
};
use std::fmt::Write;

const RULE_WIDTH: usize = 86;

const fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Table of all students in insertion order.
pub fn students_table(records: &[StudentRecord]) -> Result<String> {
    let mut table = String::new();
    if records.is_empty() {
        writeln!(&mut table, "No students registered yet.")?;
        return Ok(table);
    }

    writeln!(
        &mut table,
        "{:<10} | {:<20} | {:<10} | {:<8} | {:<6} | {:>12}",
        "Roll No.", "Name", "Room No.", "Enrolled", "Meals", "Charges"
    )?;
    writeln!(&mut table, "{}", "-".repeat(RULE_WIDTH))?;
    for student in records {
        writeln!(
            &mut table,
            "{:<10} | {:<20} | {:<10} | {:<8} | {:<6} | {:>12}",
            student.roll_no(),
            student.name(),
            student.room_no(),
            yes_no(student.mess_enrolled()),
            student.meals_taken_this_month(),
            format_amount(student.individual_charges_this_month())
        )?;
    }
    writeln!(&mut table, "{}", "-".repeat(RULE_WIDTH))?;
    Ok(table)
}

/// Ledger-wide totals shown under the student table.
pub fn totals_summary(totals: &LedgerTotals) -> Result<String> {
    let mut summary = String::new();
    writeln!(
        &mut summary,
        "Students: {} ({} on the monthly plan)",
        totals.students, totals.enrolled
    )?;
    writeln!(
        &mut summary,
        "Plan Meals: {} | Individual Orders: {} | Base Charges: {}",
        format_amount(totals.plan_meal_cost),
        format_amount(totals.individual_cost),
        format_amount(totals.base_charges)
    )?;
    writeln!(
        &mut summary,
        "Grand Total: {}",
        format_amount(totals.grand_total)
    )?;
    Ok(summary)
}

/// Detail panel for one student.
pub fn student_details(student: &StudentRecord) -> Result<String> {
    let mut details = String::new();
    writeln!(&mut details, "--- Student Information ---")?;
    writeln!(&mut details, "Roll Number: {}", student.roll_no())?;
    writeln!(&mut details, "Name: {}", student.name())?;
    writeln!(&mut details, "Room Number: {}", student.room_no())?;
    writeln!(
        &mut details,
        "Monthly Plan Enrolled: {}",
        yes_no(student.mess_enrolled())
    )?;
    writeln!(
        &mut details,
        "Plan Meals Taken This Month: {}",
        student.meals_taken_this_month()
    )?;
    writeln!(
        &mut details,
        "Individual Order Charges This Month: {}",
        format_amount(student.individual_charges_this_month())
    )?;
    writeln!(&mut details, "---------------------------")?;
    Ok(details)
}

/// Bill panel for one student.
pub fn bill_summary(student: &StudentRecord, bill: &BillBreakdown) -> Result<String> {
    let mut summary = String::new();
    writeln!(
        &mut summary,
        "--- Mess Bill for {} (Roll: {}) ---",
        student.name(),
        student.roll_no()
    )?;
    writeln!(
        &mut summary,
        "Monthly Plan Enrolled: {}",
        yes_no(bill.enrolled)
    )?;

    if bill.enrolled {
        writeln!(
            &mut summary,
            "Plan Meals Taken This Month: {}",
            bill.meals_taken
        )?;
        writeln!(
            &mut summary,
            "Cost Per Plan Meal: {}",
            format_amount(bill.cost_per_plan_meal)
        )?;
        writeln!(
            &mut summary,
            "Total Plan Meal Cost: {}",
            format_amount(bill.plan_meal_cost)
        )?;
    } else if bill.has_unbilled_meals() {
        writeln!(
            &mut summary,
            "Plan Meals Taken This Month (while potentially enrolled): {}",
            bill.meals_taken
        )?;
        writeln!(
            &mut summary,
            "Note: Plan meal cost applies only if currently enrolled in the monthly plan."
        )?;
    } else {
        writeln!(&mut summary, "No plan meals recorded this month.")?;
    }

    if bill.base_charge > 0.0 {
        writeln!(
            &mut summary,
            "Monthly Base Charge: {}",
            format_amount(bill.base_charge)
        )?;
    }

    writeln!(
        &mut summary,
        "Individual Order Charges This Month: {}",
        format_amount(bill.individual_cost)
    )?;
    writeln!(
        &mut summary,
        "Total Monthly Bill: {}",
        format_amount(bill.total_bill)
    )?;
    writeln!(&mut summary, "------------------------------------")?;
    Ok(summary)
}

/// Numbered menu listing with prices.
pub fn menu_listing(menu: &Menu) -> Result<String> {
    let mut listing = String::new();
    for item in menu.items() {
        writeln!(
            &mut listing,
            "  {:<12} {} ({})",
            item.id,
            item.name,
            format_amount(item.price)
        )?;
    }
    Ok(listing)
}

/// Receipt shown after an order is placed.
pub fn order_confirmation(student: &StudentRecord, quote: &OrderQuote) -> Result<String> {
    let mut receipt = String::new();
    writeln!(&mut receipt, "--- Order Confirmation ---")?;
    writeln!(
        &mut receipt,
        "Student: {} (Roll: {})",
        student.name(),
        student.roll_no()
    )?;
    writeln!(
        &mut receipt,
        "Items Ordered: {}",
        quote.summary().join(", ")
    )?;
    writeln!(&mut receipt, "Order Total: {}", format_amount(quote.total))?;
    writeln!(
        &mut receipt,
        "This amount has been added to your individual mess charges for the month."
    )?;
    writeln!(&mut receipt, "---------------------------")?;
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::billing::{BillingRates, compute_bill};

    fn student(enrolled: bool, meals: u32, charges: f64) -> StudentRecord {
        let mut record = StudentRecord::new("101", "Amit Kumar", "A101");
        record.mess_enrolled = enrolled;
        record.meals_taken_this_month = meals;
        record.individual_charges_this_month = charges;
        record
    }

    const RATES: BillingRates = BillingRates {
        cost_per_plan_meal: 60.0,
        monthly_plan_base_charge: 0.0,
    };

    #[test]
    fn test_students_table_empty() {
        assert_eq!(students_table(&[]).unwrap(), "No students registered yet.\n");
    }

    #[test]
    fn test_students_table_row() {
        let table = students_table(&[student(true, 3, 40.0)]).unwrap();
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("101"));
        assert!(row.contains("Amit Kumar"));
        assert!(row.contains("Yes"));
        assert!(row.ends_with("40.00"));
    }

    #[test]
    fn test_bill_summary_enrolled() {
        let record = student(true, 3, 20.0);
        let summary = bill_summary(&record, &compute_bill(&record, &RATES)).unwrap();
        assert!(summary.contains("Total Plan Meal Cost: 180.00"));
        assert!(summary.contains("Total Monthly Bill: 200.00"));
        assert!(!summary.contains("Monthly Base Charge"));
    }

    #[test]
    fn test_bill_summary_unbilled_meals_note() {
        let record = student(false, 3, 0.0);
        let summary = bill_summary(&record, &compute_bill(&record, &RATES)).unwrap();
        assert!(summary.contains("(while potentially enrolled): 3"));
        assert!(summary.contains("Total Monthly Bill: 0.00"));
    }

    #[test]
    fn test_bill_summary_shows_base_charge() {
        let rates = BillingRates {
            cost_per_plan_meal: 60.0,
            monthly_plan_base_charge: 500.0,
        };
        let record = student(false, 0, 0.0);
        let summary = bill_summary(&record, &compute_bill(&record, &rates)).unwrap();
        assert!(summary.contains("No plan meals recorded this month."));
        assert!(summary.contains("Monthly Base Charge: 500.00"));
    }

    #[test]
    fn test_menu_listing() {
        let listing = menu_listing(&Menu::default()).unwrap();
        assert_eq!(listing.lines().count(), 5);
        assert!(listing.contains("Breakfast (60.00)"));
    }
}
