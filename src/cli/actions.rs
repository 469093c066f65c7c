//! Menu actions - one handler per main menu entry.
//!
//! Handlers gather raw input, call the ledger, and turn the result into
//! status lines. Ledger errors become statuses here; only terminal I/O
//! errors propagate.

use crate::{
    cli::{Settings, render, terminal::Terminal},
    core::{
        billing::{compute_bill, compute_ledger_totals},
        blob::BlobStore,
        confirm::{Applied, Outcome},
        monthly::ResetOutcome,
        order::{Selections, parse_quantity},
        status::Status,
        store::LedgerStore,
    },
    errors::Result,
};
use std::io::{BufRead, Write};

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Register a new student
    AddStudent,
    /// Put a student on or off the monthly plan
    SetEnrollment,
    /// Record one plan meal
    RecordMeal,
    /// Take back one plan meal
    ReduceMeal,
    /// Order items from the menu
    PlaceOrder,
    /// Show a student's bill
    CalculateBill,
    /// Show one student's details
    ViewStudent,
    /// Show the whole ledger
    ViewAll,
    /// Remove a student
    DeleteStudent,
    /// Start a new billing cycle
    ResetMonth,
    /// Leave the program
    Exit,
}

impl Action {
    /// Every action in menu order.
    pub const ALL: [Self; 11] = [
        Self::AddStudent,
        Self::SetEnrollment,
        Self::RecordMeal,
        Self::ReduceMeal,
        Self::PlaceOrder,
        Self::CalculateBill,
        Self::ViewStudent,
        Self::ViewAll,
        Self::DeleteStudent,
        Self::ResetMonth,
        Self::Exit,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddStudent => "Add New Student",
            Self::SetEnrollment => "Enroll/Un-enroll Student in Mess",
            Self::RecordMeal => "Record Plan Meal for Student",
            Self::ReduceMeal => "Reduce Plan Meal for Student",
            Self::PlaceOrder => "Place Food Order",
            Self::CalculateBill => "Calculate Mess Bill for Student",
            Self::ViewStudent => "View Student Details",
            Self::ViewAll => "View All Students",
            Self::DeleteStudent => "Delete Student",
            Self::ResetMonth => "Reset Monthly Meal Counts and Charges",
            Self::Exit => "Exit",
        }
    }

    /// Parses a 1-based menu number.
    #[must_use]
    pub fn parse(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        Self::ALL.get(index.checked_sub(1)?).copied()
    }
}

/// Reads one answer; end of input counts as an empty answer.
fn read<R: BufRead, W: Write>(term: &mut Terminal<R, W>, question: &str) -> Result<String> {
    Ok(term.ask(question)?.unwrap_or_default())
}

/// Success status followed by a save failure, if there was one.
fn applied_statuses<T>(applied: &Applied<T>, success: Status) -> Vec<Status> {
    let mut statuses = vec![success];
    if let Some(e) = &applied.save_error {
        statuses.push(Status::error(format!("Error saving data! {e}")));
    }
    statuses
}

/// Runs one action and returns the statuses to show.
pub async fn dispatch<S, R, W>(
    action: Action,
    store: &mut LedgerStore<S>,
    settings: &Settings,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>>
where
    S: BlobStore,
    R: BufRead,
    W: Write,
{
    match action {
        Action::AddStudent => add_student(store, term).await,
        Action::SetEnrollment => set_enrollment(store, term).await,
        Action::RecordMeal => record_meal(store, term).await,
        Action::ReduceMeal => reduce_meal(store, term).await,
        Action::PlaceOrder => place_order(store, settings, term).await,
        Action::CalculateBill => calculate_bill(store, settings, term),
        Action::ViewStudent => view_student(store, term),
        Action::ViewAll => view_all(store, settings, term),
        Action::DeleteStudent => delete_student(store, term).await,
        Action::ResetMonth => Ok(reset_month(store, term).await),
        Action::Exit => Ok(Vec::new()),
    }
}

async fn add_student<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number: ")?;
    let name = read(term, "Enter Name: ")?;
    let room_no = read(term, "Enter Room Number: ")?;

    Ok(match store.add_student(&roll_no, &name, &room_no).await {
        Ok(applied) => {
            let message = format!("Student '{}' added successfully.", applied.value.name());
            applied_statuses(&applied, Status::success(message))
        }
        Err(e) => vec![Status::from(e)],
    })
}

async fn set_enrollment<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student: ")?;
    let index = match store.require_index(&roll_no) {
        Ok(index) => index,
        Err(e) => return Ok(vec![Status::from(e)]),
    };

    let student = &store.records()[index];
    let name = student.name().to_string();
    term.say(&format!(
        "Student: {}, Currently Enrolled: {}",
        name,
        if student.mess_enrolled() { "Yes" } else { "No" }
    ))?;

    let enrolled = match read(term, "Enroll in mess? (yes/no): ")?
        .trim()
        .to_lowercase()
        .as_str()
    {
        "yes" | "y" => true,
        "no" | "n" => false,
        _ => {
            return Ok(vec![Status::warning(
                "Invalid choice. Please enter 'yes' or 'no'.",
            )]);
        }
    };

    Ok(match store.set_enrollment(&roll_no, enrolled).await {
        Ok(applied) => {
            let message = if enrolled {
                format!("{name} is now enrolled in the mess.")
            } else {
                format!("{name} is now un-enrolled from the mess.")
            };
            let mut statuses = applied_statuses(&applied, Status::success(message));
            if applied.value.leaves_unbilled_meals() {
                statuses.push(Status::warning(format!(
                    "{} plan meals recorded this month will not be billed while {name} is un-enrolled.",
                    applied.value.meals_taken_this_month
                )));
            }
            statuses
        }
        Err(e) => vec![Status::from(e)],
    })
}

async fn record_meal<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student: ")?;
    Ok(match store.record_plan_meal(&roll_no).await {
        Ok(applied) => {
            let name = store
                .find_by_roll_no(&roll_no)
                .map(|s| s.name().to_string())
                .unwrap_or_default();
            let message = format!(
                "Plan meal recorded for {name}. Total plan meals this month: {}.",
                applied.value
            );
            applied_statuses(&applied, Status::success(message))
        }
        Err(e) => vec![Status::from(e)],
    })
}

async fn reduce_meal<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student: ")?;
    Ok(match store.reduce_plan_meal(&roll_no).await {
        Ok(applied) => {
            let name = store
                .find_by_roll_no(&roll_no)
                .map(|s| s.name().to_string())
                .unwrap_or_default();
            let message = format!(
                "Plan meal count reduced by 1 for {name}. Total plan meals this month: {}.",
                applied.value
            );
            applied_statuses(&applied, Status::success(message))
        }
        Err(e) => vec![Status::from(e)],
    })
}

async fn place_order<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    settings: &Settings,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter your Roll Number: ")?;
    let index = match store.require_index(&roll_no) {
        Ok(index) => index,
        Err(e) => return Ok(vec![Status::from(e)]),
    };

    term.say("--- Menu ---")?;
    term.say(&render::menu_listing(&settings.menu)?)?;

    let mut selections = Selections::new();
    for item in settings.menu.items() {
        let quantity = parse_quantity(&read(term, &format!("Quantity of {}: ", item.name))?);
        selections.insert(item.id.clone(), i64::from(quantity));
    }

    Ok(
        match store
            .apply_order(&roll_no, &settings.menu, &selections, term)
            .await
        {
            Ok(Outcome::Completed(applied)) => {
                term.say(&render::order_confirmation(
                    &store.records()[index],
                    &applied.value,
                )?)?;
                applied_statuses(&applied, Status::success("Order placed successfully!"))
            }
            Ok(Outcome::Cancelled) => vec![Status::info("Order cancelled.")],
            Err(e) => vec![Status::from(e)],
        },
    )
}

fn calculate_bill<S, R: BufRead, W: Write>(
    store: &LedgerStore<S>,
    settings: &Settings,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student: ")?;
    let student = match store.require_index(&roll_no) {
        Ok(index) => &store.records()[index],
        Err(e) => return Ok(vec![Status::from(e)]),
    };

    let bill = compute_bill(student, &settings.rates);
    term.say(&render::bill_summary(student, &bill)?)?;
    Ok(vec![Status::success(format!(
        "Bill calculated for {}.",
        student.name()
    ))])
}

fn view_student<S, R: BufRead, W: Write>(
    store: &LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student: ")?;
    let student = match store.require_index(&roll_no) {
        Ok(index) => &store.records()[index],
        Err(e) => return Ok(vec![Status::from(e)]),
    };

    term.say(&render::student_details(student)?)?;
    Ok(vec![Status::success(format!(
        "Details displayed for {}.",
        student.name()
    ))])
}

fn view_all<S, R: BufRead, W: Write>(
    store: &LedgerStore<S>,
    settings: &Settings,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    term.say("--- All Registered Students ---")?;
    term.say(&render::students_table(store.records())?)?;
    if !store.is_empty() {
        let totals = compute_ledger_totals(store.records(), &settings.rates);
        term.say(&render::totals_summary(&totals)?)?;
    }
    Ok(Vec::new())
}

async fn delete_student<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Result<Vec<Status>> {
    let roll_no = read(term, "Enter Roll Number of the student to delete: ")?;
    Ok(match store.delete_student(&roll_no, term).await {
        Ok(Outcome::Completed(applied)) => {
            let message = format!("Student \"{}\" deleted successfully.", applied.value.name());
            applied_statuses(&applied, Status::success(message))
        }
        Ok(Outcome::Cancelled) => {
            let name = store
                .find_by_roll_no(&roll_no)
                .map(|s| s.name().to_string())
                .unwrap_or_default();
            vec![Status::info(format!("Deletion of student \"{name}\" cancelled."))]
        }
        Err(e) => vec![Status::from(e)],
    })
}

async fn reset_month<S: BlobStore, R: BufRead, W: Write>(
    store: &mut LedgerStore<S>,
    term: &mut Terminal<R, W>,
) -> Vec<Status> {
    match store.reset_monthly_cycle(term).await {
        ResetOutcome::NothingToReset => vec![Status::info("No students to reset.")],
        ResetOutcome::Cancelled => vec![Status::info("Meal count reset cancelled.")],
        ResetOutcome::Reset(applied) => applied_statuses(
            &applied,
            Status::success(
                "Monthly meal counts and individual charges have been reset for all students.",
            ),
        ),
    }
}
