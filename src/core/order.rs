//! Menu and order pricing.
//!
//! Provides the fixed food menu, the pure order-total computation, and
//! placing a confirmed order against a student's individual charges.

use crate::{
    core::{
        billing::format_amount,
        blob::BlobStore,
        confirm::{Applied, Confirm, Outcome},
        normalize::parse_int_prefix,
        store::LedgerStore,
    },
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// One orderable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Identifier used in selections (e.g. `"lunch"`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
}

impl MenuItem {
    fn new(id: &str, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
        }
    }
}

/// The validated, ordered list of menu items.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            items: vec![
                MenuItem::new("breakfast", "Breakfast", 60.0),
                MenuItem::new("lunch", "Lunch", 100.0),
                MenuItem::new("dinner", "Dinner", 100.0),
                MenuItem::new("snacks", "Snacks (Tea/Coffee + 1 item)", 30.0),
                MenuItem::new("juice", "Fresh Juice", 40.0),
            ],
        }
    }
}

impl Menu {
    /// Builds a menu, checking that identifiers are unique and non-empty and
    /// that every price is a finite non-negative number.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first invalid item.
    pub fn new(items: Vec<MenuItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("Menu item '{}' has an empty id", item.name),
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(Error::Config {
                    message: format!("Duplicate menu item id '{}'", item.id),
                });
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(Error::Config {
                    message: format!("Menu item '{}' has invalid price {}", item.id, item.price),
                });
            }
        }
        Ok(Self { items })
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Requested quantities keyed by menu item identifier.
pub type Selections = HashMap<String, i64>;

/// One priced line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Display name of the item
    pub name: String,
    /// Quantity ordered (always > 0)
    pub quantity: u32,
    /// Unit price at the time of ordering
    pub unit_price: f64,
}

impl OrderLine {
    /// Human-readable `"name x quantity"` summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} x {}", self.name, self.quantity)
    }
}

/// Priced order ready to be confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuote {
    /// Lines with a positive quantity, in menu order
    pub lines: Vec<OrderLine>,
    /// Total number of units across all lines
    pub item_count: u32,
    /// Sum of quantity × unit price
    pub total: f64,
}

impl OrderQuote {
    /// `"name x quantity"` entries for every ordered item.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        self.lines.iter().map(OrderLine::summary).collect()
    }
}

/// Clamps a requested quantity to `0..=u32::MAX`.
fn clamp_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(0)).unwrap_or(u32::MAX)
}

/// Coerces a raw quantity entry to a non-negative count. Anything that does
/// not start with an integer counts as zero; oversized entries saturate.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    parse_int_prefix(raw).map_or(0, clamp_quantity)
}

/// Prices a selection against the menu.
///
/// Missing, negative and unknown selections contribute nothing. Quantities
/// above `u32::MAX` are capped there.
///
/// # Errors
/// Returns `Error::EmptyOrder` if the total comes to zero.
pub fn compute_order_total(menu: &Menu, selections: &Selections) -> Result<OrderQuote> {
    let mut lines = Vec::new();
    let mut total = 0.0;
    let mut item_count: u32 = 0;

    for item in menu.items() {
        let quantity = clamp_quantity(selections.get(&item.id).copied().unwrap_or(0));
        if quantity == 0 {
            continue;
        }
        total += f64::from(quantity) * item.price;
        item_count = item_count.saturating_add(quantity);
        lines.push(OrderLine {
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
        });
    }

    if total <= 0.0 {
        return Err(Error::EmptyOrder);
    }

    Ok(OrderQuote {
        lines,
        item_count,
        total,
    })
}

impl<S: BlobStore> LedgerStore<S> {
    /// Prices an order and, once confirmed, adds it to the student's
    /// individual charges for the month.
    ///
    /// # Arguments
    /// * `roll_no` - Roll number of the student ordering
    /// * `menu` - Menu the selections are priced against
    /// * `selections` - Requested quantity per menu item id
    /// * `confirm` - Asked with the priced order before charging
    ///
    /// # Returns
    /// * `Outcome::Completed` - The charged quote
    /// * `Outcome::Cancelled` - The caller declined; nothing changed
    ///
    /// # Errors
    /// Returns `Error::StudentNotFound` if no student matches and
    /// `Error::EmptyOrder` if nothing was selected. Neither changes state.
    pub async fn apply_order<C: Confirm>(
        &mut self,
        roll_no: &str,
        menu: &Menu,
        selections: &Selections,
        confirm: &mut C,
    ) -> Result<Outcome<OrderQuote>> {
        let index = self.require_index(roll_no)?;
        let quote = compute_order_total(menu, selections)?;

        let student = &self.records[index];
        let prompt = format!(
            "Confirm order for {}?\n\nItems: {}\nTotal Cost: {}",
            student.name(),
            quote.summary().join(", "),
            format_amount(quote.total)
        );
        if !confirm.confirm(&prompt) {
            info!("Order for {} cancelled", student.roll_no());
            return Ok(Outcome::Cancelled);
        }

        let student = &mut self.records[index];
        student.individual_charges_this_month += quote.total;
        info!(
            "Charged {} to {} (individual total {})",
            format_amount(quote.total),
            student.roll_no(),
            format_amount(student.individual_charges_this_month)
        );

        let save_error = self.save().await.err();
        Ok(Outcome::Completed(Applied::new(quote, save_error)))
    }
}
