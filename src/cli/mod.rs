//! Interactive terminal front end.
//!
//! A numbered main menu over stdin/stdout. Every action reports its result as
//! one or more [`Status`] lines; yes/no prompts double as the ledger's
//! confirmation capability.

pub mod actions;
pub mod render;
pub mod terminal;

use crate::{
    config::mess::MessConfig,
    core::{billing::BillingRates, blob::BlobStore, order::Menu, status::Status, store::LedgerStore},
    errors::Result,
};
use actions::{Action, dispatch};
use std::{
    fmt::Write as _,
    io::{BufRead, Write},
};
use terminal::Terminal;
use tracing::{debug, info};

/// Billing rates and menu used by a session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Plan meal and base charge rates
    pub rates: BillingRates,
    /// Items available for individual orders
    pub menu: Menu,
}

impl Settings {
    /// Builds session settings from a validated configuration.
    pub fn from_config(config: &MessConfig) -> Result<Self> {
        Ok(Self {
            rates: config.rates(),
            menu: config.menu()?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rates: MessConfig::default().rates(),
            menu: Menu::default(),
        }
    }
}

fn main_menu() -> Result<String> {
    let mut menu = String::new();
    writeln!(&mut menu, "\n--- Hostel Mess Management System ---")?;
    for (number, action) in Action::ALL.iter().enumerate() {
        writeln!(&mut menu, "{}. {}", number + 1, action.label())?;
    }
    Ok(menu)
}

/// Runs the main menu until the user exits or input ends.
pub async fn run<S, R, W>(
    store: &mut LedgerStore<S>,
    settings: &Settings,
    term: &mut Terminal<R, W>,
) -> Result<()>
where
    S: BlobStore,
    R: BufRead,
    W: Write,
{
    let menu = main_menu()?;
    loop {
        term.say(&menu)?;
        let Some(choice) = term.ask(&format!("Enter your choice (1-{}): ", Action::ALL.len()))?
        else {
            info!("Input closed, leaving the menu");
            break;
        };

        let Some(action) = Action::parse(&choice) else {
            term.report(&Status::error(format!(
                "Invalid choice. Please enter a number between 1 and {}.",
                Action::ALL.len()
            )))?;
            continue;
        };

        if action == Action::Exit {
            term.say("Exiting Hostel Mess Management System. Goodbye!")?;
            break;
        }

        debug!(?action, "Running menu action");
        for status in dispatch(action, store, settings, term).await? {
            term.report(&status)?;
        }
    }
    Ok(())
}
