//! Binary entry point: open the store, load the default courses and staff,
//! then hand control to whichever front-end the user picks.
use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use hogwarts_registry::audit::details;
use hogwarts_registry::{run_app, App, Config, Menu, Store};
use serde_json::json;
use tracing_subscriber::EnvFilter;

enum Interface {
    Terminal,
    Forms,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = Store::open(&config)?;
    tracing::debug!(db = %config.db_path.display(), "store opened");

    let report = store.seed_defaults();
    for failure in &report.failures {
        println!("{}", failure.user_message());
    }

    let Some(interface) = choose_interface()? else {
        return Ok(());
    };

    let audit = store.audit().clone();
    let (result, context) = match interface {
        Interface::Terminal => {
            let stdin = io::stdin();
            let mut menu = Menu::new(&store, stdin.lock(), io::stdout());
            (menu.run(), "Failed to access terminal menu")
        }
        Interface::Forms => {
            let mut app = App::new(store);
            (run_app(&mut app), "Failed to access visual menu")
        }
    };

    if let Err(err) = result {
        println!(
            "An error occurred while accessing the menu. Please check the hogwarts_error_log file for more information."
        );
        audit.report_error(context, details([("Exception", json!(format!("{err:#}")))]));
    }
    Ok(())
}

/// `--terminal` or `--tui` skip the prompt. Otherwise ask until the answer
/// is usable; `None` means stdin closed first.
fn choose_interface() -> Result<Option<Interface>> {
    match env::args().nth(1).as_deref() {
        Some("--terminal") => return Ok(Some(Interface::Terminal)),
        Some("--tui") => return Ok(Some(Interface::Forms)),
        _ => {}
    }

    println!("\nWelcome to Hogwarts Management System");
    println!("=========================================");
    println!("Choose an interface:");
    println!("1. Terminal");
    println!("2. GUI");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter 1 or 2: ");
        io::stdout().flush().context("failed to flush prompt")?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        match line.context("failed to read input")?.trim() {
            "1" => return Ok(Some(Interface::Terminal)),
            "2" => return Ok(Some(Interface::Forms)),
            _ => println!("Invalid option."),
        }
    }
}
