use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{NewCategory, NewExpense, create_category, create_expense, initialize_db};

/// A utility for creating a database filled with demo data for Expense Tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const CATEGORIES: [(&str, &str); 5] = [
    ("Food", "#EF4444"),
    ("Transport", "#3B82F6"),
    ("Entertainment", "#8B5CF6"),
    ("Bills", "#F59E0B"),
    ("Health", "#10B981"),
];

/// Description, amount, days before today and index into [CATEGORIES].
const EXPENSES: [(&str, f64, i64, usize); 12] = [
    ("Groceries", 1250.0, 0, 0),
    ("Metro card top up", 500.0, 0, 1),
    ("Lunch with team", 680.5, 1, 0),
    ("Movie tickets", 900.0, 2, 2),
    ("Electricity bill", 2300.0, 4, 3),
    ("Pharmacy", 415.75, 6, 4),
    ("Taxi to airport", 1100.0, 9, 1),
    ("Streaming subscription", 649.0, 12, 2),
    ("Internet bill", 999.0, 18, 3),
    ("Vegetables", 320.0, 25, 0),
    ("Gym membership", 1500.0, 33, 4),
    ("Concert", 2500.0, 41, 2),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, color) in CATEGORIES {
        let category = create_category(NewCategory::parse(Some(name), Some(color))?, &conn)?;
        category_ids.push(category.id);
    }

    println!("Creating expenses...");
    let today = OffsetDateTime::now_utc().date();
    for (description, amount, days_ago, category_index) in EXPENSES {
        let date = today - Duration::days(days_ago);
        let category_id = category_ids.get(category_index).copied();

        create_expense(NewExpense::new(amount, description, date, category_id)?, &conn)?;
    }

    println!("Success!");

    Ok(())
}
