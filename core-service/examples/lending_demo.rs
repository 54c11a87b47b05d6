//! Lending walkthrough
//!
//! Bootstraps the core against a throwaway database file, then issues and
//! returns a book while printing the listings a front end would show.
//!
//! Run with:
//! ```bash
//! cargo run -p core-service --example lending_demo
//!
//! # JSON logs
//! cargo run -p core-service --example lending_demo -- json
//! ```

use bridge_traits::time::{FixedClock, LogLevel};
use chrono::NaiveDate;
use core_library::{IssueRequest, LibraryError};
use core_runtime::logging::{LogFormat, LoggingConfig};
use core_service::{CoreService, LibraryConfig};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let format = match env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    let path = env::temp_dir().join(format!("lending-demo-{}.db", uuid::Uuid::new_v4()));
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("bad date")?;
    let clock = Arc::new(FixedClock::new(start));

    let config = LibraryConfig::builder()
        .database_path(&path)
        .clock(clock.clone())
        .logging(
            LoggingConfig::default()
                .with_format(format)
                .with_level(LogLevel::Debug),
        )
        .build()?;

    let core = CoreService::bootstrap_with_logging(config).await?;
    let library = core.library();

    let dune = library.add_book("Dune", "Herbert", 2).await?;
    library.add_book("X", "Y", 0).await?;

    let loan = library
        .issue_book(&IssueRequest::new(dune, "R100").with_student_name("Alice"))
        .await?;
    println!("Issued loan {} for book {}", loan, dune);

    match library
        .issue_book(&IssueRequest::new(dune, "R100").with_student_name("Alice"))
        .await
    {
        Err(LibraryError::Conflict(reason)) => println!("Second issue refused: {}", reason),
        other => println!("Unexpected result: {:?}", other),
    }

    println!("\nCurrently issued:");
    for row in library.list_open_loans().await? {
        println!(
            "  #{} {} -> {} ({}) since {}",
            row.loan_id, row.book_title, row.student_name, row.roll_no, row.issue_date
        );
    }

    clock.set(NaiveDate::from_ymd_opt(2024, 3, 9).ok_or("bad date")?);
    library.return_book(loan).await?;

    println!("\nHistory:");
    for entry in library.list_loan_history().await? {
        println!(
            "  #{} {} | {} | issued {} | returned {}",
            entry.loan_id,
            entry.book_title,
            entry.roll_no,
            entry.issue_date,
            entry.return_date_label(core.not_returned_label())
        );
    }

    println!("\nCatalogue:");
    for book in library.search_books(None).await? {
        println!("  [{}] {} by {} - {} available", book.id, book.title, book.author, book.quantity);
    }

    let summary = library.summary().await?;
    println!(
        "\n{} titles, {} copies on the shelf, {} students, {} open loans",
        summary.titles, summary.available_copies, summary.students, summary.open_loans
    );

    core.shutdown().await;
    let _ = std::fs::remove_file(&path);
    Ok(())
}
