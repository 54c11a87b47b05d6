//! Integration tests for catalogue maintenance and the loan listings

mod common;

use common::{date, Harness};
use core_library::{parse_quantity, ErrorKind, IssueRequest};

const NOT_RETURNED: &str = "--- Not Returned ---";

#[tokio::test]
async fn search_sorts_and_filters() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        for title in ["The Hobbit", "Dune", "Émile", "Hobbit Tales", "100% Cotton", "Война и мир"] {
            svc.add_book(title, "Someone", 1).await.unwrap();
        }

        let titles = |books: Vec<core_library::models::Book>| {
            books.into_iter().map(|b| b.title).collect::<Vec<_>>()
        };

        assert_eq!(
            titles(svc.search_books(None).await.unwrap()),
            vec![
                "100% Cotton",
                "Dune",
                "Hobbit Tales",
                "The Hobbit",
                "Émile",
                "Война и мир"
            ],
            "{}",
            h.name
        );
        assert_eq!(
            titles(svc.search_books(Some("  ")).await.unwrap()).len(),
            6,
            "{}",
            h.name
        );
        assert_eq!(
            titles(svc.search_books(Some("HOBBIT")).await.unwrap()),
            vec!["Hobbit Tales", "The Hobbit"],
            "{}",
            h.name
        );
        assert_eq!(
            titles(svc.search_books(Some("ÉMILE")).await.unwrap()),
            vec!["Émile"],
            "{}",
            h.name
        );
        assert_eq!(
            titles(svc.search_books(Some("война")).await.unwrap()),
            vec!["Война и мир"],
            "{}",
            h.name
        );
        assert_eq!(
            titles(svc.search_books(Some("%")).await.unwrap()),
            vec!["100% Cotton"],
            "{}",
            h.name
        );
    }
}

#[tokio::test]
async fn update_overwrites_fields() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        let book_id = svc.add_book("Dune", "Herbert", 2).await.unwrap();
        svc.issue_book(&IssueRequest::new(book_id, "R1").with_student_name("Ann"))
            .await
            .unwrap();

        // The new quantity is stored verbatim, ignoring the copy on loan.
        let quantity = parse_quantity(" 5 ").unwrap();
        svc.update_book(book_id, "Dune (2nd ed.)", "Frank Herbert", quantity)
            .await
            .unwrap();

        let book = svc.get_book(book_id).await.unwrap();
        assert_eq!(book.title, "Dune (2nd ed.)", "{}", h.name);
        assert_eq!(book.author, "Frank Herbert", "{}", h.name);
        assert_eq!(book.quantity, 5, "{}", h.name);

        let open = svc.list_open_loans().await.unwrap();
        assert_eq!(open[0].book_title, "Dune (2nd ed.)", "{}", h.name);
    }
}

#[tokio::test]
async fn update_rejections() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        let book_id = svc.add_book("Dune", "Herbert", 2).await.unwrap();

        let missing = svc
            .update_book(core_library::models::BookId(999), "X", "Y", 1)
            .await
            .unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound, "{}", h.name);

        let invalid = svc.update_book(book_id, "Dune", "Herbert", -1).await.unwrap_err();
        assert_eq!(invalid.kind(), ErrorKind::Validation, "{}", h.name);
        assert_eq!(h.quantity(book_id).await, 2, "{}", h.name);
    }
}

#[tokio::test]
async fn open_loans_oldest_first() {
    for h in Harness::all(date(2024, 1, 10)).await {
        let svc = &h.service;
        let dune = svc.add_book("Dune", "Herbert", 5).await.unwrap();
        let emma = svc.add_book("Emma", "Austen", 5).await.unwrap();

        let late = svc
            .issue_book(&IssueRequest::new(dune, "R1").with_student_name("Ann"))
            .await
            .unwrap();
        h.clock.set(date(2024, 1, 2));
        let early = svc
            .issue_book(&IssueRequest::new(emma, "R2").with_student_name("Ben"))
            .await
            .unwrap();
        let early_tie = svc
            .issue_book(&IssueRequest::new(dune, "R2"))
            .await
            .unwrap();

        let open = svc.list_open_loans().await.unwrap();
        let ids: Vec<_> = open.iter().map(|l| l.loan_id).collect();
        assert_eq!(ids, vec![early, early_tie, late], "{}", h.name);

        assert_eq!(open[0].book_title, "Emma", "{}", h.name);
        assert_eq!(open[0].student_name, "Ben", "{}", h.name);
        assert_eq!(open[0].roll_no, "R2", "{}", h.name);
        assert_eq!(open[0].issue_date, date(2024, 1, 2), "{}", h.name);
        assert_eq!(open[0].book_id, emma, "{}", h.name);
    }
}

#[tokio::test]
async fn history_newest_first_with_label() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        let dune = svc.add_book("Dune", "Herbert", 5).await.unwrap();

        let first = svc
            .issue_book(&IssueRequest::new(dune, "R1").with_student_name("Ann"))
            .await
            .unwrap();
        h.clock.set(date(2024, 1, 5));
        svc.return_book(first).await.unwrap();
        let second = svc
            .issue_book(&IssueRequest::new(dune, "R2").with_student_name("Ben"))
            .await
            .unwrap();

        let history = svc.list_loan_history().await.unwrap();
        let ids: Vec<_> = history.iter().map(|e| e.loan_id).collect();
        assert_eq!(ids, vec![second, first], "{}", h.name);

        assert_eq!(history[0].return_date_label(NOT_RETURNED), NOT_RETURNED, "{}", h.name);
        assert_eq!(history[1].return_date_label(NOT_RETURNED), "2024-01-05", "{}", h.name);
    }
}

#[tokio::test]
async fn deleted_book_drops_out_of_history() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        let dune = svc.add_book("Dune", "Herbert", 1).await.unwrap();
        let emma = svc.add_book("Emma", "Austen", 1).await.unwrap();
        let gone = svc
            .issue_book(&IssueRequest::new(dune, "R1").with_student_name("Ann"))
            .await
            .unwrap();
        svc.issue_book(&IssueRequest::new(emma, "R1")).await.unwrap();
        svc.return_book(gone).await.unwrap();

        svc.delete_book(dune).await.unwrap();

        let history = svc.list_loan_history().await.unwrap();
        assert_eq!(history.len(), 1, "{}", h.name);
        assert_eq!(history[0].book_title, "Emma", "{}", h.name);
        // The ledger row itself survives.
        assert!(svc.get_loan(gone).await.is_ok(), "{}", h.name);
    }
}

#[tokio::test]
async fn summary_counts() {
    for h in Harness::all(date(2024, 1, 1)).await {
        let svc = &h.service;
        let dune = svc.add_book("Dune", "Herbert", 2).await.unwrap();
        svc.add_book("Emma", "Austen", 3).await.unwrap();
        svc.issue_book(&IssueRequest::new(dune, "R1").with_student_name("Ann"))
            .await
            .unwrap();

        let summary = svc.summary().await.unwrap();
        assert_eq!(summary.titles, 2, "{}", h.name);
        assert_eq!(summary.available_copies, 4, "{}", h.name);
        assert_eq!(summary.students, 1, "{}", h.name);
        assert_eq!(summary.open_loans, 1, "{}", h.name);
    }
}
