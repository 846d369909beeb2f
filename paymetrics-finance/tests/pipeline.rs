//! Batch runs over a mixed inbox.

use chrono::NaiveDate;
use paymetrics_core::{CategoryDefinition, CategoryName, FixedClock, RawEmail};
use paymetrics_finance::{DateRange, Pipeline, SkipReason, summarize, write_csv};
use paymetrics_ingest::InstitutionRegistry;
use rust_decimal::Decimal;

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2025, 8, 10).unwrap())
}

fn inbox() -> Vec<RawEmail> {
    vec![
        RawEmail::new(
            "m-hdfc",
            "alerts@hdfcbank.net",
            "You have done a UPI txn",
            "Dear Customer, Rs.549.79 has been debited from account 2448 to VPA zomato.payu@axisbank Zomato Private Limited on 02-08-25.",
        ),
        RawEmail::new(
            "m-sbi",
            "alerts@sbi.co.in",
            "Debit alert",
            "INR 850.00 debited from a/c ****9012 at TATA POWER MUMBAI on 29-07-25.",
        ),
        RawEmail::new(
            "m-news",
            "news@hdfcbank.net",
            "Monthly newsletter",
            "Rs. 500 cashback offer. Amount debited from your account? Unsubscribe anytime.",
        ),
        RawEmail::new(
            "m-shop",
            "orders@shop.example",
            "Your order",
            "Rs. 999 charged to your card",
        ),
        RawEmail::new(
            "m-odd",
            "alerts@icicibank.com",
            "Transaction alert",
            "Your account statement for July is ready.",
        ),
    ]
}

#[test]
fn mixed_inbox_counts_and_reasons() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let categories = CategoryDefinition::defaults();
    let clock = clock();
    let pipeline = Pipeline::new(&registry, &categories, &clock);

    let outcome = pipeline.process_batch(&inbox());

    assert!(outcome.is_consistent());
    assert_eq!(outcome.attempted, 5);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.skipped, 3);
    assert_eq!(outcome.status_message(), "5 found, 2 parsed, 3 skipped");

    let reasons: Vec<(&str, &SkipReason)> = outcome
        .skips
        .iter()
        .map(|s| (s.email_id.as_str(), &s.reason))
        .collect();
    assert!(matches!(reasons[0], ("m-news", SkipReason::FilteredOut(_))));
    assert_eq!(reasons[1], ("m-shop", &SkipReason::UnrecognizedSender));
    assert_eq!(reasons[2], ("m-odd", &SkipReason::NoPatternMatch));
}

#[test]
fn records_are_categorized_in_input_order() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let categories = CategoryDefinition::defaults();
    let clock = clock();
    let outcome = Pipeline::new(&registry, &categories, &clock).process_batch(&inbox());

    let hdfc = &outcome.records[0];
    assert_eq!(hdfc.source_email_id, "m-hdfc");
    assert_eq!(hdfc.category, CategoryName::FoodAndDining);
    assert_eq!(hdfc.amount, Decimal::new(54979, 2));

    let sbi = &outcome.records[1];
    assert_eq!(sbi.merchant, "Tata Power Mumbai");
    assert_eq!(sbi.category, CategoryName::Utilities);
    assert_eq!(sbi.transaction_date, NaiveDate::from_ymd_opt(2025, 7, 29).unwrap());
}

#[test]
fn reprocessing_is_idempotent() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let categories = CategoryDefinition::defaults();
    let clock = clock();
    let pipeline = Pipeline::new(&registry, &categories, &clock);

    let first = pipeline.process_batch(&inbox());
    let second = pipeline.process_batch(&inbox());
    assert_eq!(first.records, second.records);
    assert_eq!(first.skips, second.skips);
}

#[test]
fn empty_batch() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let clock = clock();
    let outcome = Pipeline::new(&registry, &[], &clock).process_batch(&[]);
    assert_eq!(outcome.status_message(), "0 found, 0 parsed, 0 skipped");
    assert!(outcome.records.is_empty());
}

#[test]
fn custom_category_wins_over_defaults() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let mut categories = CategoryDefinition::defaults();
    categories.push(CategoryDefinition::new(99, "Electricity Bill").with_keywords(["tata power"]));
    let clock = clock();
    let outcome = Pipeline::new(&registry, &categories, &clock).process_batch(&inbox());
    assert_eq!(
        outcome.records[1].category,
        CategoryName::Custom("Electricity Bill".to_string())
    );
}

#[test]
fn summary_and_export_over_batch() {
    let registry = InstitutionRegistry::builtin().unwrap();
    let categories = CategoryDefinition::defaults();
    let clock = clock();
    let outcome = Pipeline::new(&registry, &categories, &clock).process_batch(&inbox());

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
    );
    let summary = summarize(&outcome.records, range);
    assert_eq!(summary.transaction_count, 1);
    assert_eq!(summary.categories["Food & Dining"].count, 1);

    let mut buf = Vec::new();
    write_csv(&outcome.records, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), 3);
}
