//! Console output utilities
//!
//! Plain-text renderings of dataset summaries for the command line.

use crate::models::Dataset;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Print row counts and cleaning statistics
pub fn print_dataset_summary(dataset: &Dataset) {
    let stats = dataset.stats();
    match dataset.year() {
        Some(year) => println!("Deaths in {year}: {}", dataset.len()),
        None => println!("Deaths: {}", dataset.len()),
    }
    println!("  women: {}", dataset.women().len());
    println!("  men:   {}", dataset.men().len());
    println!(
        "Files read: {} (skipped {}), rows read: {}, rows dropped: {}",
        stats.files_read,
        stats.files_skipped,
        stats.rows_read,
        stats.rows_dropped()
    );
    if stats.rows_dropped() > 0 {
        println!(
            "  duplicates: {}, invalid dates: {}, invalid sex: {}, \
             negative ages: {}, other years: {}",
            stats.duplicates_removed,
            stats.invalid_dates,
            stats.invalid_sex,
            stats.negative_ages,
            stats.outside_year
        );
    }
}

/// Print the monthly counts as a table
pub fn print_monthly_counts(dataset: &Dataset) {
    let counts = dataset.monthly_counts_by_sex();
    println!("{:<5} {:>10} {:>10} {:>10}", "Month", "Total", "Women", "Men");
    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        println!(
            "{:<5} {:>10} {:>10} {:>10}",
            name, counts.total[idx], counts.women[idx], counts.men[idx]
        );
    }
}

/// Print deaths per age bucket
pub fn print_age_buckets(dataset: &Dataset) {
    println!("Deaths by age group:");
    for (bucket, count) in dataset.age_bucket_counts() {
        println!("  {:<7} {count}", bucket.label());
    }
}

/// Print the most frequent countries of birth
pub fn print_top_countries(dataset: &Dataset, n: usize) {
    let top = dataset.top_birth_countries(n);
    if top.is_empty() {
        println!("No country of birth recorded");
        return;
    }
    println!("Top {} countries of birth:", top.len());
    for (rank, (country, count)) in top.iter().enumerate() {
        println!("  {:>2}. {country:<30} {count}", rank + 1);
    }
}
