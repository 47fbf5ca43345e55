// Colored terminal output for cleaning statistics, topic sweeps, and
// classification summaries. main.rs delegates all printing here.

use std::collections::BTreeMap;

use colored::Colorize;

use super::truncate_chars;
use crate::classify::extract::ExtractionStats;
use crate::classify::SentenceClassification;
use crate::normalize::CleaningStats;
use crate::topics::summary::{ClassTopicCount, TopicReport};

/// Display what a cleaning pass removed so it can be audited before analysis.
pub fn display_cleaning_stats(stats: &CleaningStats) {
    println!("\n{}", "=== Cleaning Summary ===".bold());
    println!("  Input records:            {}", stats.input_records);
    println!(
        "  Dropped (no narrative):   {}",
        format_count(stats.dropped_missing)
    );
    println!(
        "  Dropped (empty after):    {}",
        format_count(stats.dropped_empty)
    );
    println!("  Imputed Product / Tags:   {} / {}", stats.imputed_products, stats.imputed_tags);
    println!("  Redactions removed:       {}", stats.redactions_removed);
    println!(
        "  Boilerplate removed:      {} occurrences in {} records ({:.1}% of output)",
        stats.boilerplate_occurrences_removed,
        stats.records_with_boilerplate,
        stats.boilerplate_share() * 100.0
    );
    println!("  Output records:           {}", stats.output_records.to_string().bold());

    if stats.boilerplate.is_empty() {
        println!("\n  {}", "No boilerplate phrases detected.".dimmed());
        return;
    }

    println!(
        "\n{}",
        format!("=== Boilerplate Phrases ({}) ===", stats.boilerplate.len()).bold()
    );
    println!("  {:>6}  {}", "Count".dimmed(), "Phrase".dimmed());
    println!("  {}", "-".repeat(78).dimmed());
    for p in &stats.boilerplate {
        println!("  {:>6}  {}", p.frequency, truncate_chars(&p.phrase, 70));
    }
}

/// Display the headline numbers of one topic sweep run.
pub fn display_topic_report(report: &TopicReport) {
    println!("\n{}", "=".repeat(42));
    println!(
        "{}",
        format!("RUNNING ANALYSIS: min_topic_size = {}", report.min_topic_size).bold()
    );
    println!("{}", "=".repeat(42));

    println!("1. Total Topics Found:   {}", report.topic_count);
    let outliers = format!(
        "{} ({:.2}% of data)",
        report.outlier_count, report.outlier_percent
    );
    let outliers = if report.outlier_percent >= 50.0 {
        outliers.yellow()
    } else {
        outliers.normal()
    };
    println!("2. Outlier Documents:    {outliers}");

    println!("\n3. Top {} Topics:", report.top_topics.len());
    for topic in &report.top_topics {
        println!(
            "   Topic {}: {} {}",
            topic.id,
            topic.name.bold(),
            format!("({} docs)", topic.count).dimmed()
        );
    }
}

/// Display per-class topic counts as a compact table.
pub fn display_class_topics(title: &str, rows: &[ClassTopicCount]) {
    println!("\n  {}", title.bold());
    if rows.is_empty() {
        println!("    {}", "(no documents in the top topics)".dimmed());
        return;
    }
    for row in rows {
        println!(
            "    {:<40} {:<36} {:>5}",
            truncate_chars(&row.class, 37),
            truncate_chars(&row.topic_name, 33),
            row.count
        );
    }
}

/// Display how extracted sentences spread over anchor categories.
pub fn display_extraction_summary(rows: &[SentenceClassification], stats: &ExtractionStats) {
    println!(
        "\n{}",
        format!("=== Extraction Complete ({} sentences) ===", rows.len()).bold()
    );
    println!(
        "  Records: {}  |  Sentences: {}  |  Skipped (too short): {}  |  No text: {}",
        stats.records_seen,
        stats.sentences_seen,
        stats.sentences_too_short,
        stats.records_without_sentences
    );

    if rows.is_empty() {
        return;
    }

    let mut by_category: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for row in rows {
        if let Some(top) = row.top() {
            let entry = by_category.entry(top.category.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += row.margin(1).unwrap_or(0.0);
        }
    }

    let mut ordered: Vec<_> = by_category.into_iter().collect();
    ordered.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

    println!(
        "\n  {:<50} {:>7}  {:>11}",
        "Top category".dimmed(),
        "Rows".dimmed(),
        "Mean margin".dimmed()
    );
    println!("  {}", "-".repeat(72).dimmed());
    for (category, (count, margin_sum)) in ordered {
        println!(
            "  {:<50} {:>7}  {:>11.4}",
            truncate_chars(category, 47),
            count,
            margin_sum / count as f64
        );
    }
}

fn format_count(n: usize) -> String {
    if n > 0 {
        n.to_string().yellow().to_string()
    } else {
        n.to_string()
    }
}
