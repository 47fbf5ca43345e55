// Unit tests for the cleaning pass.
//
// Covers null filtering, redaction removal, boilerplate detection and
// removal on a synthetic corpus, idempotence, and configuration errors.

use grievance::corpus::{Corpus, Record};
use grievance::normalize::{NormalizeError, Normalizer, NormalizerConfig};

const FIELD: &str = "Consumer complaint narrative";
const PHRASE: &str = "you are in violation of the law pursuant to section";

fn normalizer() -> Normalizer {
    Normalizer::new(NormalizerConfig::default()).unwrap()
}

fn record(id: usize, text: &str) -> Record {
    Record::new(id.to_string()).with_field(FIELD, text)
}

/// 60 complaints that each carry the same legal template between unique words.
fn templated_corpus() -> Corpus {
    (0..60)
        .map(|i| {
            record(
                i,
                &format!(
                    "Case{i}: late fee{i}! You are in violation of the law, pursuant to Section ref{i}."
                ),
            )
        })
        .collect()
}

// ============================================================
// Null filtering
// ============================================================

#[test]
fn blank_and_missing_narratives_are_dropped_and_counted() {
    let corpus = Corpus::new(vec![
        record(1, "They charged me twice."),
        record(2, ""),
        record(3, "   \t\n "),
        Record::new("4").with_null_field(FIELD),
        Record::new("5"),
        record(6, "Nobody called me back."),
    ]);

    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    assert_eq!(stats.input_records, 6);
    assert_eq!(stats.dropped_missing, 4);
    assert_eq!(stats.dropped_empty, 0);
    assert_eq!(stats.output_records, 2);
    let ids: Vec<&str> = cleaned.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "6"]);
}

#[test]
fn missing_field_on_every_record_is_a_configuration_error() {
    let corpus = Corpus::new(vec![
        Record::new("1").with_field("Issue", "Billing"),
        Record::new("2").with_field("Issue", "Fees"),
    ]);

    match normalizer().clean(corpus, FIELD) {
        Err(NormalizeError::MissingField(field)) => assert_eq!(field, FIELD),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn field_present_but_null_everywhere_is_not_a_configuration_error() {
    let corpus = Corpus::new(vec![Record::new("1").with_null_field(FIELD)]);
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();
    assert!(cleaned.is_empty());
    assert_eq!(stats.dropped_missing, 1);
}

// ============================================================
// Text normalization and redaction
// ============================================================

#[test]
fn redaction_runs_are_removed_and_counted() {
    let corpus = Corpus::new(vec![record(1, "call xxx about xxxx charge")]);
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    assert_eq!(cleaned.records()[0].field(FIELD), Some("call about charge"));
    assert_eq!(stats.redactions_removed, 2);
}

#[test]
fn uppercase_redaction_marks_are_caught_after_lowercasing() {
    let corpus = Corpus::new(vec![record(1, "On XX/XX/2023 my card ending XXXX was charged.")]);
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    assert_eq!(
        cleaned.records()[0].field(FIELD),
        Some("on 2023 my card ending was charged")
    );
    assert_eq!(stats.redactions_removed, 2);
}

#[test]
fn single_marker_letters_survive() {
    let corpus = Corpus::new(vec![record(1, "The tax box was fixed by Rex.")]);
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();
    assert_eq!(
        cleaned.records()[0].field(FIELD),
        Some("the tax box was fixed by rex")
    );
    assert_eq!(stats.redactions_removed, 0);
}

#[test]
fn text_reduced_to_three_chars_or_fewer_is_dropped() {
    let corpus = Corpus::new(vec![
        record(1, "XXXX XXXX ok!"),
        record(2, "XXXX fine"),
    ]);
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    // "ok" has 2 chars, "fine" has 4
    assert_eq!(stats.dropped_empty, 1);
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned.records()[0].field(FIELD), Some("fine"));
}

// ============================================================
// Boilerplate
// ============================================================

#[test]
fn repeated_template_is_detected_exactly_once() {
    let (_, stats) = normalizer().clean(templated_corpus(), FIELD).unwrap();

    assert_eq!(stats.boilerplate.len(), 1);
    assert_eq!(stats.boilerplate[0].phrase, PHRASE);
    assert_eq!(stats.boilerplate[0].frequency, 60);
}

#[test]
fn repeated_template_is_removed_and_nothing_else_changes() {
    let (cleaned, stats) = normalizer().clean(templated_corpus(), FIELD).unwrap();

    assert_eq!(stats.boilerplate_occurrences_removed, 60);
    assert_eq!(stats.records_with_boilerplate, 60);
    assert_eq!(cleaned.len(), 60);

    for (i, r) in cleaned.iter().enumerate() {
        assert_eq!(
            r.field(FIELD),
            Some(format!("case{i} late fee{i} ref{i}").as_str()),
            "record {i} altered beyond the template"
        );
    }
}

#[test]
fn template_longer_than_window_is_removed_whole() {
    // 14 words with the default 10-word window: 5 overlapping phrases
    let template = "this notice sent pursuant to section six one one of the fair credit act";
    let corpus: Corpus = (0..60)
        .map(|i| record(i, &format!("start{i} {template} end{i}")))
        .collect();
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    assert_eq!(stats.boilerplate.len(), 5);
    assert!(stats.boilerplate.iter().all(|p| p.frequency == 60));
    assert_eq!(stats.boilerplate_occurrences_removed, 5 * 60);
    assert_eq!(stats.records_with_boilerplate, 60);

    for (i, r) in cleaned.iter().enumerate() {
        assert_eq!(r.field(FIELD), Some(format!("start{i} end{i}").as_str()));
    }
}

#[test]
fn template_below_threshold_is_kept() {
    let corpus: Corpus = templated_corpus().into_records().into_iter().take(49).collect();
    let (cleaned, stats) = normalizer().clean(corpus, FIELD).unwrap();

    assert!(stats.boilerplate.is_empty());
    assert!(cleaned.records()[0].field(FIELD).unwrap().contains(PHRASE));
}

#[test]
fn ngram_size_and_threshold_are_tunable() {
    let config = NormalizerConfig {
        ngram_size: 3,
        boilerplate_threshold: 2,
        ..Default::default()
    };
    let corpus = Corpus::new(vec![
        record(1, "alpha per our policy beta"),
        record(2, "gamma per our policy delta"),
    ]);
    let (cleaned, stats) = Normalizer::new(config).unwrap().clean(corpus, FIELD).unwrap();

    assert_eq!(stats.boilerplate.len(), 1);
    assert_eq!(stats.boilerplate[0].phrase, "per our policy");
    assert_eq!(cleaned.records()[0].field(FIELD), Some("alpha beta"));
    assert_eq!(cleaned.records()[1].field(FIELD), Some("gamma delta"));
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn cleaning_twice_changes_nothing_the_second_time() {
    let n = normalizer();
    let (once, _) = n.clean(templated_corpus(), FIELD).unwrap();
    let (twice, stats) = n.clean(once.clone(), FIELD).unwrap();

    assert_eq!(once, twice);
    assert_eq!(stats.total_dropped(), 0);
    assert_eq!(stats.redactions_removed, 0);
    assert!(stats.boilerplate.is_empty());
    assert_eq!(stats.boilerplate_occurrences_removed, 0);
    assert_eq!(stats.imputed_products, 0);
    assert_eq!(stats.imputed_tags, 0);
}

#[test]
fn already_clean_text_passes_through_unchanged() {
    let corpus = Corpus::new(vec![
        record(1, "my card was charged twice")
            .with_product("Credit card")
            .with_tags("Standard"),
        record(2, "nobody would explain the denial")
            .with_product("Mortgage")
            .with_tags("Older American"),
    ]);
    let (cleaned, stats) = normalizer().clean(corpus.clone(), FIELD).unwrap();

    assert_eq!(cleaned, corpus);
    assert_eq!(stats.total_dropped(), 0);
    assert_eq!(stats.redactions_removed, 0);
}
