//! Multi-pass cleaner turning assembled records into normalized ones.

pub mod metrics;
pub mod passes;
pub mod year;

use crate::record::LanguageRecord;
use crate::vocab::NormalizeRules;
use metrics::PassTracker;
use passes::*;

type PassFn = fn(&mut LanguageRecord, &NormalizeRules);

/// Pass order is significant: year promotion must see categories before
/// reclassification filters them.
pub const PASSES: [(&str, PassFn); 7] = [
    ("pass1_recover_name", pass_recover_name),
    ("pass2_scrub_null_indicators", pass_scrub_null_indicators),
    ("pass3_canonicalize_year", pass_canonicalize_year),
    ("pass4_promote_category_year", pass_promote_category_year),
    ("pass5_reclassify_categories", pass_reclassify_categories),
    ("pass6_dedup_categories", pass_dedup_categories),
    ("pass7_canonicalize_vocabulary", pass_canonicalize_vocabulary),
];

/// Run every pass over one record.
pub fn normalize_record(mut record: LanguageRecord, rules: &NormalizeRules) -> LanguageRecord {
    for (_, pass) in PASSES {
        pass(&mut record, rules);
    }
    record.compact();
    record
}

/// Normalize a whole batch. Records are never dropped and keep their order.
pub fn normalize_batch(
    records: Vec<LanguageRecord>,
    rules: &NormalizeRules,
    tracker: &mut PassTracker,
) -> Vec<LanguageRecord> {
    let mut records = records;
    for (name, pass) in PASSES {
        for record in records.iter_mut() {
            let before = record.clone();
            pass(record, rules);
            tracker.record(name, *record != before);
        }
    }
    for record in records.iter_mut() {
        record.compact();
    }
    records
}
