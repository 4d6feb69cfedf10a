//! Display ordering for search results

use std::cmp::Ordering;

use deunicode::deunicode;

use super::record::ResultRecord;

/// Natural, case-insensitive order on names, with diacritics folded away
/// (`"Émile" < "Eva"`, `"Track 2" < "Track 10"`).
///
/// Names that only differ in case or accents fall back to plain byte order, so two
/// records compare equal only when their names are identical.
pub fn compare(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    compare_folded(&deunicode(&a.name), &deunicode(&b.name)).then_with(|| a.name.cmp(&b.name))
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b)
}

/// Stable sort by [`compare`]. Each name is folded once.
pub fn sort(records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let mut keyed: Vec<(String, ResultRecord)> = records
        .into_iter()
        .map(|record| (deunicode(&record.name), record))
        .collect();
    keyed.sort_by(|(a_key, a), (b_key, b)| {
        compare_folded(a_key, b_key).then_with(|| a.name.cmp(&b.name))
    });
    keyed.into_iter().map(|(_, record)| record).collect()
}
