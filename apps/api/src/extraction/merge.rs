//! Merge: folds the meaningful part of a candidate onto the live applicant record.

use std::collections::BTreeMap;

use tracing::warn;

use crate::extraction::record::{ApplicantRecord, CandidateRecord, FieldValue};
use crate::extraction::schema::Field;

/// The subset of a candidate's fields considered meaningfully present.
/// Absent, `""` and `0` are left out.
pub fn overlay(candidate: &CandidateRecord) -> BTreeMap<Field, FieldValue> {
    Field::ALL
        .into_iter()
        .filter_map(|field| {
            candidate
                .get(field)
                .filter(FieldValue::is_meaningful)
                .map(|value| (field, value))
        })
        .collect()
}

/// Returns `current` with the candidate's overlay applied key-wise.
/// Fields outside the overlay keep their current value, so `merge(r, empty) == r`.
pub fn merge(current: &ApplicantRecord, candidate: &CandidateRecord) -> ApplicantRecord {
    let mut merged = current.clone();
    for (field, value) in overlay(candidate) {
        if let Err(e) = merged.set(field, value) {
            warn!("Skipping overlay value for {field}: {e}");
        }
    }
    merged
}
