use crate::record::{DecodedRecord, WireRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Matrix keys: base name, decimal row index, comma, decimal column index.
/// Only certain `filelog` output uses these.
static MATRIX_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?)(\d+),(\d+)$").unwrap());

/// The one field the engine is known to emit with index 0 missing: a file
/// deleted at the head revision gets no `fileSize0` in `filelog` output.
const SIZE_FIELD: &str = "fileSize";

pub(crate) fn decode(wire: &WireRecord) -> DecodedRecord {
    // Working copy: the fileSize special case synthesizes a key mid-decode.
    let mut work: WireRecord = wire.clone();
    let keys: Vec<String> = work.keys().cloned().collect();

    let mut record = DecodedRecord::default();

    for key in keys {
        if let Some(caps) = MATRIX_KEY.captures(&key) {
            let base = caps.get(1).unwrap().as_str().to_string();
            if !record.matrix_fields.contains_key(&base) {
                let rows = collect_matrix(&base, &work);
                record.matrix_fields.insert(base, rows);
            }
            continue;
        }

        let base = strip_index_suffix(&key);
        if base.len() == key.len() {
            // No trailing digits: plain scalar.
            record.fields.insert(key.clone(), work[&key].clone());
            continue;
        }
        if record.array_fields.contains_key(base) {
            // Family already materialized from a sibling key.
            continue;
        }

        if confirm_family(base, &mut work) {
            let values = collect_family(base, &work);
            record.array_fields.insert(base.to_string(), values);
        } else {
            // A scalar whose name happens to end in digits, e.g. "rev2"
            // with no "rev20". Presence of index 0 is the only
            // disambiguator the protocol offers; a server that returns
            // both "rev2" and a "rev2..." family is ambiguous and not
            // defended against.
            record.fields.insert(key.clone(), work[&key].clone());
        }
    }

    record
}

/// Strip the maximal trailing run of decimal digits. Anchored at the end of
/// the key, so `"foobar0"` never probes as base `"foo"`.
fn strip_index_suffix(key: &str) -> &str {
    key.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Test whether `base` names a real indexed family: index 0 must exist.
///
/// The `fileSize` family is exempt: reaching here with a stripped base of
/// `fileSize` means some `fileSizeN` exists, so an empty index 0 is
/// synthesized to restore positional alignment with the sibling revision
/// arrays that were not equally truncated.
fn confirm_family(base: &str, work: &mut WireRecord) -> bool {
    let probe = format!("{}0", base);
    if work.contains_key(&probe) {
        return true;
    }
    if base == SIZE_FIELD {
        work.insert(probe, String::new());
        return true;
    }
    false
}

/// Materialize one array family by probing indices 0, 1, 2, ...
///
/// A single missing index with its successor present becomes an
/// empty-string placeholder (one-step lookahead); two consecutive missing
/// indices end the family.
fn collect_family(base: &str, work: &WireRecord) -> Vec<String> {
    let mut values = Vec::new();
    let mut i = 0usize;
    loop {
        let key = format!("{}{}", base, i);
        match work.get(&key) {
            Some(value) => values.push(value.clone()),
            None => {
                let next = format!("{}{}", base, i + 1);
                if work.contains_key(&next) {
                    values.push(String::new());
                } else {
                    break;
                }
            }
        }
        i += 1;
    }
    values
}

/// Materialize one matrix family. The outer loop is explicitly bounded:
/// the first row index with no elements at all ends the matrix. Inner
/// indices end at the first absent sub-index, with no lookahead.
fn collect_matrix(base: &str, work: &WireRecord) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut i = 0usize;
    loop {
        let mut row = Vec::new();
        let mut j = 0usize;
        loop {
            let key = format!("{}{},{}", base, i, j);
            match work.get(&key) {
                Some(value) => row.push(value.clone()),
                None => break,
            }
            j += 1;
        }
        if row.is_empty() {
            break;
        }
        rows.push(row);
        i += 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(pairs: &[(&str, &str)]) -> WireRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn strips_only_trailing_digits() {
        assert_eq!(strip_index_suffix("Files0"), "Files");
        assert_eq!(strip_index_suffix("rev23"), "rev");
        assert_eq!(strip_index_suffix("change"), "change");
        assert_eq!(strip_index_suffix("a1b2"), "a1b");
        assert_eq!(strip_index_suffix("123"), "");
    }

    #[test]
    fn scalar_key_is_not_a_family_without_index_zero() {
        let mut work = wire(&[("rev2", "9")]);
        assert!(!confirm_family("rev", &mut work));
    }

    #[test]
    fn file_size_family_synthesizes_index_zero() {
        let mut work = wire(&[("fileSize1", "100")]);
        assert!(confirm_family("fileSize", &mut work));
        assert_eq!(work.get("fileSize0").map(String::as_str), Some(""));
    }

    #[test]
    fn single_gap_is_bridged_with_a_placeholder() {
        let work = wire(&[("x0", "a"), ("x2", "b")]);
        assert_eq!(collect_family("x", &work), vec!["a", "", "b"]);
    }

    #[test]
    fn two_step_gap_ends_the_family() {
        let work = wire(&[("x0", "a"), ("x3", "b")]);
        assert_eq!(collect_family("x", &work), vec!["a"]);
    }

    #[test]
    fn matrix_outer_loop_is_bounded() {
        // Row 2 has no elements at all: the matrix ends there even though
        // a stray higher row exists.
        let work = wire(&[
            ("how0,0", "merge from"),
            ("how0,1", "copy from"),
            ("how1,0", "edit into"),
            ("how3,0", "ignored"),
        ]);
        let rows = collect_matrix("how", &work);
        assert_eq!(
            rows,
            vec![
                vec!["merge from".to_string(), "copy from".to_string()],
                vec!["edit into".to_string()],
            ]
        );
    }
}
