use std::cmp::Ordering;

/// Segment value meaning "any" in a requested range
pub fn is_wildcard(segment: &str) -> bool {
    segment == "x" || segment == "*"
}

/// Leading-digit integer value of a segment, if it has one
fn numeric_value(segment: &str) -> Option<u64> {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    segment[..end].parse().ok()
}

/// Compare two version segments
///
/// A missing segment counts as `"0"`. Segments compare as integers when both
/// have a numeric value, otherwise as raw strings.
pub fn compare(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.filter(|s| !s.is_empty()).unwrap_or("0");
    let b = b.filter(|s| !s.is_empty()).unwrap_or("0");

    match (numeric_value(a), numeric_value(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Check whether `candidate` satisfies the `requested` range
///
/// The major segment must be equal. A wildcard minor accepts anything;
/// otherwise minor must be equal, and the same rule applies to patch.
pub fn is_ok(requested: &str, candidate: &str) -> bool {
    let requested: Vec<&str> = requested.split('.').collect();
    let candidate: Vec<&str> = candidate.split('.').collect();

    for position in 0..3 {
        let wanted = requested.get(position).copied();
        if position > 0 && wanted.is_some_and(is_wildcard) {
            return true;
        }
        if compare(wanted, candidate.get(position).copied()) != Ordering::Equal {
            return false;
        }
    }
    true
}

/// Check whether version `a` is strictly greater than `b`
pub fn is_gt(a: &str, b: &str) -> bool {
    let a: Vec<&str> = a.split('.').collect();
    let b: Vec<&str> = b.split('.').collect();

    (0..3)
        .map(|position| compare(a.get(position).copied(), b.get(position).copied()))
        .find(|ordering| *ordering != Ordering::Equal)
        == Some(Ordering::Greater)
}
