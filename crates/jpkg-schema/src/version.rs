//! Version ordering
//!
//! [`Version`] carries no intrinsic order. Code that needs to know whether an
//! update is available asks a [`VersionOrder`], so callers can plug in the
//! scheme their packages actually use.

use std::cmp::Ordering;

use crate::types::Version;

/// A total order over version tokens.
pub trait VersionOrder: Send + Sync {
    /// Compare two versions.
    fn compare(&self, a: &Version, b: &Version) -> Ordering;

    /// Returns true if `candidate` is strictly newer than `current`.
    fn is_newer(&self, candidate: &Version, current: &Version) -> bool {
        self.compare(candidate, current) == Ordering::Greater
    }
}

impl<T: VersionOrder + ?Sized> VersionOrder for &T {
    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Semantic version ordering with a segment-wise fallback.
///
/// When both sides parse as semver the semver precedence rules apply. A
/// leading `v` is ignored and a release with fewer than three components is
/// padded with zeros first, so `1.0` reads as `1.0.0` and `1.0-rc.1` as
/// `1.0.0-rc.1`.
///
/// Otherwise the strings are split on `.` and `-` and compared segment by
/// segment: numeric segments numerically, anything else lexically, with an
/// alphanumeric segment ranking below a numeric one. Missing trailing
/// segments count as `0`, so `1.2` and `1.2.0.0` compare equal and
/// `1.2.0.rc1` precedes `1.2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverOrder;

impl VersionOrder for SemverOrder {
    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        match (parse_semver(a.as_str()), parse_semver(b.as_str())) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => compare_segments(a.as_str(), b.as_str()),
        }
    }
}

fn parse_semver(v: &str) -> Option<semver::Version> {
    let v = v.trim_start_matches('v');
    if let Ok(parsed) = semver::Version::parse(v) {
        return Some(parsed);
    }

    let (release, rest) = v.split_at(v.find(['-', '+']).unwrap_or(v.len()));
    let components = release.split('.').count();
    if release.is_empty() || components >= 3 {
        return None;
    }

    let mut padded = release.to_string();
    for _ in components..3 {
        padded.push_str(".0");
    }
    padded.push_str(rest);
    semver::Version::parse(&padded).ok()
}

// Variant order is the ranking: text sorts below any number.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Text(&'a str),
    Numeric(u64),
}

fn segments(v: &str) -> Vec<Segment<'_>> {
    v.trim_start_matches('v')
        .split(['.', '-'])
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map_or(Segment::Text(s), Segment::Numeric))
        .collect()
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    let a_parts = segments(a);
    let b_parts = segments(b);
    let zero = Segment::Numeric(0);

    for i in 0..a_parts.len().max(b_parts.len()) {
        let av = a_parts.get(i).unwrap_or(&zero);
        let bv = b_parts.get(i).unwrap_or(&zero);
        match av.cmp(bv) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}
