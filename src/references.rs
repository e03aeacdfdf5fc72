//! Issue references cited in release notes and version-string helpers.
//!
//! Release notes cite the issues they resolve in parenthesized groups such
//! as `(#123)` or `(#123, #456)`. Fragments that don't form a complete group
//! are ignored rather than rejected.
use regex::Regex;
use std::{collections::BTreeSet, sync::LazyLock};

static REFERENCE_GROUP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*#[0-9]+(?:,\s*#[0-9]+)*\s*\)").unwrap()
});

static ISSUE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?<number>[0-9]+)").unwrap());

/// Extract the distinct issue numbers cited in a block of release notes.
pub fn issue_numbers(body: &str) -> BTreeSet<u64> {
    let mut numbers = BTreeSet::new();

    for group in REFERENCE_GROUP_REGEX.find_iter(body) {
        for caps in ISSUE_NUMBER_REGEX.captures_iter(group.as_str()) {
            // digits that overflow u64 can't name a real issue
            if let Ok(number) = caps["number"].parse::<u64>() {
                numbers.insert(number);
            }
        }
    }

    numbers
}

/// Union of the issue numbers cited by every body.
pub fn issue_numbers_in<'a, I>(bodies: I) -> BTreeSet<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    bodies.into_iter().flat_map(issue_numbers).collect()
}

/// A version is a pre-release when it carries a hyphenated suffix.
pub fn is_pre_release(version: &str) -> bool {
    version.contains('-')
}

/// The portion of a version preceding its first hyphen.
pub fn base_name(version: &str) -> &str {
    version.split('-').next().unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_reference() {
        assert_eq!(
            issue_numbers("* Fix a bug (#12345)"),
            BTreeSet::from([12345])
        );
    }

    #[test]
    fn extracts_comma_separated_references() {
        assert_eq!(issue_numbers("(#1, #2)"), BTreeSet::from([1, 2]));
    }

    #[test]
    fn returns_empty_set_without_references() {
        assert!(issue_numbers("no refs here").is_empty());
        assert!(issue_numbers("").is_empty());
    }

    #[test]
    fn extracts_every_group_in_body() {
        let body =
            "### New\n* One (#1)\n\n### Fixed\n* Two and three (#2, #3)\n";
        assert_eq!(issue_numbers(body), BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn tolerates_whitespace_inside_group() {
        assert_eq!(issue_numbers("( #7,  #8 )"), BTreeSet::from([7, 8]));
        assert_eq!(issue_numbers("(#7,\n#8)"), BTreeSet::from([7, 8]));
    }

    #[test]
    fn deduplicates_and_ignores_citation_order() {
        let forward = issue_numbers("(#3) (#1, #2) (#3)");
        let backward = issue_numbers("(#2, #1) (#3)");
        assert_eq!(forward, backward);
        assert_eq!(forward, issue_numbers("(#3) (#1, #2) (#3)"));
    }

    #[test]
    fn ignores_malformed_fragments() {
        assert!(issue_numbers("(#12").is_empty());
        assert!(issue_numbers("#12)").is_empty());
        assert!(issue_numbers("(#abc)").is_empty());
        assert!(issue_numbers("(#1, two)").is_empty());
        assert!(issue_numbers("see issue #42 for details").is_empty());
        assert_eq!(issue_numbers("(#1, two) (#5)"), BTreeSet::from([5]));
    }

    #[test]
    fn collects_references_across_bodies() {
        let bodies = ["(#1, #2)", "nothing", "(#2) (#9)"];
        assert_eq!(issue_numbers_in(bodies), BTreeSet::from([1, 2, 9]));
    }

    #[test]
    fn detects_pre_releases() {
        assert!(!is_pre_release("1.2.0"));
        assert!(is_pre_release("1.2.0-beta1"));
    }

    #[test]
    fn computes_base_name() {
        assert_eq!(base_name("2.1.0-beta1"), "2.1.0");
        assert_eq!(base_name("2.1.0-beta-2"), "2.1.0");
        assert_eq!(base_name("2.1.0"), "2.1.0");
    }
}
