//! Outlier splitting over real-world shaped tag sets

mod helper;

use rstest::rstest;

use helper::parse_tags;
use tag_curator::version::outlier::{OutlierSplit, split_outliers};
use tag_curator::version::semver::TagVersion;

fn originals(versions: &[TagVersion]) -> Vec<&str> {
    versions.iter().map(|v| v.original()).collect()
}

/// Checks that hold for every split regardless of input
fn assert_split_invariants(input: &[TagVersion], split: &OutlierSplit<TagVersion>) {
    let mut expected = input.to_vec();
    expected.sort();
    let mut combined = split.remaining.clone();
    combined.extend(split.outliers.iter().cloned());
    assert_eq!(combined, expected, "partitions must cover the input in ascending order");

    assert!(split.remaining.is_sorted());
    assert!(split.outliers.is_sorted());

    let resplit = split_outliers(split.remaining.clone()).unwrap();
    assert!(resplit.outliers.is_empty(), "remaining must not contain outliers");
    assert_eq!(resplit.remaining, split.remaining);
}

#[rstest]
#[case::elasticsearch(
    &["0.0.1", "0.0.2", "0.8-alpha4", "1.0.0", "1.0.1", "43.0.0"],
    &["0.0.1", "0.0.2", "0.8-alpha4", "1.0.0", "1.0.1"],
    &["43.0.0"]
)]
#[case::no_outliers(
    &["0.0.1", "1.0.0", "2.0.0", "4.0.1"],
    &["0.0.1", "1.0.0", "2.0.0", "4.0.1"],
    &[]
)]
#[case::just_barely_an_outlier(
    &["0.0.1", "1.0.0", "2.0.0", "3.0.1", "5.0.0-beta", "8.0.0"],
    &["0.0.1", "1.0.0", "2.0.0", "3.0.1", "5.0.0-beta"],
    &["8.0.0"]
)]
#[case::multiple_spread_outliers(
    &["0.0.1", "1.0.0", "2.0.0", "4.0.1", "7.0.0", "11.0.0"],
    &["0.0.1", "1.0.0", "2.0.0", "4.0.1"],
    &["7.0.0", "11.0.0"]
)]
#[case::multiple_ranges(
    &["0.0.1", "1.0.0", "2.0.0", "7.0.1", "7.0.2", "7.0.3", "11.0.0", "12.0-beta"],
    &["0.0.1", "1.0.0", "2.0.0"],
    &["7.0.1", "7.0.2", "7.0.3", "11.0.0", "12.0-beta"]
)]
fn split_outliers_matches_observed_tag_sets(
    #[case] tags: &[&str],
    #[case] remaining: &[&str],
    #[case] outliers: &[&str],
) {
    let input = parse_tags(tags);

    let split = split_outliers(input.clone()).unwrap();

    assert_eq!(originals(&split.remaining), remaining);
    assert_eq!(originals(&split.outliers), outliers);
    assert_split_invariants(&input, &split);
}

#[test]
fn input_order_does_not_matter() {
    let ascending = parse_tags(&["0.0.1", "1.0.0", "2.0.0", "7.0.1", "7.0.2", "11.0.0"]);
    let mut shuffled = ascending.clone();
    shuffled.reverse();
    shuffled.swap(1, 4);

    assert_eq!(
        split_outliers(shuffled).unwrap(),
        split_outliers(ascending).unwrap()
    );
}

#[test]
fn same_major_never_produces_outliers() {
    let input = parse_tags(&["3.9.0", "3.0.0", "3.0.0-rc1", "3.100.7", "v3.2"]);

    let split = split_outliers(input.clone()).unwrap();

    assert_eq!(
        originals(&split.remaining),
        vec!["3.0.0-rc1", "3.0.0", "v3.2", "3.9.0", "3.100.7"]
    );
    assert!(split.outliers.is_empty());
    assert_split_invariants(&input, &split);
}

#[test]
fn duplicates_are_preserved_in_their_partition() {
    let input = parse_tags(&["1.0.0", "9.0.0", "1.0.0", "9.0.0", "2.0.0"]);

    let split = split_outliers(input.clone()).unwrap();

    assert_eq!(originals(&split.remaining), vec!["1.0.0", "1.0.0", "2.0.0"]);
    assert_eq!(originals(&split.outliers), vec!["9.0.0", "9.0.0"]);
    assert_split_invariants(&input, &split);
}

#[test]
fn minor_and_patch_distance_never_counts_toward_the_gap() {
    let input = parse_tags(&["1.0.0", "1.999.999", "3.0.0"]);

    let split = split_outliers(input).unwrap();

    assert_eq!(originals(&split.remaining), vec!["1.0.0", "1.999.999", "3.0.0"]);
    assert!(split.outliers.is_empty());
}

#[test]
fn prerelease_of_a_far_major_is_an_outlier() {
    let input = parse_tags(&["1.0.0", "2.1.0", "5.0.0-alpha.1"]);

    let split = split_outliers(input).unwrap();

    assert_eq!(originals(&split.outliers), vec!["5.0.0-alpha.1"]);
    assert_eq!(split.latest_remaining().map(|v| v.original()), Some("2.1.0"));
}
