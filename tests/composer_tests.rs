use fleet_maintenance::logic::{
    initial_intervals, normalize_ladder, parse_interval_ladder, toggle_interval,
};

#[test]
fn toggling_absent_interval_inserts_in_ascending_order() {
    assert_eq!(toggle_interval(&[50, 250], 100), vec![50, 100, 250]);
    assert_eq!(toggle_interval(&[], 500), vec![500]);
}

#[test]
fn toggling_present_interval_removes_it() {
    assert_eq!(toggle_interval(&[50, 100, 250], 100), vec![50, 250]);
}

#[test]
fn toggling_last_interval_leaves_empty_set_for_deletion() {
    // An empty result signals the caller to delete the assignment row;
    // no assignment may persist with zero intervals.
    assert!(toggle_interval(&[250], 250).is_empty());
}

#[test]
fn toggle_twice_restores_the_original_set() {
    let once = toggle_interval(&[50, 100, 250, 500], 100);
    let twice = toggle_interval(&once, 100);
    assert_eq!(twice, vec![50, 100, 250, 500]);
}

#[test]
fn auto_apply_task_receives_entire_ladder() {
    let ladder = vec![50, 100, 250, 500];
    assert_eq!(initial_intervals(true, &ladder), vec![50, 100, 250, 500]);
}

#[test]
fn manual_task_starts_with_no_intervals() {
    assert!(initial_intervals(false, &[50, 100, 250, 500]).is_empty());
}

#[test]
fn ladder_text_is_parsed_sorted_and_deduplicated() {
    assert_eq!(parse_interval_ladder("50, 100, 250"), vec![50, 100, 250]);
    assert_eq!(parse_interval_ladder("250, 50, 50, 100"), vec![50, 100, 250]);
}

#[test]
fn ladder_text_drops_malformed_and_non_positive_entries() {
    assert_eq!(parse_interval_ladder("50, abc, -10, 0, 250"), vec![50, 250]);
    assert!(parse_interval_ladder("").is_empty());
    assert!(parse_interval_ladder("nonsense").is_empty());
}

#[test]
fn normalize_sorts_and_deduplicates() {
    assert_eq!(normalize_ladder(vec![500, 50, 250, 50, 100]), vec![50, 100, 250, 500]);
    assert!(normalize_ladder(Vec::new()).is_empty());
}
