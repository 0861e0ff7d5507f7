//!
//! Member search repository: dynamic filters, left-join completeness and the
//! two pagination strategies.
//!
mod common;

use common::*;
use shiba::prelude::*;

#[test]
fn empty_condition_returns_every_row() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let rows = repository
        .search(&MemberSearchCondition::new())
        .expect("search should succeed");
    assert_eq!(rows.len(), 4);
    // pinned member_id order
    let usernames: Vec<Option<String>> = rows.iter().map(|r| r.username.clone()).collect();
    assert_eq!(
        usernames,
        vec![
            Some("member1".to_string()),
            Some("member2".to_string()),
            Some("member3".to_string()),
            Some("member4".to_string())
        ]
    );
}

#[test]
fn username_filter_selects_exactly_matching_rows() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let rows = repository
        .search(&MemberSearchCondition::new().username("member2"))
        .expect("search should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("member2"));
    assert_eq!(rows[0].age, 20);
    assert_eq!(rows[0].team_name.as_deref(), Some("teamA"));
}

#[test]
fn team_name_filter_selects_exactly_matching_rows() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let rows = repository
        .search(&MemberSearchCondition::new().team_name("teamB"))
        .expect("search should succeed");
    let usernames: Vec<&str> = rows.iter().filter_map(|r| r.username.as_deref()).collect();
    assert_eq!(usernames, vec!["member3", "member4"]);
}

#[test]
fn age_bounds_are_inclusive() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let rows = repository
        .search(
            &MemberSearchCondition::new()
                .team_name("teamB")
                .age_goe(35)
                .age_loe(40),
        )
        .expect("search should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("member4"));
}

#[test]
fn blank_fields_filter_nothing() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    // blank strings behave like absent fields, never like a failed match
    let rows = repository
        .search(&MemberSearchCondition::new().username("  ").team_name(""))
        .expect("search should succeed");
    assert_eq!(rows.len(), 4);
}

#[test]
fn member_without_team_keeps_its_row() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);
    let _: Option<i64> = seeder
        .save(&Member::new("loner", 50))
        .expect("save memberless row");

    let rows = repository
        .search(&MemberSearchCondition::new())
        .expect("search should succeed");
    assert_eq!(rows.len(), 5);
    let loner = rows.last().expect("last row");
    assert_eq!(loner.username.as_deref(), Some("loner"));
    assert_eq!(loner.team_id, None);
    assert_eq!(loner.team_name, None);
}

#[test]
fn search_page_returns_slice_and_total() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let page = repository
        .search_page(&MemberSearchCondition::new(), 1, 2)
        .expect("page should succeed");
    assert_eq!(page.total, 4);
    assert_eq!(page.offset, 1);
    assert_eq!(page.size, 2);
    let usernames: Vec<&str> = page
        .records
        .iter()
        .filter_map(|r| r.username.as_deref())
        .collect();
    assert_eq!(usernames, vec!["member2", "member3"]);
}

#[test]
fn search_page_counts_unconditionally() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    // the simple strategy counts even when the page proves the total itself
    let page = repository
        .search_page(&MemberSearchCondition::new(), 0, 10)
        .expect("page should succeed");
    assert_eq!(page.total, 4);
    assert_eq!(page.records.len(), 4);
    assert_eq!(spy.count_executions(), 1);
}

#[test]
fn optimized_count_skips_count_on_short_first_page() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    let page = repository
        .search_page_optimized_count(&MemberSearchCondition::new(), 0, 10)
        .expect("page should succeed");
    assert_eq!(page.records.len(), 4);
    assert_eq!(page.total, 4);
    assert_eq!(spy.count_executions(), 0, "short first page must not count");
    assert_eq!(spy.query_executions(), 1);
}

#[test]
fn optimized_count_falls_back_when_page_is_full() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    let page = repository
        .search_page_optimized_count(&MemberSearchCondition::new(), 0, 2)
        .expect("page should succeed");
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.total, 4);
    assert_eq!(spy.count_executions(), 1, "full page cannot prove the total");
}

#[test]
fn optimized_count_falls_back_on_later_pages() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    // a short page at offset > 0 still triggers the count query
    let page = repository
        .search_page_optimized_count(&MemberSearchCondition::new(), 2, 10)
        .expect("page should succeed");
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.total, 4);
    assert_eq!(spy.count_executions(), 1);
}

#[test]
fn filtered_page_keeps_count_and_content_consistent() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let condition = MemberSearchCondition::new().age_goe(20);
    let page = repository
        .search_page_optimized_count(&condition, 0, 2)
        .expect("page should succeed");
    assert_eq!(page.total, 3);
    assert_eq!(page.records.len(), 2);
    assert!(page.has_next());
}

#[test]
fn negative_offset_is_rejected_before_any_query() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    let result = repository.search_page(&MemberSearchCondition::new(), -1, 10);
    assert!(matches!(result, Err(ShibaError::InvalidPageRequest(_))));
    assert_eq!(spy.total_executions(), 0, "no statement may be issued");
}

#[test]
fn non_positive_size_is_rejected() {
    let (_dir, seeder, repository, spy) = setup_repository();
    seed(&seeder);

    let result = repository.search_page(&MemberSearchCondition::new(), 0, 0);
    assert!(matches!(result, Err(ShibaError::InvalidPageRequest(_))));
    let result = repository.search_page_optimized_count(&MemberSearchCondition::new(), 0, -3);
    assert!(matches!(result, Err(ShibaError::InvalidPageRequest(_))));
    assert_eq!(spy.total_executions(), 0);
}

#[test]
fn repeated_identical_queries_are_deterministic() {
    let (_dir, seeder, repository, _spy) = setup_repository();
    seed(&seeder);

    let condition = MemberSearchCondition::new().team_name("teamA");
    let first = repository.search(&condition).expect("first run");
    let second = repository.search(&condition).expect("second run");
    assert_eq!(first, second);
}
