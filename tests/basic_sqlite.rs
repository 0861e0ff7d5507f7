//!
//! Query surface tests against a seeded SQLite database.
//!
mod common;

use common::*;
use shiba::prelude::*;

#[test]
fn test_connection_creation() {
    let (_dir, shiba) = setup();
    let result = shiba.exec_first::<i64, _, _>("SELECT 1", ());
    assert!(result.is_ok(), "the database connection should be usable");
}

#[test]
fn test_hello_roundtrip() {
    let (_dir, shiba) = setup();
    let id: Option<i64> = shiba.save(&Hello::default()).expect("save hello");
    assert_eq!(id, Some(1));
    let rows: Vec<Hello> = shiba.list(Wrapper::new()).expect("list hello");
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_select_by_id() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let id: Option<i64> = shiba
        .save(&Member::new("member5", 50))
        .expect("save member");
    let found: Option<Member> = shiba
        .select_by_id(id.expect("generated id"))
        .expect("select by id");
    assert_eq!(found.expect("row").username.as_deref(), Some("member5"));
}

#[test]
fn test_search_chained_conditions() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let found: Option<Member> = shiba
        .select_one(Wrapper::new().eq("username", "member1").eq("age", 10))
        .expect("select one");
    assert_eq!(found.expect("row").username.as_deref(), Some("member1"));
}

#[test]
fn test_search_between() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .eq("username", "member1")
                .between("age", 10, 30),
        )
        .expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("member1"));
}

#[test]
fn test_count() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let total = shiba.count::<Member>(Wrapper::new()).expect("count");
    assert_eq!(total, 4);
    let filtered = shiba
        .count::<Member>(Wrapper::new().gt("age", 15))
        .expect("count filtered");
    assert_eq!(filtered, 3);
}

#[test]
fn test_sort_with_nulls_last() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let _: Option<i64> = shiba.save(&Member::anonymous(100)).expect("save");
    let _: Option<i64> = shiba.save(&Member::new("member5", 100)).expect("save");
    let _: Option<i64> = shiba.save(&Member::new("member6", 100)).expect("save");

    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .eq("age", 100)
                .order_by_desc(vec!["age"])
                .order_by_asc(vec!["username IS NULL", "username"]),
        )
        .expect("list");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].username.as_deref(), Some("member5"));
    assert_eq!(rows[1].username.as_deref(), Some("member6"));
    assert_eq!(rows[2].username, None);
}

#[test]
fn test_paging_with_limit_offset() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .order_by_desc(vec!["username"])
                .limit(2)
                .offset(1),
        )
        .expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].username.as_deref(), Some("member3"));
    assert_eq!(rows[1].username.as_deref(), Some("member2"));
}

#[test]
fn test_paging_with_page_shorthand() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().order_by_asc(vec!["id"]).page(2, 2))
        .expect("list");
    let usernames: Vec<&str> = rows.iter().filter_map(|m| m.username.as_deref()).collect();
    assert_eq!(usernames, vec!["member3", "member4"]);
}

#[test]
fn test_page_mapper() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let page: Page<Member> = shiba
        .page(1, 2, Wrapper::new().order_by_asc(vec!["id"]))
        .expect("page");
    assert_eq!(page.total, 4);
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].username.as_deref(), Some("member2"));
    assert_eq!(page.records[1].username.as_deref(), Some("member3"));
    assert!(page.has_next());
}

#[test]
fn test_page_mapper_rejects_bad_requests() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let result = shiba.page::<Member>(-1, 10, Wrapper::new());
    assert!(matches!(result, Err(ShibaError::InvalidPageRequest(_))));
    let result = shiba.page::<Member>(0, 0, Wrapper::new());
    assert!(matches!(result, Err(ShibaError::InvalidPageRequest(_))));
}

#[test]
fn test_aggregation() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows = shiba
        .exec_iter(
            "SELECT COUNT(id) AS cnt, SUM(age) AS age_sum, AVG(age) AS age_avg, \
             MAX(age) AS age_max, MIN(age) AS age_min FROM member",
            (),
        )
        .expect("aggregate");
    let row = rows.iter().next().expect("one row");
    assert_eq!(row.get_obj::<i64>("cnt").unwrap(), 4);
    assert_eq!(row.get_obj::<i64>("age_sum").unwrap(), 100);
    assert_eq!(row.get_obj::<f64>("age_avg").unwrap(), 25.0);
    assert_eq!(row.get_obj::<i64>("age_max").unwrap(), 40);
    assert_eq!(row.get_obj::<i64>("age_min").unwrap(), 10);
}

#[derive(Debug, Clone, Default)]
struct TeamAverage {
    team_name: Option<String>,
    age_avg: f64,
}

impl GetTableName for TeamAverage {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for TeamAverage {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::from("team_name"), FieldName::from("age_avg")]
    }
}

impl FromValue for TeamAverage {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(TeamAverage {
            team_name: value.get_obj("team_name")?,
            age_avg: value.get_obj("age_avg")?,
        })
    }
}

#[test]
fn test_group_by_team() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<TeamAverage> = shiba
        .list(
            Wrapper::new()
                .table("member")
                .alias("m")
                .select(vec!["t.name AS team_name", "AVG(m.age) AS age_avg"])
                .inner_join("team t", "m.team_id = t.id")
                .group_by(vec!["t.name"])
                .order_by_asc(vec!["t.name"]),
        )
        .expect("group query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].team_name.as_deref(), Some("teamA"));
    assert_eq!(rows[0].age_avg, 15.0);
    assert_eq!(rows[1].team_name.as_deref(), Some("teamB"));
    assert_eq!(rows[1].age_avg, 35.0);
}

#[test]
fn test_group_by_with_having() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<TeamAverage> = shiba
        .list(
            Wrapper::new()
                .table("member")
                .alias("m")
                .select(vec!["t.name AS team_name", "AVG(m.age) AS age_avg"])
                .inner_join("team t", "m.team_id = t.id")
                .group_by(vec!["t.name"])
                .having("AVG(m.age)", SqlOperator::Ge, 20)
                .order_by_asc(vec!["t.name"]),
        )
        .expect("having query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].team_name.as_deref(), Some("teamB"));
}

#[test]
fn test_join_filter_on_joined_column() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .table("member")
                .alias("m")
                .select(vec!["m.id", "m.username", "m.age", "m.team_id"])
                .inner_join("team t", "m.team_id = t.id")
                .eq("t.name", "teamA")
                .order_by_asc(vec!["m.id"]),
        )
        .expect("join query");
    let usernames: Vec<&str> = rows.iter().filter_map(|m| m.username.as_deref()).collect();
    assert_eq!(usernames, vec!["member1", "member2"]);
}

#[derive(Debug, Clone, Default)]
struct UsernameTeam {
    username: Option<String>,
    team_name: Option<String>,
}

impl GetTableName for UsernameTeam {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for UsernameTeam {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::from("username"), FieldName::from("team_name")]
    }
}

impl FromValue for UsernameTeam {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(UsernameTeam {
            username: value.get_obj("username")?,
            team_name: value.get_obj("team_name")?,
        })
    }
}

#[test]
fn test_left_join_on_unrelated_column() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    // two members whose usernames collide with team names
    let _: Option<i64> = shiba.save(&Member::new("teamA", 100)).expect("save");
    let _: Option<i64> = shiba.save(&Member::new("teamB", 100)).expect("save");

    let rows: Vec<UsernameTeam> = shiba
        .list(
            Wrapper::new()
                .table("member")
                .alias("m")
                .select(vec!["m.username", "t.name AS team_name"])
                .left_join("team t", "m.username = t.name")
                .order_by_asc(vec!["m.id"]),
        )
        .expect("left join query");
    assert_eq!(rows.len(), 6);
    assert!(rows[..4].iter().all(|r| r.team_name.is_none()));
    assert_eq!(rows[4].team_name.as_deref(), Some("teamA"));
    assert_eq!(rows[5].team_name.as_deref(), Some("teamB"));
}

#[test]
fn test_is_null_predicate() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let _: Option<i64> = shiba.save(&Member::anonymous(70)).expect("save");

    let rows: Vec<Member> = shiba
        .list(Wrapper::new().is_null("username"))
        .expect("is null");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].age, 70);

    let rows: Vec<Member> = shiba
        .list(Wrapper::new().is_not_null("username"))
        .expect("is not null");
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_in_and_not_in_lists() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().r#in("age", vec![10, 20]).order_by_asc(vec!["age"]))
        .expect("in list");
    let ages: Vec<i32> = rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![10, 20]);

    let rows: Vec<Member> = shiba
        .list(Wrapper::new().not_in("age", vec![10, 20]))
        .expect("not in list");
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_like_predicate() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().like("username", "member%"))
        .expect("like");
    assert_eq!(rows.len(), 4);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().not_like("username", "%4"))
        .expect("not like");
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_apply_raw_fragment() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .apply("age % 20 = ?", Some(vec![Value::Int(0)]))
                .order_by_asc(vec!["age"]),
        )
        .expect("apply fragment");
    let ages: Vec<i32> = rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![20, 40]);
}

#[test]
fn test_subquery_max_age() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().eq("age", SqlExpr("(SELECT MAX(age) FROM member)".to_string())))
        .expect("subquery");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].age, 40);
}

#[test]
fn test_subquery_goe_average() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .ge("age", SqlExpr("(SELECT AVG(age) FROM member)".to_string()))
                .order_by_asc(vec!["age"]),
        )
        .expect("subquery");
    let ages: Vec<i32> = rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![30, 40]);
}

#[test]
fn test_subquery_in() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .in_sql("age", "SELECT age FROM member WHERE age > 10")
                .order_by_asc(vec!["age"]),
        )
        .expect("subquery");
    let ages: Vec<i32> = rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![20, 30, 40]);
}

#[test]
fn test_select_subquery_projection() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows = shiba
        .exec_iter(
            "SELECT username, (SELECT AVG(age) FROM member) AS avg_age FROM member",
            (),
        )
        .expect("select subquery");
    assert_eq!(rows.len(), 4);
    for row in rows.iter() {
        assert_eq!(row.get_obj::<f64>("avg_age").unwrap(), 25.0);
    }
}

#[derive(Debug, Clone, Default)]
struct AgeBand {
    username: Option<String>,
    label: Option<String>,
}

impl GetTableName for AgeBand {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for AgeBand {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::from("username"), FieldName::from("label")]
    }
}

impl FromValue for AgeBand {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(AgeBand {
            username: value.get_obj("username")?,
            label: value.get_obj("label")?,
        })
    }
}

#[test]
fn test_simple_case_expression() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<AgeBand> = shiba
        .list(
            Wrapper::new()
                .select(vec![
                    "username",
                    "CASE age WHEN 10 THEN 'ten' WHEN 20 THEN 'twenty' ELSE 'other' END AS label",
                ])
                .order_by_asc(vec!["id"]),
        )
        .expect("case query");
    let labels: Vec<&str> = rows.iter().filter_map(|r| r.label.as_deref()).collect();
    assert_eq!(labels, vec!["ten", "twenty", "other", "other"]);
}

#[test]
fn test_searched_case_expression() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<AgeBand> = shiba
        .list(
            Wrapper::new()
                .select(vec![
                    "username",
                    "CASE WHEN age BETWEEN 0 AND 20 THEN '0-20' \
                     WHEN age BETWEEN 21 AND 30 THEN '21-30' \
                     ELSE 'other' END AS label",
                ])
                .order_by_asc(vec!["id"]),
        )
        .expect("case query");
    let labels: Vec<&str> = rows.iter().filter_map(|r| r.label.as_deref()).collect();
    assert_eq!(labels, vec!["0-20", "0-20", "21-30", "other"]);
}

#[test]
fn test_constant_projection() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows = shiba
        .exec_iter("SELECT username, 'A' AS tag FROM member", ())
        .expect("constant projection");
    assert_eq!(rows.len(), 4);
    for row in rows.iter() {
        assert_eq!(row.get_obj::<String>("tag").unwrap(), "A");
    }
}

#[test]
fn test_concat_projection() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let combined: String = shiba
        .exec_first(
            "SELECT username || '_' || CAST(age AS TEXT) FROM member WHERE username = ?",
            ("member1",),
        )
        .expect("concat projection");
    assert_eq!(combined, "member1_10");
}

#[test]
fn test_member_dto_projection() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let dtos: Vec<MemberDto> = shiba
        .list(Wrapper::new().order_by_asc(vec!["age"]))
        .expect("dto projection");
    assert_eq!(dtos.len(), 4);
    assert_eq!(dtos[0].username.as_deref(), Some("member1"));
    assert_eq!(dtos[0].age, 10);
}

#[test]
fn test_user_dto_projection_with_alias() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let dtos: Vec<UserDto> = shiba
        .list(
            Wrapper::new()
                .select(vec!["username AS name", "age"])
                .order_by_asc(vec!["age"]),
        )
        .expect("aliased projection");
    assert_eq!(dtos[0].name.as_deref(), Some("member1"));
    assert_eq!(dtos[3].age, 40);
}

fn search_member(shiba: &Shiba, username_cond: Option<&str>, age_cond: Option<i32>) -> Vec<Member> {
    // absent parameters contribute no condition
    shiba
        .list(
            Wrapper::new()
                .eq("username", username_cond.map(str::to_string))
                .eq("age", age_cond),
        )
        .expect("dynamic search")
}

#[test]
fn test_dynamic_query_with_optional_values() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    assert_eq!(search_member(&shiba, Some("member1"), None).len(), 1);
    assert_eq!(search_member(&shiba, Some("member1"), Some(10)).len(), 1);
    assert_eq!(search_member(&shiba, None, Some(40)).len(), 1);
    assert_eq!(search_member(&shiba, None, None).len(), 4);
}

#[test]
fn test_dynamic_query_with_when_gate() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let min_age = Some(20);
    let rows: Vec<Member> = shiba
        .list(
            Wrapper::new()
                .when(min_age.is_some())
                .ge("age", min_age.unwrap_or_default())
                .when(false)
                .eq("username", "ignored"),
        )
        .expect("gated search");
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_bulk_update() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let affected = shiba
        .update(
            &Member::default(),
            Wrapper::new().set("username", "nonmember").lt("age", 28),
        )
        .expect("bulk update");
    assert_eq!(affected, 2);

    // reads go straight to the store, so the new values are visible at once
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().order_by_asc(vec!["id"]))
        .expect("list");
    assert_eq!(rows[0].username.as_deref(), Some("nonmember"));
    assert_eq!(rows[1].username.as_deref(), Some("nonmember"));
    assert_eq!(rows[2].username.as_deref(), Some("member3"));
    assert_eq!(rows[3].username.as_deref(), Some("member4"));
}

#[test]
fn test_bulk_arithmetic_update() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let affected = shiba
        .update(
            &Member::default(),
            Wrapper::new().set("age", SqlExpr("age * 2".to_string())),
        )
        .expect("bulk multiply");
    assert_eq!(affected, 4);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().order_by_asc(vec!["id"]))
        .expect("list");
    let ages: Vec<i32> = rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![20, 40, 60, 80]);
}

#[test]
fn test_bulk_delete() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let affected = shiba
        .remove::<Member>(Wrapper::new().gt("age", 18))
        .expect("bulk delete");
    assert_eq!(affected, 3);
    assert_eq!(shiba.count::<Member>(Wrapper::new()).expect("count"), 1);
}

#[test]
fn test_update_by_id() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let mut member1: Member = shiba
        .select_one(Wrapper::new().eq("username", "member1"))
        .expect("select")
        .expect("member1 exists");
    member1.age = 11;
    let affected = shiba.update_by_id(&member1).expect("update by id");
    assert_eq!(affected, 1);

    let reloaded: Option<Member> = shiba
        .select_by_id(member1.id.expect("id"))
        .expect("reload");
    assert_eq!(reloaded.expect("row").age, 11);
}

#[test]
fn test_remove_by_id() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let id: Option<i64> = shiba.save(&Member::new("doomed", 99)).expect("save");
    let affected = shiba
        .remove_by_id::<Member, _>(id.expect("id"))
        .expect("remove by id");
    assert_eq!(affected, 1);
    assert_eq!(shiba.count::<Member>(Wrapper::new()).expect("count"), 4);
}

#[test]
fn test_save_batch() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let members: Vec<Member> = (0..50)
        .map(|i| Member::new(format!("bulk{}", i), i))
        .collect();
    shiba.save_batch(&members).expect("batch insert");
    assert_eq!(shiba.count::<Member>(Wrapper::new()).expect("count"), 54);
}

#[test]
fn test_sql_function_replace() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows = shiba
        .exec_iter(
            "SELECT REPLACE(username, 'member', 'M') AS shortname FROM member ORDER BY id",
            (),
        )
        .expect("replace projection");
    let names: Vec<String> = rows
        .iter()
        .map(|r| r.get_obj::<String>("shortname").unwrap())
        .collect();
    assert_eq!(names, vec!["M1", "M2", "M3", "M4"]);
}

#[test]
fn test_sql_function_lower_in_predicate() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let rows: Vec<Member> = shiba
        .list(Wrapper::new().eq("username", SqlExpr("LOWER(username)".to_string())))
        .expect("lower predicate");
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_exec_first_opt_on_empty_result() {
    let (_dir, shiba) = setup();
    seed(&shiba);
    let missing: Option<i64> = shiba
        .exec_first_opt("SELECT id FROM member WHERE age > 100", ())
        .expect("empty result is not an error");
    assert_eq!(missing, None);
}

#[test]
fn test_backend_failure_propagates() {
    let (_dir, shiba) = setup();
    let result = shiba.exec_iter("SELECT * FROM no_such_table", ());
    assert!(matches!(result, Err(ShibaError::ExecuteError(_))));
}
