use super::*;
use crate::column::{int, pk, varchar};
use crate::join::JoinType;
use crate::sql;
use crate::sql::call::count_all;
use crate::sql::param;
use crate::table::table;

struct Fixture {
    company: Table,
    user: Table,
    post: Table,
}

fn fixture() -> Fixture {
    let company = table("Company")
        .column("id", pk())
        .column("name", varchar(100))
        .build()
        .unwrap();
    let user = table("User")
        .column("id", pk())
        .column("name", varchar(100))
        .column("company_id", company.col("id").unwrap())
        .build()
        .unwrap();
    let post = table("Post")
        .column("id", pk())
        .column("user_id", user.col("id").unwrap())
        .column("title", varchar(100))
        .build()
        .unwrap();
    Fixture { company, user, post }
}

#[test]
fn update_without_where_needs_unsafe_mode() {
    let s = fixture();
    let name = s.user.col("name").unwrap();

    let action = update(&s.user).set_param(&name);
    let err = action.validate().unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("update on Table(user)"));

    let action = action.unsafe_mode();
    action.validate().unwrap();
    assert!(action.where_sql().is_empty());
}

#[test]
fn update_setters_are_checked() {
    let s = fixture();
    let name = s.user.col("name").unwrap();
    let id = s.user.col("id").unwrap();
    let filter = sql!("{} = {}", &id, param(&id));

    let err = update(&s.user).filter(filter.clone()).validate().unwrap_err();
    assert!(err.to_string().contains("at least one setter"));

    let err = update(&s.user)
        .set_param(&name)
        .set(&name, "'x'")
        .filter(filter.clone())
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("set more than once"));

    let err = update(&s.user)
        .set_param(&s.post.col("title").unwrap())
        .filter(filter)
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("does not belong to Table(user)"));
}

#[test]
fn delete_without_where() {
    let s = fixture();
    assert!(delete(&s.post).validate().unwrap_err().is_validation());
    delete(&s.post).unsafe_mode().validate().unwrap();
    delete(&s.post)
        .validate_with(&ValidationConfig::new().allow_missing_where())
        .unwrap();
}

#[test]
fn where_conditions_are_and_ed() {
    let s = fixture();
    let id = s.post.col("id").unwrap();
    let title = s.post.col("title").unwrap();
    let d = delete(&s.post)
        .filter(sql!("{} = {}", &id, param(&id)))
        .filter(sql!("{} <> ''", &title));
    assert_eq!(
        d.where_sql().to_string(),
        "(post.id = :id) AND (post.title <> '')"
    );
    assert_eq!(d.inputs(), vec![param(&id)]);
}

#[test]
fn insert_counts_setters_for_full_inserts() {
    let s = fixture();
    let title = s.post.col("title").unwrap();

    let full = insert(&s.post).with_params();
    full.validate().unwrap();
    assert_eq!(full.setters().len(), 2);
    let names: Vec<String> = full.inputs().iter().map(|v| v.name()).collect();
    assert_eq!(names, ["user_id", "title"]);

    let err = insert(&s.post).set_param(&title).full().validate().unwrap_err();
    assert!(err.to_string().contains("full insert expects 2 setters, got 1"));

    insert(&s.post).set_param(&title).validate().unwrap();
    assert!(insert(&s.post).validate().unwrap_err().is_validation());
}

#[test]
fn full_insert_skips_every_auto_increment_column() {
    let counter = table("Counter")
        .column("id", pk())
        .column("seq", int().auto_increment().unwrap())
        .column("name", varchar(10))
        .build()
        .unwrap();

    let full = insert(&counter).with_params();
    assert_eq!(full.setters().len(), 1);
    full.validate().unwrap();

    let name = counter.col("name").unwrap();
    let seq = counter.col("seq").unwrap();
    let err = insert(&counter)
        .set_param(&name)
        .set_param(&seq)
        .full()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("full insert expects 1 setters, got 2"));
}

#[test]
fn insert_by_unknown_property_is_deferred() {
    let s = fixture();
    let action = insert(&s.post).set_by_name("nope", "1");
    let err = action.validate().unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("no column 'nope'"));
}

#[test]
fn select_requires_order_by_for_many_rows() {
    let s = fixture();
    let id = s.post.col("id").unwrap();

    let err = select(&s.post).validate().unwrap_err();
    assert!(err.to_string().contains("ORDER BY"));
    assert!(err.to_string().contains("select on Table(post)"));

    select(&s.post).order_by(sql!("{} DESC", &id)).validate().unwrap();
    select(&s.post).unordered().validate().unwrap();
    select(&s.post)
        .filter(sql!("{} = {}", &id, param(&id)))
        .first()
        .validate()
        .unwrap();
    select(&s.post)
        .validate_with(&ValidationConfig::new().allow_unordered())
        .unwrap();
}

#[test]
fn select_defaults_to_all_columns() {
    let s = fixture();
    let aliases: Vec<String> = select(&s.post)
        .columns()
        .iter()
        .map(|c| c.alias().to_string())
        .collect();
    assert_eq!(aliases, ["id", "user_id", "title"]);
}

#[test]
fn select_collects_joins_parents_first() {
    let s = fixture();
    let author = s.post.col("user_id").unwrap().join(&s.user).unwrap();
    let company = author
        .col("company_id")
        .unwrap()
        .left_join(&s.company)
        .unwrap();

    let q = select(&s.post)
        .column(company.col("name").unwrap())
        .column(author.col("name").unwrap())
        .unordered();
    q.validate().unwrap();

    let paths: Vec<String> = q.joins().iter().map(|j| j.path().to_string()).collect();
    assert_eq!(
        paths,
        [
            "(J|0|post|user)[user_id|id]",
            "(J|1|(J|0|post|user)[user_id|id]|company)[company_id|id]",
        ]
    );
    let aliases: Vec<String> = q.columns().iter().map(|c| c.alias().to_string()).collect();
    assert_eq!(aliases, ["user_company_name", "user_name"]);
}

#[test]
fn select_keeps_inner_and_left_joins_on_the_same_key_apart() {
    let s = fixture();
    let user_id = s.post.col("user_id").unwrap();
    let inner = user_id.join(&s.user).unwrap().col("name").unwrap();
    let left = user_id.left_join(&s.user).unwrap().col("name").unwrap();
    assert_ne!(inner, left);

    let q = select(&s.post)
        .column_as(&inner, "a")
        .column_as(&left, "b")
        .column_as(user_id.join(&s.user).unwrap().col("id").unwrap(), "c")
        .unordered();
    q.validate().unwrap();

    let kinds: Vec<JoinType> = q.joins().iter().map(|j| j.join_type()).collect();
    assert_eq!(kinds, [JoinType::Inner, JoinType::Left]);
}

#[test]
fn select_rejects_unreachable_and_too_deep_columns() {
    let s = fixture();
    let err = select(&s.post)
        .column(s.user.col("name").unwrap())
        .unordered()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("not reachable from Table(post)"));

    let author = s.post.col("user_id").unwrap().join(&s.user).unwrap();
    let company = author.col("company_id").unwrap().join(&s.company).unwrap();
    let q = select(&s.post).column(company.col("name").unwrap()).unordered();
    q.validate().unwrap();
    let err = q
        .validate_with(&ValidationConfig::new().with_max_join_depth(1))
        .unwrap_err();
    assert!(err.to_string().contains("2 joins deep"));
}

#[test]
fn select_alias_problems() {
    let s = fixture();
    let title = s.post.col("title").unwrap();

    let err = select(&s.post)
        .column(&title)
        .column(&title)
        .unordered()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate select alias 'title'"));

    let err = select(&s.post)
        .column(count_all())
        .unordered()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("cannot infer a select alias"));

    select(&s.post)
        .column_as(count_all(), "total")
        .unordered()
        .validate()
        .unwrap();
}

#[test]
fn having_requires_group_by() {
    let s = fixture();
    let err = select(&s.post)
        .column_as(count_all(), "total")
        .having(sql!("COUNT(*) > 1"))
        .unordered()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("HAVING requires GROUP BY"));
}

#[test]
fn actions_embed_as_opaque_elements() {
    let s = fixture();
    let user_id = s.post.col("user_id").unwrap();
    let user_pk = s.user.col("id").unwrap();

    let sub = select(&s.post)
        .column(&user_id)
        .filter(sql!("{} = {}", &user_id, &user_pk))
        .unordered();
    let q = sql!("EXISTS {}", sub);
    assert!(!q.has_columns());
    assert_eq!(q.to_string(), "EXISTS (Select(post))");
    assert!(matches!(q.elements()[1], crate::sql::SqlElement::Action(_)));

    let action: Action = update(&s.user).unsafe_mode().into();
    assert_eq!(action.kind(), "update");
    assert_eq!(action.to_string(), "Update(user)");
}
