use super::*;
use crate::sql::call::now;
use crate::sql::param;
use crate::table::table;

fn user_table() -> crate::Table {
    table("User")
        .column("id", pk())
        .column("name", varchar(100))
        .build()
        .unwrap()
}

#[test]
fn fresh_column_defaults() {
    let c = int();
    assert!(!c.is_frozen());
    assert!(!c.is_nullable());
    assert!(!c.is_unique());
    assert!(c.default_value().is_none());
    assert!(c.name().is_none());
    assert_eq!(c.to_string(), "Column(?, -)");
}

#[test]
fn fluent_mutators_apply_in_place() {
    let c = varchar(20).nullable().unwrap().unique().unwrap();
    assert!(c.is_nullable());
    assert!(c.is_unique());
    assert_eq!(c.column_type().to_string(), "VARCHAR(20)");
}

#[test]
fn mutators_fail_after_freeze() {
    let c = int();
    c.freeze();
    c.freeze();
    assert!(c.is_frozen());

    let err = c.clone().nullable().unwrap_err();
    assert!(err.is_frozen());
    assert_eq!(
        err.to_string(),
        "Frozen column: cannot call nullable() on frozen column Column(?, -)"
    );
    assert!(c.clone().unique().unwrap_err().is_frozen());
    assert!(c.clone().set_default(1).unwrap_err().is_frozen());
    assert!(c.clone().set_db_name("x").unwrap_err().is_frozen());
    assert!(!c.is_nullable());
}

#[test]
fn frozen_check_comes_before_argument_checks() {
    let user = user_table();
    let id = user.col("id").unwrap();
    let name = user.col("name").unwrap();

    let err = name
        .clone()
        .set_default(crate::sql!("{} + 1", &id))
        .unwrap_err();
    assert!(err.is_frozen());
    assert!(err.to_string().contains("set_default()"));

    let err = name.clone().set_db_name("bad name").unwrap_err();
    assert!(err.is_frozen());
    assert!(err.to_string().contains("set_db_name()"));

    let err = name.auto_increment().unwrap_err();
    assert!(err.is_frozen());
}

#[test]
fn bound_columns_are_frozen_and_named() {
    let user = user_table();
    let name = user.col("name").unwrap();
    assert!(name.is_frozen());
    assert_eq!(name.to_string(), "Column(name, Table(user))");
    let err = name.unique().unwrap_err();
    assert!(err.to_string().contains("Column(name, Table(user))"));
}

#[test]
fn auto_increment_and_unsigned_check_the_type() {
    assert!(int().auto_increment().unwrap().is_auto_increment());
    assert!(text().auto_increment().unwrap_err().is_schema());
    assert_eq!(
        int().unsigned().unwrap().column_type().to_string(),
        "INT UNSIGNED"
    );
    assert!(boolean().unsigned().unwrap_err().is_schema());
}

#[test]
fn primary_key_implies_not_null() {
    let c = int().nullable().unwrap().primary_key().unwrap();
    assert!(c.is_primary_key());
    assert!(!c.is_nullable());
    assert!(!c.is_auto_increment());
}

#[test]
fn db_name_override_is_validated() {
    assert_eq!(
        int().set_db_name("legacy_id").unwrap().db_name().as_deref(),
        Some("legacy_id")
    );
    assert!(int().set_db_name("drop table").unwrap_err().is_schema());
}

#[test]
fn default_may_call_functions_but_not_reference_columns() {
    let c = datetime().set_default(now()).unwrap();
    assert_eq!(c.default_value().unwrap().to_string(), "NOW()");

    let user = user_table();
    let id = user.col("id").unwrap();
    let err = int().set_default(crate::sql!("{} + 1", &id)).unwrap_err();
    assert!(err.is_schema());

    let err = int()
        .set_default(crate::sql!("{}", param(&id)))
        .unwrap_err();
    assert!(err.is_schema());
}

#[test]
fn literal_defaults() {
    assert_eq!(
        varchar(5).set_default("n/a").unwrap().default_value().unwrap().to_string(),
        "'n/a'"
    );
    assert_eq!(
        boolean().set_default(false).unwrap().default_value().unwrap().to_string(),
        "FALSE"
    );
}

#[test]
fn fk_requires_a_bound_column() {
    let loose = int();
    let err = fk(&loose).unwrap_err();
    assert!(err.is_schema());

    loose.freeze();
    assert!(fk(&loose).unwrap_err().is_schema());

    let user = user_table();
    let id = user.col("id").unwrap();
    let user_id = fk(&id).unwrap().nullable().unwrap();
    assert!(!user_id.is_frozen());
    assert!(user_id.is_nullable());
    assert!(user_id.foreign_column().unwrap().ptr_eq(&id));
}

#[test]
fn foreign_copy_is_independent_of_its_source() {
    let user = user_table();
    let id = user.col("id").unwrap();
    let copy = Column::new_foreign_column(&id);

    assert!(!copy.ptr_eq(&id));
    assert_ne!(copy, id);
    assert!(!copy.is_primary_key());
    assert!(!copy.is_auto_increment());
    assert_eq!(copy.data_type(), DataType::Int);

    let copy = copy.nullable().unwrap();
    assert!(copy.is_nullable());
    assert!(!id.is_nullable());
    assert!(id.is_primary_key());
}

#[test]
fn foreign_chains_share_a_root() {
    let user = user_table();
    let post = table("Post")
        .column("id", pk())
        .column("user_id", user.col("id").unwrap())
        .build()
        .unwrap();
    let comment = table("Comment")
        .column("id", pk())
        .column("author_id", post.col("user_id").unwrap())
        .build()
        .unwrap();

    let author_id = comment.col("author_id").unwrap();
    assert!(author_id.root_column().ptr_eq(&user.col("id").unwrap()));
    assert!(author_id.same_constraint(&post.col("user_id").unwrap()));
    assert!(!author_id.same_constraint(&post.col("id").unwrap()));
}

#[test]
fn clones_share_state_and_compare_equal() {
    let a = int();
    let b = a.clone();
    let a = a.nullable().unwrap();
    assert!(b.is_nullable());
    assert_eq!(a, b);
    assert_ne!(a, int());
}

#[test]
fn qualified_name_uses_db_names() {
    let t = table("Account")
        .db_name("accounts")
        .column("id", pk())
        .column("displayName", varchar(50).set_db_name("display").unwrap())
        .build()
        .unwrap();
    let c = t.col("displayName").unwrap();
    assert_eq!(c.qualified_name(), "accounts.display");
    assert_eq!(c.model_name(), "displayName");
    assert_eq!(c.alias(), "display_name");
}
