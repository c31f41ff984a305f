use sqlforge::prelude::*;
use sqlforge::sql::SqlElement;

struct Blog {
    user: Table,
    post: Table,
}

fn blog() -> Blog {
    let user = table("User")
        .column("id", pk())
        .column("name", varchar(100))
        .build()
        .unwrap();
    let post = table("Post")
        .column("id", pk())
        .column("user_id", user.col("id").unwrap())
        .column("title", varchar(200))
        .build()
        .unwrap();
    Blog { user, post }
}

#[test]
fn foreign_key_mirrors_the_referenced_column() {
    let b = blog();
    let user_id = b.post.col("user_id").unwrap();
    let id = b.user.col("id").unwrap();

    assert!(user_id.is_frozen());
    assert!(user_id.is_foreign());
    assert!(user_id.foreign_target().unwrap().ptr_eq(&id));
    assert_eq!(user_id.data_type(), DataType::Int);
    assert!(!user_id.is_primary_key());
    assert!(!user_id.is_auto_increment());
    assert_eq!(user_id.to_string(), "Column(user_id, Table(post))");

    let err = user_id.clone().nullable().unwrap_err();
    assert!(err.is_frozen());
}

#[test]
fn joined_columns_take_a_composed_name() {
    let b = blog();
    let author = b.post.col("user_id").unwrap().join(&b.user).unwrap();
    let name = author.col("name").unwrap();

    assert!(name.is_joined());
    assert_eq!(name.model_name(), "userName");
    assert_eq!(name.alias(), "user_name");
    assert_eq!(name.column_type(), b.user.col("name").unwrap().column_type());
    assert_eq!(author.path(), "(J|0|post|user)[user_id|id]");
    assert_eq!(
        name.qualified_name(),
        "(J|0|post|user)[user_id|id].name"
    );

    let nullable = b
        .post
        .col("user_id")
        .unwrap()
        .left_join(&b.user)
        .unwrap()
        .col("name")
        .unwrap();
    assert!(nullable.is_nullable());
}

#[test]
fn identical_joins_are_interchangeable() {
    let b = blog();
    let user_id = b.post.col("user_id").unwrap();
    let first = user_id.join(&b.user).unwrap().col("name").unwrap();
    let second = user_id.join(&b.user).unwrap().col("name").unwrap();

    assert!(!first.ptr_eq(&second));
    assert_eq!(first, second);
    assert_eq!(sql!("{} IS NULL", &first), sql!("{} IS NULL", &second));

    let other = user_id.join(&b.user).unwrap().col("id").unwrap();
    assert_ne!(first, other);

    let left = user_id.left_join(&b.user).unwrap().col("name").unwrap();
    assert_ne!(first, left);
    assert_ne!(param(&first), param(&left));
}

#[test]
fn joined_columns_cannot_be_table_columns() {
    let b = blog();
    let name = b
        .post
        .col("user_id")
        .unwrap()
        .join(&b.user)
        .unwrap()
        .col("name")
        .unwrap();
    let err = table("Summary")
        .column("id", pk())
        .column("author", name)
        .build()
        .unwrap_err();
    assert!(err.is_schema());
    assert!(err.to_string().contains("table 'summary'"));
}

#[test]
fn rendering_and_flags() {
    let b = blog();
    let id = b.user.col("id").unwrap();

    let filter = sql!("{} = {}", &id, param(&id));
    assert_eq!(filter.to_string(), "user.id = :id");
    assert!(filter.has_columns());
    assert!(!filter.has_calls());
    assert_eq!(filter.inputs(), vec![param(&id)]);

    let raw = sql!("1 = 1");
    assert!(!raw.has_columns());
    assert_eq!(raw.elements().len(), 1);

    let counted = sql!("{} > 0", count(&id));
    assert!(counted.has_calls());
    assert!(counted.has_columns());
    assert_eq!(counted.to_string(), "COUNT(user.id) > 0");
}

#[test]
fn nesting_flattens_to_the_same_value() {
    let b = blog();
    let id = b.post.col("id").unwrap();
    let title = b.post.col("title").unwrap();

    let nested = sql!("{} AND {}", sql!("{} > 0", &id), sql!("{} <> ''", &title));
    let flat = sql!("{} > 0 AND {} <> ''", &id, &title);
    assert_eq!(nested, flat);
    assert!(
        nested
            .elements()
            .iter()
            .all(|e| matches!(e, SqlElement::Raw(_) | SqlElement::Column(_)))
    );
    assert_eq!(sql!("{}", nested.clone()), nested);
}

#[test]
fn parameters_compare_by_name_and_type() {
    let b = blog();
    let id = b.post.col("id").unwrap();
    let user_id = b.post.col("user_id").unwrap();

    assert_eq!(param(&id), param(&id));
    assert_ne!(param(&id), param(&user_id));
    assert_ne!(param(&id), param(&id).array());

    let named = param_named(&id, "post_id").unwrap();
    assert_eq!(named.name(), "post_id");
    assert!(input(DataType::Int, "").is_err());
    assert_eq!(
        input(DataType::Int, "limit").unwrap(),
        input(DataType::Int, "limit").unwrap()
    );
}

#[test]
fn update_needs_where_or_unsafe_mode() {
    let b = blog();
    let title = b.post.col("title").unwrap();
    let id = b.post.col("id").unwrap();

    let everything = update(&b.post).set_param(&title);
    assert!(everything.validate().unwrap_err().is_validation());
    everything.clone().unsafe_mode().validate().unwrap();

    update(&b.post)
        .set_param(&title)
        .filter(sql!("{} = {}", &id, param(&id)))
        .validate()
        .unwrap();
}

#[test]
fn schema_validation_pass() {
    let b = blog();
    let id = b.post.col("id").unwrap();
    let author = b.post.col("user_id").unwrap().join(&b.user).unwrap();

    let mut schema = Schema::new();
    schema.add_table(&b.user).unwrap();
    schema.add_table(&b.post).unwrap();
    schema
        .add_action(
            "post_with_author",
            select(&b.post)
                .column(&id)
                .column(author.col("name").unwrap())
                .filter(sql!("{} = {}", &id, param(&id)))
                .first(),
        )
        .unwrap();
    schema.add_action("create_post", insert(&b.post).with_params()).unwrap();
    schema.validate().unwrap();

    schema
        .add_action("list", select(&b.user).column(count_all()))
        .unwrap();
    let err = schema.validate().unwrap_err();
    assert!(err.to_string().ends_with("action 'list'"));
}
