//! Statement synthesis across dialects.

mod common;

use common::{Group, User};
use rowmap_core::{Error, Value};
use rowmap_query::{
    DeleteBuilder, InsertBuilder, Oracle, Postgres, SqlServer, UpdateBuilder, build_search,
    build_select, delete, insert, search, select, update,
};

fn new_user() -> User {
    User {
        id: None,
        name: "Ada".to_string(),
        email: None,
        group_ids: vec![7, 8],
        groups: Vec::new(),
    }
}

fn saved_user() -> User {
    User {
        id: Some(3),
        name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
        group_ids: vec![7],
        groups: Vec::new(),
    }
}

#[test]
fn oracle_insert_returns_key_through_output_bind() {
    let plan = InsertBuilder::new(&new_user()).build(&Oracle).unwrap();
    assert_eq!(
        plan.primary().sql(),
        "INSERT INTO users (name, email) VALUES (:name, :email) RETURNING id INTO :Result"
    );
    assert_eq!(plan.primary().output_params(), ["Result".to_string()]);
    assert_eq!(
        plan.primary().params(),
        [
            ("name".to_string(), Value::Text("Ada".to_string())),
            ("email".to_string(), Value::Null),
        ]
    );
}

#[test]
fn sqlserver_insert_uses_output_inserted() {
    let plan = InsertBuilder::new(&new_user()).build(&SqlServer).unwrap();
    assert_eq!(
        plan.primary().sql(),
        "INSERT INTO users (name, email) OUTPUT INSERTED.id VALUES (@name, @email)"
    );
    assert!(plan.primary().output_params().is_empty());
}

#[test]
fn postgres_insert_uses_returning() {
    let plan = InsertBuilder::new(&new_user()).build(&Postgres).unwrap();
    assert_eq!(
        plan.primary().sql(),
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id"
    );
}

#[test]
fn unsaved_owner_leaves_named_hole_in_link_statements() {
    let plan = InsertBuilder::new(&new_user()).build(&Oracle).unwrap();
    assert_eq!(plan.hole(), Some("OwnerKey"));
    assert_eq!(plan.link_statements().len(), 2);
    let link = &plan.link_statements()[0];
    assert_eq!(
        link.sql(),
        "INSERT INTO GROUPStoUSERS (ID_users, ID_groups) VALUES (:OwnerKey, :RelatedKey)"
    );
    assert_eq!(link.params()[0].1, Value::Null);
    assert_eq!(link.params()[1].1, Value::BigInt(7));
}

#[test]
fn saved_owner_binds_link_keys_directly() {
    let plan = InsertBuilder::new(&saved_user()).build(&Oracle).unwrap();
    assert_eq!(plan.hole(), None);
    assert_eq!(plan.link_statements().len(), 1);
    assert_eq!(plan.link_statements()[0].params()[0].1, Value::BigInt(3));
}

#[test]
fn ignore_links_drops_membership_inserts() {
    let plan = InsertBuilder::new(&new_user())
        .ignore_links(true)
        .build(&Oracle)
        .unwrap();
    assert!(plan.link_statements().is_empty());
}

#[test]
fn insert_honors_table_override() {
    let plan = InsertBuilder::new(&new_user())
        .table("users_audit")
        .ignore_links(true)
        .build(&Postgres)
        .unwrap();
    assert!(plan.primary().sql().starts_with("INSERT INTO users_audit "));
}

#[test]
fn empty_table_override_rejected() {
    let err = InsertBuilder::new(&new_user())
        .table("  ")
        .build(&Oracle)
        .unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
}

#[test]
fn update_keys_on_primary_key() {
    let stmt = UpdateBuilder::new(&saved_user()).build(&Oracle).unwrap();
    assert_eq!(stmt.sql(), "UPDATE users SET name = :name, email = :email WHERE id = :id");
    assert_eq!(stmt.params().len(), 3);
    assert_eq!(stmt.params()[2], ("id".to_string(), Value::BigInt(3)));
}

#[test]
fn update_of_unsaved_row_rejected() {
    let err = UpdateBuilder::new(&new_user()).build(&Oracle).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
}

#[test]
fn update_key_property_substitute() {
    let stmt = UpdateBuilder::new(&saved_user())
        .key_property("name")
        .build(&SqlServer)
        .unwrap();
    assert_eq!(stmt.sql(), "UPDATE users SET email = @email WHERE name = @name");
}

#[test]
fn delete_keys_on_primary_key() {
    let stmt = DeleteBuilder::new(&saved_user()).build(&Postgres).unwrap();
    assert_eq!(stmt.sql(), "DELETE FROM users WHERE id = $1");
    assert_eq!(stmt.params(), [("id".to_string(), Value::BigInt(3))]);
}

#[test]
fn select_without_filter_is_always_true() {
    let stmt = build_select::<Group>(&Oracle, None, None).unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM groups WHERE (1 = 1)");
}

#[test]
fn select_with_filter() {
    let stmt = build_select::<Group>(&Oracle, Some("title = 'staff'"), None).unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM groups WHERE (title = 'staff')");
}

#[test]
fn search_keys_on_current_primary_key() {
    let stmt = build_search(&SqlServer, &saved_user(), None).unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM users WHERE id = @id");
}

#[test]
fn search_key_property_substitute() {
    let stmt = build_search(&SqlServer, &saved_user(), Some("email")).unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM users WHERE email = @email");
}

#[test]
fn delete_key_property_substitute() {
    let stmt = DeleteBuilder::new(&saved_user())
        .key_property("name")
        .build(&Oracle)
        .unwrap();
    assert_eq!(stmt.sql(), "DELETE FROM users WHERE name = :name");
}

#[test]
fn macros_delegate_to_builders() {
    let user = saved_user();
    assert!(insert!(&user, &Oracle).is_ok());
    assert!(update!(&user, &Oracle).is_ok());
    assert!(delete!(&user, &Oracle).is_ok());
    assert!(search!(&user, &Oracle).is_ok());
    assert!(select!(User, &Oracle, where: "name = :n").is_ok());
}
