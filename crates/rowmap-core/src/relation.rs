//! Relationship metadata and classification.
//!
//! Relationships are declared as static metadata on each entity type. The
//! classifier inspects that metadata (and the related type's metadata,
//! reached through function pointers) to decide whether a collection
//! property is one-to-many or many-to-many, without any runtime
//! reflection.

use crate::error::{Error, Result};
use crate::property::PropertyInfo;
use crate::types::NameRewriter;

/// How a collection property relates two entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The related type carries a foreign key back to the owner.
    OneToMany,
    /// Both sides are collections, linked through a junction table.
    ManyToMany,
}

/// Static override for a many-to-many junction table.
///
/// When absent, the junction name and key columns are derived from the two
/// table names (see [`junction_table_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTableInfo {
    /// The junction table name (e.g. `"USERtoGROUP"`).
    pub table_name: &'static str,
    /// Column pointing at the owning side (e.g. `"ID_users"`).
    pub local_column: &'static str,
    /// Column pointing at the related side (e.g. `"ID_groups"`).
    pub remote_column: &'static str,
}

impl LinkTableInfo {
    /// Create a new link-table definition.
    #[must_use]
    pub const fn new(
        table_name: &'static str,
        local_column: &'static str,
        remote_column: &'static str,
    ) -> Self {
        Self {
            table_name,
            local_column,
            remote_column,
        }
    }
}

/// Metadata about a navigation property between entity types.
#[derive(Debug, Clone, Copy)]
pub struct RelationInfo {
    /// Name of the navigation property.
    pub name: &'static str,

    /// The related entity's table name.
    pub related_table: &'static str,

    /// Whether this property holds a collection of related entities.
    pub collection: bool,

    /// Foreign key column on the owner for singular navigations
    /// (e.g. `"team_id"` on a hero pointing at its team).
    pub local_fk: Option<&'static str>,

    /// Foreign key column on the related type pointing back at the owner
    /// (e.g. `"order_id"` on an item when accessed from an order).
    pub remote_fk: Option<&'static str>,

    /// Explicitly declared inverse property on the related type.
    pub inverse_of: Option<&'static str>,

    /// Junction table override for many-to-many relationships.
    pub link_table: Option<LinkTableInfo>,

    /// Function pointer returning the related type's property metadata.
    ///
    /// Keeps relationship metadata static and allocation-free while still
    /// letting the classifier see the other side without reflection.
    pub related_fields_fn: fn() -> &'static [PropertyInfo],

    /// Function pointer returning the related type's relationship metadata.
    pub related_relations_fn: fn() -> &'static [RelationInfo],
}

impl RelationInfo {
    fn empty_fields() -> &'static [PropertyInfo] {
        &[]
    }

    fn empty_relations() -> &'static [RelationInfo] {
        &[]
    }

    /// Create a new relationship with required data.
    #[must_use]
    pub const fn new(name: &'static str, related_table: &'static str) -> Self {
        Self {
            name,
            related_table,
            collection: false,
            local_fk: None,
            remote_fk: None,
            inverse_of: None,
            link_table: None,
            related_fields_fn: Self::empty_fields,
            related_relations_fn: Self::empty_relations,
        }
    }

    /// Mark this navigation as a collection.
    #[must_use]
    pub const fn collection(mut self, value: bool) -> Self {
        self.collection = value;
        self
    }

    /// Set the owner-side foreign key column.
    #[must_use]
    pub const fn local_fk(mut self, column: &'static str) -> Self {
        self.local_fk = Some(column);
        self
    }

    /// Set the related-side foreign key column.
    #[must_use]
    pub const fn remote_fk(mut self, column: &'static str) -> Self {
        self.remote_fk = Some(column);
        self
    }

    /// Declare the reciprocal property on the related type.
    #[must_use]
    pub const fn inverse_of(mut self, property: &'static str) -> Self {
        self.inverse_of = Some(property);
        self
    }

    /// Override the junction table metadata.
    #[must_use]
    pub const fn link_table(mut self, info: LinkTableInfo) -> Self {
        self.link_table = Some(info);
        self
    }

    /// Provide the related type's property metadata function.
    #[must_use]
    pub const fn related_fields(mut self, f: fn() -> &'static [PropertyInfo]) -> Self {
        self.related_fields_fn = f;
        self
    }

    /// Provide the related type's relationship metadata function.
    #[must_use]
    pub const fn related_relations(mut self, f: fn() -> &'static [RelationInfo]) -> Self {
        self.related_relations_fn = f;
        self
    }
}

/// Find a relationship by property name in a metadata table.
#[must_use]
pub fn find_relation<'a>(
    relations: &'a [RelationInfo],
    name: &str,
) -> Option<&'a RelationInfo> {
    relations.iter().find(|r| r.name == name)
}

/// Classify a collection property as one-to-many or many-to-many.
///
/// Resolution order, first match wins:
/// 1. a non-collection property is an argument error;
/// 2. an explicitly declared inverse property is resolved on the related
///    type; by convention, any collection on the related type pointing
///    back at the owner's table serves as the reciprocal otherwise;
/// 3. a reciprocal collection means many-to-many;
/// 4. else a foreign key on the related type pointing back at the owner
///    means one-to-many; with no such key the relationship needs a
///    junction table and falls back to many-to-many.
pub fn classify(owner_table: &str, relation: &RelationInfo) -> Result<RelationKind> {
    if !relation.collection {
        return Err(Error::relationship(
            owner_table,
            relation.name,
            "property is not a collection",
        ));
    }

    let related_relations = (relation.related_relations_fn)();

    let reciprocal = match relation.inverse_of {
        Some(inverse) => {
            let found = find_relation(related_relations, inverse);
            if found.is_none() {
                return Err(Error::relationship(
                    owner_table,
                    relation.name,
                    format!(
                        "declared inverse `{}` does not exist on `{}`",
                        inverse, relation.related_table
                    ),
                ));
            }
            found
        }
        None => related_relations
            .iter()
            .find(|r| r.collection && r.related_table == owner_table),
    };

    if let Some(reciprocal) = reciprocal {
        if reciprocal.collection {
            return Ok(RelationKind::ManyToMany);
        }
    }

    let related_fields = (relation.related_fields_fn)();
    let has_back_fk = related_fields.iter().any(|f| {
        f.foreign_key_parts()
            .is_some_and(|(table, _)| table == owner_table)
    });

    if has_back_fk {
        Ok(RelationKind::OneToMany)
    } else {
        // No direct foreign key exists, so membership must live in a
        // junction table.
        Ok(RelationKind::ManyToMany)
    }
}

/// Maximum identifier length for the legacy dialect family.
pub const MAX_IDENTIFIER_LEN: usize = 30;

/// Maximum table-name length used when deriving junction key columns.
const KEY_COLUMN_STEM_LEN: usize = 27;

/// Final truncation applied when even the shortened junction name would
/// exceed the identifier budget.
const SHORT_NAME_LEN: usize = 20;

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Derive the junction key column for one side: `ID_` plus the table name
/// truncated to 27 characters, keeping the full column within the
/// 30-character identifier budget.
#[must_use]
pub fn junction_key_column(table: &str) -> String {
    format!("ID_{}", truncate(table, KEY_COLUMN_STEM_LEN))
}

/// Derive the junction table name for a many-to-many relationship.
///
/// Both sides are uppercased, ordered lexicographically, and joined with
/// `to`, so both directions of a bidirectional relationship derive the
/// same table. When the result exceeds the 30-character budget each side
/// is truncated to 27 characters first, and if the shortened
/// concatenation still exceeds the budget the whole name is cut to 20
/// characters. The caller's [`NameRewriter`] applies last.
#[must_use]
pub fn junction_table_name(owner_table: &str, related_table: &str, rewriter: &NameRewriter) -> String {
    let mut left = owner_table.to_uppercase();
    let mut right = related_table.to_uppercase();
    if left > right {
        std::mem::swap(&mut left, &mut right);
    }

    let mut name = format!("{}to{}", left, right);
    if name.chars().count() > MAX_IDENTIFIER_LEN {
        name = format!(
            "{}to{}",
            truncate(&left, KEY_COLUMN_STEM_LEN),
            truncate(&right, KEY_COLUMN_STEM_LEN)
        );
        if name.chars().count() > MAX_IDENTIFIER_LEN {
            name = truncate(&name, SHORT_NAME_LEN).to_string();
        }
    }

    rewriter.apply(&name)
}

/// A fully resolved junction table: name plus both key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionTable {
    /// Junction table name
    pub table_name: String,
    /// Column referencing the owning side's primary key
    pub local_column: String,
    /// Column referencing the related side's primary key
    pub remote_column: String,
}

/// Resolve the junction table for a many-to-many relationship.
///
/// A static [`LinkTableInfo`] override wins; otherwise the name and key
/// columns are derived from the two table names.
#[must_use]
pub fn junction_for(
    owner_table: &str,
    relation: &RelationInfo,
    rewriter: &NameRewriter,
) -> JunctionTable {
    if let Some(link) = relation.link_table {
        return JunctionTable {
            table_name: link.table_name.to_string(),
            local_column: link.local_column.to_string(),
            remote_column: link.remote_column.to_string(),
        };
    }
    JunctionTable {
        table_name: junction_table_name(owner_table, relation.related_table, rewriter),
        local_column: junction_key_column(owner_table),
        remote_column: junction_key_column(relation.related_table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    // users <-> groups is bidirectional with declared inverses, so it
    // must classify as many-to-many from either side.
    static USER_FIELDS: &[PropertyInfo] = &[
        PropertyInfo::new("id", "id", ScalarType::BigInt).primary_key(true),
        PropertyInfo::new("name", "name", ScalarType::String),
    ];

    static GROUP_FIELDS: &[PropertyInfo] = &[
        PropertyInfo::new("id", "id", ScalarType::BigInt).primary_key(true),
        PropertyInfo::new("title", "title", ScalarType::String),
    ];

    fn user_fields() -> &'static [PropertyInfo] {
        USER_FIELDS
    }

    fn group_fields() -> &'static [PropertyInfo] {
        GROUP_FIELDS
    }

    fn user_relations() -> &'static [RelationInfo] {
        static RELS: &[RelationInfo] = &[RelationInfo::new("groups", "groups")
            .collection(true)
            .inverse_of("users")
            .related_fields(group_fields)
            .related_relations(group_relations)];
        RELS
    }

    fn group_relations() -> &'static [RelationInfo] {
        static RELS: &[RelationInfo] = &[RelationInfo::new("users", "users")
            .collection(true)
            .inverse_of("groups")
            .related_fields(user_fields)
            .related_relations(user_relations)];
        RELS
    }

    // orders -> items where the item carries order_id back to the order,
    // the classic one-to-many shape.
    static ITEM_FIELDS: &[PropertyInfo] = &[
        PropertyInfo::new("id", "id", ScalarType::BigInt).primary_key(true),
        PropertyInfo::new("order_id", "order_id", ScalarType::BigInt).foreign_key("orders.id"),
    ];

    fn item_fields() -> &'static [PropertyInfo] {
        ITEM_FIELDS
    }

    fn no_relations() -> &'static [RelationInfo] {
        &[]
    }

    #[test]
    fn test_classify_many_to_many_via_declared_inverse() {
        let rel = &user_relations()[0];
        assert_eq!(classify("users", rel).unwrap(), RelationKind::ManyToMany);
    }

    #[test]
    fn test_classify_one_to_many_via_back_fk() {
        let rel = RelationInfo::new("items", "items")
            .collection(true)
            .remote_fk("order_id")
            .related_fields(item_fields)
            .related_relations(no_relations);
        assert_eq!(classify("orders", &rel).unwrap(), RelationKind::OneToMany);
    }

    #[test]
    fn test_classify_convention_reciprocal_collection() {
        // No declared inverse; the related type has a collection pointing
        // back at the owner's table.
        fn tag_relations() -> &'static [RelationInfo] {
            static RELS: &[RelationInfo] =
                &[RelationInfo::new("posts", "posts").collection(true)];
            RELS
        }
        let rel = RelationInfo::new("tags", "tags")
            .collection(true)
            .related_fields(group_fields)
            .related_relations(tag_relations);
        assert_eq!(classify("posts", &rel).unwrap(), RelationKind::ManyToMany);
    }

    #[test]
    fn test_classify_fallback_many_to_many() {
        // No reciprocal property and no back-pointing key: membership has
        // to live in a junction table.
        let rel = RelationInfo::new("labels", "labels")
            .collection(true)
            .related_fields(group_fields)
            .related_relations(no_relations);
        assert_eq!(classify("tickets", &rel).unwrap(), RelationKind::ManyToMany);
    }

    #[test]
    fn test_classify_rejects_non_collection() {
        let rel = RelationInfo::new("team", "teams").local_fk("team_id");
        let err = classify("heroes", &rel).unwrap_err();
        assert!(matches!(err, Error::Relationship(_)));
    }

    #[test]
    fn test_classify_rejects_unresolvable_inverse() {
        let rel = RelationInfo::new("groups", "groups")
            .collection(true)
            .inverse_of("nonexistent")
            .related_fields(group_fields)
            .related_relations(group_relations);
        let err = classify("users", &rel).unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_junction_key_column_truncates_to_27() {
        let col = junction_key_column("a_very_long_table_name_that_keeps_going");
        assert_eq!(col, format!("ID_{}", "a_very_long_table_name_that"));
        assert_eq!(col.len(), 30);
    }

    #[test]
    fn test_junction_table_name_short_sides() {
        let name = junction_table_name("users", "groups", &NameRewriter::new());
        assert_eq!(name, "GROUPStoUSERS");
    }

    #[test]
    fn test_junction_table_name_side_independent() {
        // Either side of a bidirectional relationship must land on the
        // same junction table.
        let rw = NameRewriter::new();
        assert_eq!(
            junction_table_name("users", "groups", &rw),
            junction_table_name("groups", "users", &rw),
        );
    }

    #[test]
    fn test_junction_table_name_truncated_when_over_budget() {
        let name = junction_table_name(
            "extremely_long_owner_table_name",
            "extremely_long_related_table",
            &NameRewriter::new(),
        );
        assert_eq!(name.chars().count(), 20);
    }

    #[test]
    fn test_junction_table_name_applies_rewriter() {
        let rw = NameRewriter::new().replace("USERS", "APP_USERS");
        let name = junction_table_name("users", "groups", &rw);
        assert_eq!(name, "GROUPStoAPP_USERS");
    }

    #[test]
    fn test_junction_for_prefers_override() {
        let rel = RelationInfo::new("groups", "groups")
            .collection(true)
            .link_table(LinkTableInfo::new("user_groups", "user_id", "group_id"));
        let junction = junction_for("users", &rel, &NameRewriter::new());
        assert_eq!(junction.table_name, "user_groups");
        assert_eq!(junction.local_column, "user_id");
        assert_eq!(junction.remote_column, "group_id");
    }

    #[test]
    fn test_junction_for_derived_names() {
        let rel = RelationInfo::new("groups", "groups").collection(true);
        let junction = junction_for("users", &rel, &NameRewriter::new());
        assert_eq!(junction.table_name, "GROUPStoUSERS");
        assert_eq!(junction.local_column, "ID_users");
        assert_eq!(junction.remote_column, "ID_groups");
    }

    #[test]
    fn test_find_relation() {
        assert!(find_relation(user_relations(), "groups").is_some());
        assert!(find_relation(user_relations(), "powers").is_none());
    }
}
