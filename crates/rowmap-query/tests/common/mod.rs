//! Shared fixtures: a scripted executor and a small entity graph.

#![allow(dead_code)]

use std::collections::VecDeque;

use rowmap_core::{
    Entity, PropertyInfo, RelationInfo, Result, Row, ScalarType, SqlExecutor, Value,
};

/// One recorded executor call.
#[derive(Debug, Clone)]
pub struct Call {
    pub kind: &'static str,
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

/// A scripted in-memory executor.
///
/// Queries answer from a queue of canned result sets; executes report
/// from a queue of affected-row counts (default 1). A `fail_on`
/// substring injects an execution error, and every call plus every
/// transaction verb is recorded for assertions.
pub struct MockExecutor {
    pub calls: Vec<Call>,
    pub tx: Vec<&'static str>,
    pub query_results: VecDeque<Vec<Row>>,
    pub affected: VecDeque<u64>,
    pub fail_on: Option<&'static str>,
    pub next_key: i64,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            tx: Vec::new(),
            query_results: VecDeque::new(),
            affected: VecDeque::new(),
            fail_on: None,
            next_key: 42,
        }
    }

    pub fn queue_rows(&mut self, rows: Vec<Row>) {
        self.query_results.push_back(rows);
    }

    fn record(&mut self, kind: &'static str, sql: &str, params: &[(String, Value)]) {
        self.calls.push(Call {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }

    fn check_failure(&self, sql: &str) -> Result<()> {
        if let Some(marker) = self.fail_on {
            if sql.contains(marker) {
                return Err(rowmap_core::Error::execution_sql(sql, "injected failure"));
            }
        }
        Ok(())
    }
}

impl SqlExecutor for MockExecutor {
    fn query(&mut self, sql: &str, params: &[(String, Value)]) -> Result<Vec<Row>> {
        self.record("query", sql, params);
        self.check_failure(sql)?;
        Ok(self.query_results.pop_front().unwrap_or_default())
    }

    fn execute(&mut self, sql: &str, params: &[(String, Value)]) -> Result<u64> {
        self.record("execute", sql, params);
        self.check_failure(sql)?;
        Ok(self.affected.pop_front().unwrap_or(1))
    }

    fn insert(&mut self, sql: &str, params: &[(String, Value)]) -> Result<Value> {
        self.record("insert", sql, params);
        self.check_failure(sql)?;
        Ok(Value::BigInt(self.next_key))
    }

    fn begin(&mut self) -> Result<()> {
        self.tx.push("BEGIN");
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.tx.push("COMMIT");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.tx.push("ROLLBACK");
        Ok(())
    }
}

// users <-> groups, bidirectional many-to-many.

static USER_FIELDS: &[PropertyInfo] = &[
    PropertyInfo::new("id", "id", ScalarType::BigInt)
        .primary_key(true)
        .auto_generated(true),
    PropertyInfo::new("name", "name", ScalarType::String)
        .required(true)
        .length(2, 80),
    PropertyInfo::new("email", "email", ScalarType::String).nullable(true),
];

static GROUP_FIELDS: &[PropertyInfo] = &[
    PropertyInfo::new("id", "id", ScalarType::BigInt)
        .primary_key(true)
        .auto_generated(true),
    PropertyInfo::new("title", "title", ScalarType::String).required(true),
];

pub fn user_fields() -> &'static [PropertyInfo] {
    USER_FIELDS
}

pub fn group_fields() -> &'static [PropertyInfo] {
    GROUP_FIELDS
}

pub fn user_relations() -> &'static [RelationInfo] {
    User::RELATIONS
}

pub fn group_relations() -> &'static [RelationInfo] {
    Group::RELATIONS
}

#[derive(Debug, Default)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub group_ids: Vec<i64>,
    pub groups: Vec<Group>,
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const RELATIONS: &'static [RelationInfo] = &[RelationInfo::new("groups", "groups")
        .collection(true)
        .inverse_of("users")
        .related_fields(group_fields)
        .related_relations(group_relations)];

    fn fields() -> &'static [PropertyInfo] {
        USER_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("email", self.email.clone().into()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            name: row.get_named("name")?,
            email: row.get_named("email")?,
            group_ids: Vec::new(),
            groups: Vec::new(),
        })
    }

    fn primary_key_value(&self) -> Value {
        self.id.into()
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn link_rows(&self) -> Vec<(&'static str, Vec<Value>)> {
        vec![(
            "groups",
            self.group_ids.iter().map(|id| Value::BigInt(*id)).collect(),
        )]
    }

    fn apply_related(&mut self, relation: &'static str, rows: Vec<Row>) -> Result<()> {
        if relation == "groups" {
            self.groups = rows.iter().map(Group::from_row).collect::<Result<_>>()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Group {
    pub id: Option<i64>,
    pub title: String,
}

impl Entity for Group {
    const TABLE_NAME: &'static str = "groups";
    const RELATIONS: &'static [RelationInfo] = &[RelationInfo::new("users", "users")
        .collection(true)
        .inverse_of("groups")
        .related_fields(user_fields)
        .related_relations(user_relations)];

    fn fields() -> &'static [PropertyInfo] {
        GROUP_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("id", self.id.into()), ("title", self.title.as_str().into())]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            title: row.get_named("title")?,
        })
    }

    fn primary_key_value(&self) -> Value {
        self.id.into()
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// orders -> order_items, one-to-many through order_id.

static ORDER_FIELDS: &[PropertyInfo] = &[
    PropertyInfo::new("id", "id", ScalarType::BigInt)
        .primary_key(true)
        .auto_generated(true),
    PropertyInfo::new("customer", "customer", ScalarType::String).required(true),
];

static ITEM_FIELDS: &[PropertyInfo] = &[
    PropertyInfo::new("id", "id", ScalarType::BigInt)
        .primary_key(true)
        .auto_generated(true),
    PropertyInfo::new("order_id", "order_id", ScalarType::BigInt)
        .nullable(true)
        .foreign_key("orders.id"),
    PropertyInfo::new("sku", "sku", ScalarType::String).required(true),
];

pub fn order_fields() -> &'static [PropertyInfo] {
    ORDER_FIELDS
}

pub fn item_fields() -> &'static [PropertyInfo] {
    ITEM_FIELDS
}

pub fn no_relations() -> &'static [RelationInfo] {
    &[]
}

#[derive(Debug, Default)]
pub struct Order {
    pub id: Option<i64>,
    pub customer: String,
    pub items: Vec<OrderItem>,
}

impl Entity for Order {
    const TABLE_NAME: &'static str = "orders";
    const RELATIONS: &'static [RelationInfo] = &[RelationInfo::new("items", "order_items")
        .collection(true)
        .remote_fk("order_id")
        .related_fields(item_fields)
        .related_relations(no_relations)];

    fn fields() -> &'static [PropertyInfo] {
        ORDER_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("customer", self.customer.as_str().into()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            customer: row.get_named("customer")?,
            items: Vec::new(),
        })
    }

    fn primary_key_value(&self) -> Value {
        self.id.into()
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn apply_related(&mut self, relation: &'static str, rows: Vec<Row>) -> Result<()> {
        if relation == "items" {
            self.items = rows.iter().map(OrderItem::from_row).collect::<Result<_>>()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct OrderItem {
    pub id: Option<i64>,
    pub order_id: Option<i64>,
    pub sku: String,
    pub order: Option<Order>,
}

impl Entity for OrderItem {
    const TABLE_NAME: &'static str = "order_items";
    const RELATIONS: &'static [RelationInfo] = &[RelationInfo::new("order", "orders")
        .local_fk("order_id")
        .related_fields(order_fields)
        .related_relations(no_relations)];

    fn fields() -> &'static [PropertyInfo] {
        ITEM_FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("order_id", self.order_id.into()),
            ("sku", self.sku.as_str().into()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            order_id: row.get_named("order_id")?,
            sku: row.get_named("sku")?,
            order: None,
        })
    }

    fn primary_key_value(&self) -> Value {
        self.id.into()
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn apply_related(&mut self, relation: &'static str, rows: Vec<Row>) -> Result<()> {
        if relation == "order" {
            if let Some(row) = rows.first() {
                self.order = Some(Order::from_row(row)?);
            }
        }
        Ok(())
    }
}
