//! Property extraction: the metadata pass over an entity instance.
//!
//! Extraction pairs each static [`PropertyInfo`] with the instance's
//! current value, producing the ordered descriptor list the statement
//! builders consume. Navigation properties are not part of the flat
//! column list by construction (they live in `Entity::RELATIONS`), which
//! keeps INSERT/UPDATE column sets scalar-only without a filtering flag.

use crate::entity::Entity;
use crate::error::Error;
use crate::property::{Property, PropertyInfo};
use crate::relation::RelationInfo;
use crate::value::Value;
use crate::Result;

/// Options controlling a metadata pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Include properties marked as not persisted.
    pub include_unmapped: bool,
}

impl ExtractOptions {
    /// Default options: unmapped properties are skipped.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_unmapped: false,
        }
    }

    /// Include unmapped properties in the descriptor list.
    #[must_use]
    pub const fn with_unmapped(mut self) -> Self {
        self.include_unmapped = true;
        self
    }
}

/// Extract the ordered property descriptors of an entity instance.
///
/// Descriptors are built fresh on every call and ordered by declaration.
/// Unmapped properties are skipped unless requested. An empty logical
/// name is a defensive [`Error::Mapping`]; so is a declared property the
/// instance produced no value for.
pub fn extract_properties<E: Entity>(entity: &E, opts: ExtractOptions) -> Result<Vec<Property>> {
    let row = entity.to_row();
    let mut out = Vec::with_capacity(E::fields().len());

    for info in E::fields() {
        if info.name.is_empty() {
            return Err(Error::mapping(
                E::TABLE_NAME,
                "property with an empty logical name",
            ));
        }
        if info.unmapped && !opts.include_unmapped {
            continue;
        }
        let value = row
            .iter()
            .find(|(name, _)| *name == info.name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                Error::mapping(
                    E::TABLE_NAME,
                    format!("no value produced for property `{}`", info.name),
                )
            })?;
        out.push(Property::new(info, value));
    }

    Ok(out)
}

/// A ready-to-query description of one referenced related row.
///
/// For every foreign-key-bearing navigation this captures the scalar key
/// value and the related side's primary key column, which is all the
/// inclusion resolver needs to issue a get-by-key statement.
#[derive(Debug, Clone)]
pub struct RelatedLookup {
    /// The navigation this lookup belongs to
    pub relation: &'static RelationInfo,
    /// The captured foreign key value on the owner
    pub key: Value,
    /// The related type's primary key column, when one is declared
    pub related_pk: Option<&'static str>,
}

impl RelatedLookup {
    /// Whether the captured key actually references a row.
    #[must_use]
    pub fn has_key(&self) -> bool {
        !self.key.is_default_key()
    }
}

/// Capture a lookup per foreign-key-bearing navigation property.
///
/// Used exclusively by the inclusion resolver. Relations without a local
/// foreign key column (inverse collections) are not included here; they
/// resolve through junction membership instead.
pub fn foreign_key_lookups<E: Entity>(entity: &E) -> Vec<RelatedLookup> {
    let row = entity.to_row();
    let fields = E::fields();

    E::RELATIONS
        .iter()
        .filter_map(|relation| {
            let fk_column = relation.local_fk?;
            let field = fields.iter().find(|f| f.column_name == fk_column)?;
            let key = row
                .iter()
                .find(|(name, _)| *name == field.name)
                .map_or(Value::Null, |(_, value)| value.clone());
            let related_pk = (relation.related_fields_fn)()
                .iter()
                .find(|f| f.primary_key)
                .map(|f| f.column_name);
            Some(RelatedLookup {
                relation,
                key,
                related_pk,
            })
        })
        .collect()
}
