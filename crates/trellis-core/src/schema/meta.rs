use super::{ClassDecl, PropertyMeta};
use crate::{bail, Result};

/// Aggregated mapping metadata for one entity class.
///
/// Built once per class from its [`ClassDecl`] and cached for the process
/// lifetime by the registry; immutable after construction.
#[derive(Debug)]
pub struct EntityMeta {
    name: String,
    primary_key: PropertyMeta,
    properties: Vec<PropertyMeta>,
    indexed: Vec<usize>,
    many_to_one: Vec<PropertyMeta>,
    many_to_many: Vec<PropertyMeta>,
}

/// Accessor prefixes recognized when resolving a dynamic accessor name back
/// to a property. Longest first, so `find_by_title` is not consumed by
/// `find`.
const VERBS: [&str; 6] = ["find_one_by", "find_by", "find", "get", "set", "add"];

impl EntityMeta {
    /// Builds metadata from a class declaration.
    ///
    /// Fails when the class is not annotated as an entity, or when it does
    /// not declare exactly one auto identity member. Hydrated handles are
    /// values of the mapped type itself, so the same declaration covers both
    /// fresh and store-loaded instances.
    pub fn from_decl(decl: &ClassDecl) -> Result<Self> {
        if !decl.entity {
            bail!("class `{}` is not declared as an entity", decl.name);
        }

        let mut primary_key = None;
        let mut properties = Vec::new();
        let mut indexed = Vec::new();
        let mut many_to_one = Vec::new();
        let mut many_to_many = Vec::new();

        for member in &decl.members {
            let Some(property) = PropertyMeta::from_member(member) else {
                continue;
            };

            if property.is_primary_key() {
                if primary_key.is_some() {
                    bail!(
                        "entity `{}` declares more than one auto identity property",
                        decl.name
                    );
                }
                primary_key = Some(property);
            } else if property.is_scalar() {
                if property.is_indexed() {
                    indexed.push(properties.len());
                }
                properties.push(property);
            } else if property.is_relation_list() {
                many_to_many.push(property);
            } else {
                many_to_one.push(property);
            }
        }

        let Some(primary_key) = primary_key else {
            bail!("entity `{}` declares no auto identity property", decl.name);
        };

        Ok(Self {
            name: decl.name.clone(),
            primary_key,
            properties,
            indexed,
            many_to_one,
            many_to_many,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &PropertyMeta {
        &self.primary_key
    }

    /// Scalar properties, in declaration order.
    pub fn properties(&self) -> &[PropertyMeta] {
        &self.properties
    }

    /// The subset of scalar properties flagged for index-backed lookup.
    pub fn indexed_properties(&self) -> impl Iterator<Item = &PropertyMeta> {
        self.indexed.iter().map(|&i| &self.properties[i])
    }

    pub fn many_to_one_relations(&self) -> &[PropertyMeta] {
        &self.many_to_one
    }

    pub fn many_to_many_relations(&self) -> &[PropertyMeta] {
        &self.many_to_many
    }

    /// All relation properties, lists first.
    pub fn relations(&self) -> impl Iterator<Item = &PropertyMeta> {
        self.many_to_many.iter().chain(self.many_to_one.iter())
    }

    /// Exact-name lookup across relation buckets.
    pub fn relation(&self, name: &str) -> Option<&PropertyMeta> {
        self.relations().find(|p| p.name == name)
    }

    /// Resolves a dynamically-invoked accessor name (`get_title`,
    /// `find_by_code`, or a bare property name) to the property it refers
    /// to.
    ///
    /// Scan order is scalar properties, then relation lists, then single
    /// relations; the first match wins. Returns `None` when nothing matches;
    /// callers decide how loud to be about it.
    pub fn find_property(&self, accessor: &str) -> Option<&PropertyMeta> {
        let suffix = strip_verb(accessor);

        self.properties
            .iter()
            .chain(self.many_to_many.iter())
            .chain(self.many_to_one.iter())
            .find(|p| p.matches(suffix))
    }
}

/// Splits a requested accessor name into verb and property suffix, returning
/// the suffix. A verb only counts when it is followed by an underscore or a
/// camel-case boundary, so property names like `settings` survive intact.
fn strip_verb(accessor: &str) -> &str {
    for verb in VERBS {
        let Some(rest) = accessor.strip_prefix(verb) else {
            continue;
        };

        if let Some(rest) = rest.strip_prefix('_') {
            if !rest.is_empty() {
                return rest;
            }
        } else if rest.chars().next().is_some_and(char::is_uppercase) {
            return rest;
        }
    }

    accessor
}
