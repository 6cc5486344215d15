use super::{Annotation, Direction, MemberDecl, RelationDecl};

use heck::ToSnakeCase;

/// Describes one declared member of an entity class.
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    /// The accessor-derived public name.
    pub name: String,

    /// Storage kind of the member.
    pub kind: PropertyKind,
}

#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// The auto-generated identity of the entity.
    PrimaryKey,

    /// A scalar node property.
    Scalar {
        /// True if the property is searchable through the store index.
        indexed: bool,
    },

    /// A single outgoing reference.
    ManyToOne(RelationMeta),

    /// A collection of references.
    ManyToMany(RelationMeta),
}

/// Edge shape shared by both relation kinds.
#[derive(Debug, Clone)]
pub struct RelationMeta {
    pub label: String,
    pub direction: Direction,
    pub read_only: bool,
    pub write_only: bool,
}

impl PropertyMeta {
    /// Classifies a declared member from its annotation set.
    ///
    /// Priority order: identity, then plain property, then relation list,
    /// then single relation. Members without any mapping annotation yield no
    /// metadata and are ignored by the mapper.
    pub fn from_member(member: &MemberDecl) -> Option<Self> {
        let kind = if member.has(|a| matches!(a, Annotation::Auto)) {
            PropertyKind::PrimaryKey
        } else if member.has(|a| matches!(a, Annotation::Property)) {
            PropertyKind::Scalar {
                indexed: member.has(|a| matches!(a, Annotation::Index)),
            }
        } else if let Some(relation) = member.relation_attrs(true) {
            PropertyKind::ManyToMany(relation.into())
        } else if let Some(relation) = member.relation_attrs(false) {
            PropertyKind::ManyToOne(relation.into())
        } else {
            return None;
        };

        Some(Self {
            name: member.name.clone(),
            kind,
        })
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(self.kind, PropertyKind::PrimaryKey)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, PropertyKind::Scalar { .. })
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.kind, PropertyKind::Scalar { indexed: true })
    }

    pub fn is_relation(&self) -> bool {
        matches!(
            self.kind,
            PropertyKind::ManyToOne(..) | PropertyKind::ManyToMany(..)
        )
    }

    pub fn is_relation_list(&self) -> bool {
        matches!(self.kind, PropertyKind::ManyToMany(..))
    }

    pub fn relation(&self) -> Option<&RelationMeta> {
        match &self.kind {
            PropertyKind::ManyToOne(relation) | PropertyKind::ManyToMany(relation) => {
                Some(relation)
            }
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_relation(&self) -> &RelationMeta {
        match self.relation() {
            Some(relation) => relation,
            None => panic!("expected relation property, but was {:?}", self.kind),
        }
    }

    /// Resolves a dynamically-requested accessor suffix against this
    /// property. Comparison is case-insensitive: the suffix is normalized to
    /// snake case first, so `MovieRegistryCode` matches a property declared
    /// as `movie_registry_code`.
    pub fn matches(&self, suffix: &str) -> bool {
        suffix.to_snake_case() == self.name.to_snake_case()
    }
}

impl MemberDecl {
    fn has(&self, pred: impl Fn(&Annotation) -> bool) -> bool {
        self.annotations.iter().any(pred)
    }

    fn relation_attrs(&self, list: bool) -> Option<&RelationDecl> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::ManyToMany(relation) if list => Some(relation),
            Annotation::ManyToOne(relation) if !list => Some(relation),
            _ => None,
        })
    }
}

impl From<&RelationDecl> for RelationMeta {
    fn from(decl: &RelationDecl) -> Self {
        Self {
            label: decl.label.clone(),
            direction: decl.direction,
            read_only: decl.read_only,
            write_only: decl.write_only,
        }
    }
}
