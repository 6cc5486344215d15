/// The declared shape of a mapped class, as yielded by the annotation
/// capability.
///
/// Rust has no runtime reflection, so the shape of an entity is registered
/// explicitly: an entity type hands the mapper one `ClassDecl` describing its
/// members and their annotations. This is the data a derive macro would emit;
/// it can just as well be written by hand.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Identifier of the mapped type. Doubles as the node label in the store.
    pub name: String,

    /// True if the class carries the `Entity` annotation. Types without it
    /// cannot be resolved into metadata.
    pub entity: bool,

    /// Declared members, in declaration order.
    pub members: Vec<MemberDecl>,
}

/// One declared member and the annotations attached to it.
#[derive(Debug, Clone)]
pub struct MemberDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

/// A member-level annotation: a name plus its attributes.
#[derive(Debug, Clone)]
pub enum Annotation {
    /// The auto-generated identity field. Exactly one per entity.
    Auto,

    /// A plain scalar property.
    Property,

    /// Marks a scalar property as searchable through the store index.
    Index,

    /// A single outgoing reference to another entity.
    ManyToOne(RelationDecl),

    /// A collection of references to other entities.
    ManyToMany(RelationDecl),
}

/// Attributes shared by the relation annotations.
#[derive(Debug, Clone)]
pub struct RelationDecl {
    /// Edge label in the store.
    pub label: String,

    /// Which way the edge points relative to the declaring entity.
    pub direction: Direction,

    /// Populated on load, never written back by a flush.
    pub read_only: bool,

    /// Written by a flush, never reported back on load.
    pub write_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Out,
    In,
}

impl ClassDecl {
    /// A class annotated as an entity.
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity: true,
            members: Vec::new(),
        }
    }

    /// A class without the `Entity` annotation. Resolving it fails.
    pub fn unannotated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity: false,
            members: Vec::new(),
        }
    }

    pub fn auto(self, name: impl Into<String>) -> Self {
        self.member(MemberDecl::new(name).annotate(Annotation::Auto))
    }

    pub fn property(self, name: impl Into<String>) -> Self {
        self.member(MemberDecl::new(name).annotate(Annotation::Property))
    }

    pub fn indexed_property(self, name: impl Into<String>) -> Self {
        self.member(
            MemberDecl::new(name)
                .annotate(Annotation::Property)
                .annotate(Annotation::Index),
        )
    }

    pub fn many_to_one(self, name: impl Into<String>, relation: RelationDecl) -> Self {
        self.member(MemberDecl::new(name).annotate(Annotation::ManyToOne(relation)))
    }

    pub fn many_to_many(self, name: impl Into<String>, relation: RelationDecl) -> Self {
        self.member(MemberDecl::new(name).annotate(Annotation::ManyToMany(relation)))
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }
}

impl MemberDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl RelationDecl {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            direction: Direction::Out,
            read_only: false,
            write_only: false,
        }
    }

    /// The edge points at the declaring entity instead of away from it.
    pub fn incoming(mut self) -> Self {
        self.direction = Direction::In;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }
}

impl Direction {
    /// The direction seen from the far end of the edge.
    pub fn reverse(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
        }
    }
}
