mod decl;
pub use decl::{Annotation, ClassDecl, Direction, MemberDecl, RelationDecl};

mod meta;
pub use meta::EntityMeta;

mod property;
pub use property::{PropertyKind, PropertyMeta, RelationMeta};
