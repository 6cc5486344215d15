pub mod entity;
pub use entity::{AnyRef, Entity, Ref};

mod event;
pub use event::Event;

pub mod manager;
pub use manager::EntityManager;

mod proxy;
pub use proxy::{LoadContext, ProxyFactory};

mod query;
pub use query::ParamQuery;

mod registry;
pub use registry::MetaRegistry;

pub mod relation;
pub use relation::{Many, One};

pub mod repository;
pub use repository::{EntityRepository, NodeRepository};

pub use trellis_core::{
    driver::{self, NodeId, Store},
    schema::{self, ClassDecl, Direction, EntityMeta, MemberDecl, RelationDecl},
    Error, Result, Value,
};
