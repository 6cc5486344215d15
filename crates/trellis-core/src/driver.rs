mod record;
pub use record::{EdgeId, EdgeRecord, NodeId, NodeRecord};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use std::fmt::Debug;

/// The graph store transport.
///
/// The mapper treats the store as an external collaborator: it hands over
/// node/edge mutations and lookups one operation at a time and consumes the
/// opaque records that come back. Calls are synchronous; a failed operation
/// surfaces as-is, without retries and without wrapping, and there is no
/// cross-operation transaction.
pub trait Store: Debug + Send + Sync + 'static {
    /// Execute a store operation.
    fn exec(&self, op: Operation) -> crate::Result<Response>;
}
