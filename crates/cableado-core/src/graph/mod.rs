//! Live-mutable patch graph with snapshot publication.
//!
//! The graph module uses a **two-object split**:
//!
//! - [`PatchGraph`] — owned by the interaction thread. Holds the node
//!   registry and the authoritative edge set, performs all mutations,
//!   and republishes an [`EdgeSnapshot`] after each one.
//! - [`EdgeSnapshot`] — immutable copy shared with the render thread
//!   through a [`RenderReader`] (`ArcSwap` load, no lock). The render
//!   thread never sees partial state.
//!
//! Edits flow through the [`PatchGateway`], which wraps each accepted
//! mutation in a [`PatchCommand`] recorded in the [`UndoHistory`]
//! before it runs, and exposes the cooperative
//! [`SuppressionFlag`] scope that keeps notification handlers from
//! re-issuing the mutation they are reacting to.
//!
//! Change notifications are synchronous: the [`NotificationBus`]
//! invokes its subscribers on the mutating thread, in subscription
//! order, strictly after the mutation (and its snapshot) is visible.

pub mod bus;
pub mod command;
pub mod edge;
pub mod gateway;
pub mod node;
mod patch;
pub mod snapshot;
pub mod suppress;
pub mod undo;

pub use bus::{GraphEvent, NotificationBus, SubscriberId};
pub use command::PatchCommand;
pub use edge::Connection;
pub use gateway::{CommitStatus, PatchGateway};
pub use node::{NodeId, PortDir, PortKind, PortRef};
pub use patch::PatchGraph;
pub use snapshot::{EdgeSnapshot, RenderReader};
pub use suppress::{SuppressionFlag, SuppressionGuard};
pub use undo::UndoHistory;
