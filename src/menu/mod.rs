//! Hierarchical command menus.

pub mod descriptor;
pub mod navigator;
pub mod ordering;
pub mod selection;
pub mod tree;
pub mod view;

pub use descriptor::{CommandDescriptor, Flow, Handler, Invocation};
pub use navigator::{MenuSession, SessionOutcome};
pub use ordering::{GroupOrdering, GroupStyle};
pub use selection::{Choice, SelectionAction, SelectionState};
pub use tree::{build, MenuNode, MenuTree, NodeId, NodeKind, TreeBuild};
