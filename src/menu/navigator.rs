//! Interactive menu session.
//!
//! Each menu level runs its own loop on the call stack: selecting a group
//! recurses, "back" returns. Cancellation unwinds every level with `?`, and
//! the cursor guard taken for each navigation phase is released on the way.

use crate::error::{Cancelled, InteractionError};
use crate::menu::descriptor::Flow;
use crate::menu::selection::{Choice, SelectionAction, SelectionState};
use crate::menu::tree::{MenuTree, NodeId};
use crate::menu::view;
use crate::runtime::Console;
use crate::widgets::pause::wait_for_enter;

/// How the outermost loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    CancelledByUser,
    CancelledBySignal,
}

pub struct MenuSession {
    tree: MenuTree,
}

impl MenuSession {
    pub fn new(tree: MenuTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// Run from the root until the user leaves it. Only terminal I/O failures
    /// come back as `Err`.
    pub fn run(&mut self, console: &mut Console) -> Result<SessionOutcome, InteractionError> {
        tracing::info!(nodes = self.tree.len(), "menu session started");
        let root = self.tree.root();
        let outcome = match self.run_level(console, root) {
            Ok(()) => SessionOutcome::Completed,
            Err(InteractionError::Cancelled(Cancelled::ByUser)) => SessionOutcome::CancelledByUser,
            Err(InteractionError::Cancelled(Cancelled::BySignal)) => {
                SessionOutcome::CancelledBySignal
            }
            Err(err) => return Err(err),
        };
        tracing::info!(?outcome, "menu session ended");
        Ok(outcome)
    }

    fn run_level(&mut self, console: &mut Console, node: NodeId) -> Result<(), InteractionError> {
        let has_parent = self.tree.parent(node).is_some();
        let mut state = SelectionState::new(self.tree.children(node).len(), has_parent);

        loop {
            let choice = self.choose(console, node, &mut state)?;
            let child = match choice {
                Choice::Back => return Ok(()),
                Choice::Child(index) => self.tree.children(node)[index],
            };
            if self.tree.node(child).is_group() {
                self.run_level(console, child)?;
            } else if self.run_leaf(console, child)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Paint the level and read keys until a row is chosen.
    fn choose(
        &self,
        console: &mut Console,
        node: NodeId,
        state: &mut SelectionState,
    ) -> Result<Choice, InteractionError> {
        let mut console = console.hidden_cursor()?;
        view::paint_level(&mut console, &self.tree, node, state);

        loop {
            match state.apply(console.read_key()?) {
                SelectionAction::Moved => view::redraw_list(&mut console, &self.tree, node, state),
                SelectionAction::Chosen(choice) => return Ok(choice),
                SelectionAction::Cancel => return Err(Cancelled::ByUser.into()),
                SelectionAction::Ignored => {}
            }
        }
    }

    fn run_leaf(&mut self, console: &mut Console, id: NodeId) -> Result<Flow, InteractionError> {
        let Some(command) = self.tree.leaf_mut(id) else {
            return Ok(Flow::Continue);
        };
        tracing::info!(command = %command.id, "running command");

        let flow = match command.invoke(console) {
            Ok(flow) => flow,
            Err(err) => {
                report_handler_error(console, err)?;
                Flow::Continue
            }
        };
        if flow == Flow::Exit {
            return Ok(Flow::Exit);
        }
        if console.pause_after_action() {
            wait_for_enter(console)?;
        }
        Ok(Flow::Continue)
    }
}

/// Report a failed handler inline. Signal cancellation and terminal failures
/// are not the handler's to absorb and propagate.
fn report_handler_error(console: &mut Console, err: anyhow::Error) -> Result<(), InteractionError> {
    let cancelled = err.downcast_ref::<Cancelled>().copied().or_else(|| {
        err.downcast_ref::<InteractionError>()
            .and_then(InteractionError::cancelled)
    });

    match cancelled {
        Some(Cancelled::BySignal) => return Err(Cancelled::BySignal.into()),
        Some(Cancelled::ByUser) => {
            tracing::info!("command cancelled by user");
            let rule = "=".repeat(60);
            console.blank_line();
            console.line(&rule);
            console.line("  ⏹️  Action cancelled");
            console.line(&rule);
        }
        None => match err.downcast::<InteractionError>() {
            Ok(fatal) => return Err(fatal),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "command handler failed");
                console.blank_line();
                console.line(format!("❌ Error executing action: {err}"));
            }
        },
    }
    Ok(())
}
