//! Menu tree built from flat descriptors.
//!
//! Nodes live in an arena owned by [`MenuTree`] and refer to each other by
//! [`NodeId`]. A child's `parent` link is only used for "go back"; ownership
//! stays with the arena. The tree is immutable after [`build`] apart from leaf
//! handler state.

use std::collections::HashMap;

use crate::error::StructuralError;
use crate::menu::descriptor::CommandDescriptor;
use crate::menu::ordering::GroupOrdering;

/// Stable identifier for a node within one [`MenuTree`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn raw(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct Group {
    pub title: String,
    pub icon: Option<String>,
    /// Cumulative path, empty for the root.
    pub path: String,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub enum NodeKind {
    Leaf(CommandDescriptor),
    Group(Group),
}

#[derive(Debug)]
pub struct MenuNode {
    /// Key within the parent: the command id, or the group's path segment.
    pub key: String,
    pub order: i64,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl MenuNode {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Row label: icon prefix, and a trailing ` >` for groups.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Leaf(cmd) => cmd.display_label(),
            NodeKind::Group(group) => match &group.icon {
                Some(icon) => format!("{icon} {} >", group.title),
                None => format!("{} >", group.title),
            },
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(cmd) => cmd.description.as_deref(),
            NodeKind::Group(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

/// A built tree plus every descriptor that was rejected.
#[derive(Debug)]
pub struct TreeBuild {
    pub tree: MenuTree,
    pub errors: Vec<StructuralError>,
}

impl MenuTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered children of a group; empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Group(group) => &group.children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Header title: the group title, or the leaf label.
    pub fn title(&self, id: NodeId) -> &str {
        match &self.node(id).kind {
            NodeKind::Group(group) => &group.title,
            NodeKind::Leaf(cmd) => &cmd.label,
        }
    }

    pub fn child_by_key(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).key == key)
    }

    /// Resolve a dotted group path (`""` is the root).
    pub fn find_group(&self, path: &str) -> Option<NodeId> {
        let segments = split_group_path(Some(path)).ok()?;
        segments
            .iter()
            .try_fold(self.root(), |node, segment| self.child_by_key(node, segment))
            .filter(|&id| self.node(id).is_group())
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Option<&mut CommandDescriptor> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Leaf(cmd) => Some(cmd),
            NodeKind::Group(_) => None,
        }
    }

    fn push(&mut self, node: MenuNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = node.parent;
        self.nodes.push(node);
        if let Some(NodeKind::Group(group)) = parent.map(|p| &mut self.nodes[p.0].kind) {
            group.children.push(id);
        }
        id
    }

    fn sort_children(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = match &self.nodes[index].kind {
                NodeKind::Group(group) => group.children.clone(),
                NodeKind::Leaf(_) => continue,
            };
            children.sort_by(|a, b| {
                let (a, b) = (&self.nodes[a.0], &self.nodes[b.0]);
                (a.order, &a.key).cmp(&(b.order, &b.key))
            });
            if let NodeKind::Group(group) = &mut self.nodes[index].kind {
                group.children = children;
            }
        }
    }
}

/// Merge `descriptors` into a tree rooted at a group titled `title`.
///
/// Intermediate groups are keyed by cumulative path, so `Tools.A` and `Tools.B`
/// share one `Tools` group. Children are ordered by `(order, key)`; group
/// order comes from `ordering` and defaults to trailing. A descriptor whose
/// id collides with a sibling, or whose path has an empty segment, is skipped
/// and reported.
pub fn build(
    title: impl Into<String>,
    descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ordering: &GroupOrdering,
) -> TreeBuild {
    let mut tree = MenuTree {
        nodes: vec![MenuNode {
            key: String::new(),
            order: 0,
            parent: None,
            kind: NodeKind::Group(Group {
                title: title.into(),
                icon: None,
                path: String::new(),
                children: Vec::new(),
            }),
        }],
    };
    let mut groups: HashMap<String, NodeId> = HashMap::new();
    let mut errors = Vec::new();

    for descriptor in descriptors {
        match attach(&mut tree, &mut groups, descriptor, ordering) {
            Ok(id) => tracing::debug!(node = id.raw(), "menu node attached"),
            Err(err) => {
                tracing::warn!(error = %err, "skipping command descriptor");
                errors.push(err);
            }
        }
    }

    tree.sort_children();
    TreeBuild { tree, errors }
}

fn attach(
    tree: &mut MenuTree,
    groups: &mut HashMap<String, NodeId>,
    descriptor: CommandDescriptor,
    ordering: &GroupOrdering,
) -> Result<NodeId, StructuralError> {
    let segments = split_group_path(descriptor.group.as_deref()).map_err(|()| {
        StructuralError::MalformedGroupPath {
            id: descriptor.id.clone(),
            path: descriptor.group.clone().unwrap_or_default(),
        }
    })?;

    // Walk the groups that already exist, then check the rest can be created
    // without shadowing a leaf.
    let mut parent = tree.root();
    let mut existing = 0;
    for (depth, segment) in segments.iter().enumerate() {
        let path = segments[..=depth].join(".");
        match groups.get(&path) {
            Some(&id) => {
                parent = id;
                existing += 1;
            }
            None => {
                if tree.child_by_key(parent, segment).is_some() {
                    return Err(duplicate(tree, parent, segment));
                }
                break;
            }
        }
    }
    if existing == segments.len() && tree.child_by_key(parent, &descriptor.id).is_some() {
        return Err(duplicate(tree, parent, &descriptor.id));
    }

    for depth in existing..segments.len() {
        let path = segments[..=depth].join(".");
        let segment = &segments[depth];
        let id = tree.push(MenuNode {
            key: segment.clone(),
            order: ordering.order_of(&path),
            parent: Some(parent),
            kind: NodeKind::Group(Group {
                title: ordering.name_of(&path, segment).to_string(),
                icon: ordering.icon_of(&path).map(str::to_string),
                path: path.clone(),
                children: Vec::new(),
            }),
        });
        groups.insert(path, id);
        parent = id;
    }

    Ok(tree.push(MenuNode {
        key: descriptor.id.clone(),
        order: descriptor.order,
        parent: Some(parent),
        kind: NodeKind::Leaf(descriptor),
    }))
}

fn duplicate(tree: &MenuTree, parent: NodeId, id: &str) -> StructuralError {
    let parent = match &tree.node(parent).kind {
        NodeKind::Group(group) if !group.path.is_empty() => group.path.clone(),
        _ => "<root>".to_string(),
    };
    StructuralError::DuplicateId {
        parent,
        id: id.to_string(),
    }
}

/// Split a dotted path into trimmed segments. A missing or blank path is the
/// root; any blank segment is an error.
fn split_group_path(path: Option<&str>) -> Result<Vec<String>, ()> {
    let path = match path.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(path) => path,
    };
    path.split('.')
        .map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                Err(())
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}
