//! Resource tree of URL path segments
//!
//! Nodes live in an arena owned by [`RouteTree`] and are addressed by
//! [`NodeId`]. Resolving the same path twice yields the same id, which is
//! what lets many routes share one subtree.

use super::binding::{AuthorizationContext, AuthorizationMode, HandlerRef, MethodBinding};
use crate::error::{GrammyError, Result};
use crate::model::HttpMethod;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

const SEPARATOR: char = '/';

/// Index of a node inside the [`RouteTree`] that created it
///
/// Ids are only minted by a tree and are meaningless for any other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One path segment of the resource tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    segment: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
    bindings: BTreeMap<HttpMethod, MethodBinding>,
}

impl PathNode {
    fn new(segment: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            segment: segment.into(),
            parent,
            children: BTreeMap::new(),
            bindings: BTreeMap::new(),
        }
    }

    /// Path token of this node; empty for the root
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Child nodes ordered by segment
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn child(&self, segment: &str) -> Option<NodeId> {
        self.children.get(segment).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Methods bound at this node, ordered by method
    pub fn bindings(&self) -> impl Iterator<Item = &MethodBinding> {
        self.bindings.values()
    }

    pub fn binding(&self, method: HttpMethod) -> Option<&MethodBinding> {
        self.bindings.get(&method)
    }

    pub fn is_bound(&self, method: HttpMethod) -> bool {
        self.bindings.contains_key(&method)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

/// Resolved route table: a tree of path segments with method bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTree {
    nodes: Vec<PathNode>,
    /// Bindings in the order they were attached
    order: Vec<(NodeId, HttpMethod)>,
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTree {
    /// Tree holding only the root node (segment "")
    pub fn new() -> Self {
        Self {
            nodes: vec![PathNode::new("", None)],
            order: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node by id
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree; use [`RouteTree::get`]
    /// for ids of unknown origin.
    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&PathNode> {
        self.nodes.get(id.0)
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        match self.get(id) {
            Some(_) => Ok(()),
            None => Err(GrammyError::UnknownNode(id.0)),
        }
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.order.is_empty()
    }

    /// Resolve `path` below `root`, creating missing nodes
    ///
    /// Leading and trailing separators are ignored; an empty path resolves
    /// to `root` itself. Empty or invalid segments are rejected.
    pub fn resolve_segment(&mut self, root: NodeId, path: &str) -> Result<NodeId> {
        self.check_node(root)?;
        let segments = split_path(path)?;

        let mut current = root;
        for segment in segments {
            current = match self.nodes[current.0].child(segment) {
                Some(existing) => existing,
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(PathNode::new(segment, Some(current)));
                    self.nodes[current.0]
                        .children
                        .insert(segment.to_string(), id);
                    debug!(segment = %segment, node = id.0, "Created path node");
                    id
                }
            };
        }

        Ok(current)
    }

    /// Look up an existing node without creating anything
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let segments = split_path(path).ok()?;
        segments
            .into_iter()
            .try_fold(self.root(), |id, segment| self.node(id).child(segment))
    }

    /// Full path of a node, e.g. "/songs/{id}"; the root is "/"
    pub fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if !node.is_root() {
                segments.push(node.segment.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        format!("{}{}", SEPARATOR, segments.join("/"))
    }

    /// Bind `method` at `node`
    ///
    /// The binding is guarded by `auth` only when the context is present and
    /// the route asks for authorization; otherwise its mode is `NONE`.
    pub fn attach_binding(
        &mut self,
        node: NodeId,
        method: HttpMethod,
        handler: HandlerRef,
        api_key_required: bool,
        auth_required: bool,
        auth: Option<&AuthorizationContext>,
    ) -> Result<&MethodBinding> {
        self.check_node(node)?;
        let path = self.full_path(node);
        if self.node(node).is_bound(method) {
            return Err(GrammyError::DuplicateRoute {
                path,
                method: method.to_string(),
            });
        }

        let (authorization, authorizer) = match auth {
            Some(ctx) if auth_required => (ctx.mode, Some(ctx.name.clone())),
            _ => (AuthorizationMode::None, None),
        };

        debug!(
            path = %path,
            method = %method,
            handler = %handler,
            authorization = %authorization,
            "Attached method binding"
        );

        let binding = MethodBinding {
            node,
            path,
            method,
            handler,
            proxy_integration: true,
            api_key_required,
            authorization,
            authorizer,
        };

        self.order.push((node, method));
        let bindings = &mut self.nodes[node.0].bindings;
        Ok(bindings.entry(method).or_insert(binding))
    }

    /// All bindings in attachment order
    pub fn bindings(&self) -> impl Iterator<Item = &MethodBinding> {
        self.order
            .iter()
            .filter_map(|(node, method)| self.node(*node).binding(*method))
    }

    pub fn binding_count(&self) -> usize {
        self.order.len()
    }

    /// Depth-first walk from the root, children in segment order
    pub fn walk(&self) -> Vec<NodeId> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            visited.push(id);
            let children: Vec<NodeId> = self.node(id).children().map(|(_, c)| c).collect();
            stack.extend(children.into_iter().rev());
        }
        visited
    }
}

/// Split a route path into segments
fn split_path(path: &str) -> Result<Vec<&str>> {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = trimmed.split(SEPARATOR).collect();
    for segment in &segments {
        validate_segment(path, segment)?;
    }
    Ok(segments)
}

fn validate_segment(path: &str, segment: &str) -> Result<()> {
    let malformed = |reason: &str| GrammyError::MalformedPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if segment.is_empty() {
        return Err(malformed("empty path segment"));
    }
    if segment.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
        return Err(malformed(&format!(
            "segment '{}' contains an invalid character",
            segment
        )));
    }

    // path parameters: {id} or greedy {proxy+}
    let opens = segment.starts_with('{');
    let closes = segment.ends_with('}');
    if opens != closes || (opens && segment.len() <= 2) {
        return Err(malformed(&format!(
            "segment '{}' is not a valid path parameter",
            segment
        )));
    }
    if !opens && (segment.contains('{') || segment.contains('}')) {
        return Err(malformed(&format!(
            "segment '{}' mixes literal text and a path parameter",
            segment
        )));
    }

    Ok(())
}
