//! Vertex reduction over a scene graph
//!
//! Every framing quantity (bounds, farthest vertex, widest horizontal angle)
//! is a fold over the vertices of the model. The functions here walk the
//! render graph once and hand each vertex to the caller's combiner, in the
//! local space of the node the walk started from.

use orbitframe_core::{NodeId, Point3d, SceneGraph, Transform3D};
use rayon::prelude::*;

/// Fold `combine` over every vertex under `root`, in `root`'s local space.
///
/// Nodes are visited depth-first in child order and, inside a primitive,
/// instance by instance, so the order is fixed for a given graph. Deformed
/// positions are used when the primitive carries them. An empty subtree
/// returns `initial`.
pub fn reduce_vertices<T, F>(graph: &SceneGraph, root: NodeId, initial: T, combine: F) -> T
where
    F: FnMut(T, Point3d) -> T,
{
    vertices(graph, root).fold(initial, combine)
}

/// Parallel reduction for large models.
///
/// `fold` accumulates vertices into per-thread partials starting from
/// `identity()`, and `merge` joins partials. For associative and commutative
/// operations this matches [`reduce_vertices`].
pub fn par_reduce_vertices<T, I, F, M>(graph: &SceneGraph, root: NodeId, identity: I, fold: F, merge: M) -> T
where
    T: Send,
    I: Fn() -> T + Sync + Send,
    F: Fn(T, Point3d) -> T + Sync + Send,
    M: Fn(T, T) -> T + Sync + Send,
{
    collect_vertices(graph, root)
        .into_par_iter()
        .fold(&identity, &fold)
        .reduce(&identity, &merge)
}

/// Every vertex under `root`, in traversal order, in `root`'s local space.
pub fn collect_vertices(graph: &SceneGraph, root: NodeId) -> Vec<Point3d> {
    vertices(graph, root).collect()
}

/// Lazy iterator over the vertices under `root`
pub fn vertices(graph: &SceneGraph, root: NodeId) -> Vertices<'_> {
    Vertices {
        graph,
        // The root's own transform is excluded: results are in its local space.
        stack: vec![(root, Transform3D::identity())],
        current: None,
    }
}

struct PrimitiveCursor<'a> {
    positions: &'a [Point3d],
    to_root: Vec<Transform3D>,
    instance: usize,
    vertex: usize,
}

/// Iterator returned by [`vertices`]
pub struct Vertices<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(NodeId, Transform3D)>,
    current: Option<PrimitiveCursor<'a>>,
}

impl<'a> Vertices<'a> {
    fn advance_node(&mut self) -> bool {
        let graph = self.graph;
        while let Some((id, relative)) = self.stack.pop() {
            let Some(node) = graph.get(id) else {
                continue;
            };
            for child in node.children().iter().rev() {
                if let Some(child_node) = graph.get(*child) {
                    self.stack.push((*child, relative * child_node.transform));
                }
            }
            if let Some(primitive) = node.primitive() {
                let positions = primitive.resolved_positions();
                if positions.is_empty() {
                    continue;
                }
                self.current = Some(PrimitiveCursor {
                    positions,
                    to_root: primitive
                        .instance_transforms()
                        .into_iter()
                        .map(|instance| relative * instance)
                        .collect(),
                    instance: 0,
                    vertex: 0,
                });
                return true;
            }
        }
        false
    }
}

impl Iterator for Vertices<'_> {
    type Item = Point3d;

    fn next(&mut self) -> Option<Point3d> {
        loop {
            if let Some(cursor) = self.current.as_mut() {
                if cursor.instance < cursor.to_root.len() {
                    let point = cursor.to_root[cursor.instance].transform_point(&cursor.positions[cursor.vertex]);
                    cursor.vertex += 1;
                    if cursor.vertex == cursor.positions.len() {
                        cursor.vertex = 0;
                        cursor.instance += 1;
                    }
                    return Some(point);
                }
                self.current = None;
            }
            if !self.advance_node() {
                return None;
            }
        }
    }
}
