//! Pointer resolution over the vector and feature arenas.
//!
//! Pointers store target ids; resolving a pointer checks that the target
//! exists and resolves the target's own pointers first. Walks use an
//! explicit stack, so chain length is bounded by memory rather than the
//! call stack. A set of ids on the current resolution path stops cycles: a
//! pointer whose target is already on the path is left unresolved, and
//! resolution of the rest of the graph carries on. Resolved pointers are
//! never revisited, so running the pass twice changes nothing.

use crate::codes::{Orientation, Usage};
use crate::feature::Feature;
use crate::geometry::Coordinate;
use crate::ids::{FeatureId, VectorId};
use crate::vector::{SpatialVector, VectorPointer};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;

pub type VectorMap = FxHashMap<VectorId, SpatialVector>;
pub type FeatureMap = FxHashMap<FeatureId, Feature>;

/// Counts from one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    pub vector_pointers: usize,
    pub spatial_pointers: usize,
    pub feature_pointers: usize,
    /// Pointers left unresolved, either dangling or closing a cycle.
    pub unresolved: usize,
}

/// Resolve vectors, then feature→vector, then feature→feature pointers.
pub fn resolve_all(vectors: &mut VectorMap, features: &mut FeatureMap) -> ResolveStats {
    resolve_vectors(vectors);
    resolve_spatial_pointers(features, vectors);
    resolve_feature_pointers(features);

    let mut stats = ResolveStats::default();
    for pointer in vectors.values().flat_map(|v| &v.pointers) {
        count(&mut stats.vector_pointers, &mut stats.unresolved, pointer.resolved.is_some());
    }
    for feature in features.values() {
        for pointer in &feature.spatial_pointers {
            count(&mut stats.spatial_pointers, &mut stats.unresolved, pointer.resolved.is_some());
        }
        for pointer in &feature.feature_pointers {
            count(&mut stats.feature_pointers, &mut stats.unresolved, pointer.resolved.is_some());
        }
    }
    tracing::debug!(
        vector_pointers = stats.vector_pointers,
        spatial_pointers = stats.spatial_pointers,
        feature_pointers = stats.feature_pointers,
        unresolved = stats.unresolved,
        "pointers resolved"
    );
    stats
}

fn count(resolved: &mut usize, unresolved: &mut usize, ok: bool) {
    if ok {
        *resolved += 1;
    } else {
        *unresolved += 1;
    }
}

pub fn resolve_vectors(vectors: &mut VectorMap) {
    let mut ids: Vec<VectorId> = vectors.keys().copied().collect();
    ids.sort_unstable();
    let mut path = FxHashSet::default();
    for id in ids {
        resolve_from(vectors, id, &mut path);
    }
}

pub fn resolve_spatial_pointers(features: &mut FeatureMap, vectors: &mut VectorMap) {
    let mut path = FxHashSet::default();
    for feature in features.values_mut() {
        for pointer in &mut feature.spatial_pointers {
            if pointer.resolved.is_some() || !vectors.contains_key(&pointer.target) {
                continue;
            }
            resolve_from(vectors, pointer.target, &mut path);
            pointer.resolved = Some(pointer.target);
        }
    }
}

pub fn resolve_feature_pointers(features: &mut FeatureMap) {
    let mut ids: Vec<FeatureId> = features.keys().copied().collect();
    ids.sort_unstable();
    let mut path = FxHashSet::default();
    for id in ids {
        resolve_from(features, id, &mut path);
    }
}

/// An id-keyed arena whose records point at records of the same arena.
trait PointerGraph {
    type Id: Copy + Eq + Hash + Display;

    /// Target of the `index`-th pointer of `id` and whether it is resolved.
    fn pointer(&self, id: Self::Id, index: usize) -> Option<(Self::Id, bool)>;

    fn contains(&self, id: Self::Id) -> bool;

    fn mark_resolved(&mut self, id: Self::Id, index: usize, target: Self::Id);
}

impl PointerGraph for VectorMap {
    type Id = VectorId;

    fn pointer(&self, id: VectorId, index: usize) -> Option<(VectorId, bool)> {
        let pointer = self.get(&id)?.pointers.get(index)?;
        Some((pointer.target, pointer.resolved.is_some()))
    }

    fn contains(&self, id: VectorId) -> bool {
        self.contains_key(&id)
    }

    fn mark_resolved(&mut self, id: VectorId, index: usize, target: VectorId) {
        if let Some(pointer) = self.get_mut(&id).and_then(|v| v.pointers.get_mut(index)) {
            pointer.resolved = Some(target);
        }
    }
}

impl PointerGraph for FeatureMap {
    type Id = FeatureId;

    fn pointer(&self, id: FeatureId, index: usize) -> Option<(FeatureId, bool)> {
        let pointer = self.get(&id)?.feature_pointers.get(index)?;
        Some((pointer.target, pointer.resolved.is_some()))
    }

    fn contains(&self, id: FeatureId) -> bool {
        self.contains_key(&id)
    }

    fn mark_resolved(&mut self, id: FeatureId, index: usize, target: FeatureId) {
        if let Some(pointer) = self
            .get_mut(&id)
            .and_then(|f| f.feature_pointers.get_mut(index))
        {
            pointer.resolved = Some(target);
        }
    }
}

/// Depth-first resolution from `start`. Each stack frame is a record and
/// the index of its pointer being processed; a pointer is marked resolved
/// once its target's frame has finished.
fn resolve_from<G: PointerGraph>(graph: &mut G, start: G::Id, path: &mut FxHashSet<G::Id>) {
    let mut stack: Vec<(G::Id, usize)> = vec![(start, 0)];
    path.insert(start);

    while let Some(&(id, index)) = stack.last() {
        match graph.pointer(id, index) {
            Some((target, false)) if !path.contains(&target) && graph.contains(target) => {
                path.insert(target);
                stack.push((target, 0));
            }
            Some((target, done)) => {
                if !done && path.contains(&target) {
                    tracing::trace!(record = %id, target = %target, "pointer closes a cycle");
                }
                advance(&mut stack);
            }
            None => {
                stack.pop();
                path.remove(&id);
                if let Some(&(parent, parent_index)) = stack.last() {
                    graph.mark_resolved(parent, parent_index, id);
                    advance(&mut stack);
                }
            }
        }
    }
}

fn advance<K>(stack: &mut [(K, usize)]) {
    if let Some(top) = stack.last_mut() {
        top.1 += 1;
    }
}

// ============================================================================
// Geometry expansion
// ============================================================================

/// Coordinates of a vector joined with those of its resolved neighbours:
/// predecessor, own, successor. A neighbour reached through a reversed
/// pointer contributes its expansion in reverse. A vector already on the
/// expansion path contributes nothing, so cyclic graphs terminate.
pub fn expanded_coordinates(vectors: &VectorMap, id: VectorId) -> Vec<Coordinate> {
    let mut out = Vec::new();
    let mut path = FxHashSet::default();
    let mut stack: Vec<ExpandFrame> = Vec::new();
    enter(vectors, id, false, &out, &mut path, &mut stack);

    while let Some(frame) = stack.last_mut() {
        let Some(vector) = vectors.get(&frame.id) else {
            stack.pop();
            continue;
        };
        match frame.stage {
            Stage::Predecessor => {
                frame.stage = Stage::Own;
                if let Some(pointer) = vector.predecessor() {
                    enter_neighbour(vectors, pointer, &out, &mut path, &mut stack);
                }
            }
            Stage::Own => {
                frame.stage = Stage::Successor;
                out.extend_from_slice(&vector.coordinates);
                if let Some(pointer) = vector.successor() {
                    enter_neighbour(vectors, pointer, &out, &mut path, &mut stack);
                }
            }
            Stage::Successor => {
                let (id, start, reversed) = (frame.id, frame.start, frame.reversed);
                stack.pop();
                path.remove(&id);
                if reversed {
                    out[start..].reverse();
                }
            }
        }
    }
    out
}

#[derive(Clone, Copy)]
enum Stage {
    Predecessor,
    Own,
    Successor,
}

/// A vector being expanded; its segment starts at `out[start]`.
struct ExpandFrame {
    id: VectorId,
    stage: Stage,
    start: usize,
    reversed: bool,
}

fn enter_neighbour(
    vectors: &VectorMap,
    pointer: &VectorPointer,
    out: &[Coordinate],
    path: &mut FxHashSet<VectorId>,
    stack: &mut Vec<ExpandFrame>,
) {
    if let Some(target) = pointer.resolved {
        enter(vectors, target, pointer.is_reversed(), out, path, stack);
    }
}

/// Push a frame for `id` unless it is missing or already on the path, in
/// which case it contributes nothing.
fn enter(
    vectors: &VectorMap,
    id: VectorId,
    reversed: bool,
    out: &[Coordinate],
    path: &mut FxHashSet<VectorId>,
    stack: &mut Vec<ExpandFrame>,
) {
    if !vectors.contains_key(&id) || !path.insert(id) {
        return;
    }
    stack.push(ExpandFrame {
        id,
        stage: Stage::Predecessor,
        start: out.len(),
        reversed,
    });
}

/// Outline of a feature assembled from its spatial pointers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeaturePath {
    pub exterior: Vec<Coordinate>,
    pub interior: Vec<Coordinate>,
}

impl FeaturePath {
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty() && self.interior.is_empty()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.exterior.iter().chain(&self.interior)
    }
}

/// Segments with interior usage go to the interior ring, all others to
/// the exterior.
pub fn feature_path(vectors: &VectorMap, feature: &Feature) -> FeaturePath {
    let mut path = FeaturePath::default();
    for pointer in &feature.spatial_pointers {
        let Some(target) = pointer.resolved else {
            continue;
        };
        let mut segment = expanded_coordinates(vectors, target);
        if pointer.orientation == Orientation::Reverse {
            segment.reverse();
        }
        if pointer.usage == Usage::Interior {
            path.interior.extend(segment);
        } else {
            path.exterior.extend(segment);
        }
    }
    path
}
