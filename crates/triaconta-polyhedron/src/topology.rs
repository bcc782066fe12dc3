//! Face adjacency resolved from shared corners.
//!
//! Every directed face edge is keyed by its unordered corner pair. On a closed
//! surface each key is owned by exactly two face edges; anything else is a
//! data-integrity failure that aborts construction.

use std::collections::HashMap;

use tracing::info;

use crate::error::TopologyError;
use crate::{FaceEdge, FaceId, Polyhedron};

/// Describes what lies across one edge of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeAdjacency {
    /// The adjacent face.
    pub neighbor_face: FaceId,
    /// Which edge of the neighbour this connects to.
    pub neighbor_edge: FaceEdge,
    /// Whether the two faces list the shared corners in opposite order.
    /// If true, position `t` along this edge is `len - 1 - t` on the neighbour.
    pub flipped: bool,
}

#[derive(Clone, Copy)]
struct EdgeOccurrence {
    face: FaceId,
    edge: FaceEdge,
    start: u32,
}

/// Immutable adjacency table for every `(face, edge)` pair.
#[derive(Clone, Debug)]
pub struct Topology {
    entries: Vec<[EdgeAdjacency; 4]>,
}

impl Topology {
    /// Resolve the adjacency of every face edge.
    ///
    /// Fails if any corner pair is not owned by exactly two face edges.
    pub fn resolve(polyhedron: &Polyhedron) -> Result<Self, TopologyError> {
        let mut owners: HashMap<(u32, u32), Vec<EdgeOccurrence>> = HashMap::new();
        for face in polyhedron.faces() {
            let corners = polyhedron.face_corners(face);
            for edge in FaceEdge::ALL {
                let (i, j) = edge.corner_slots();
                let (a, b) = (corners[i], corners[j]);
                owners
                    .entry((a.min(b), a.max(b)))
                    .or_default()
                    .push(EdgeOccurrence {
                        face,
                        edge,
                        start: a,
                    });
            }
        }

        let mut keys: Vec<(u32, u32)> = owners.keys().copied().collect();
        keys.sort_unstable();

        // Every slot is overwritten below: each (face, edge) belongs to exactly one key.
        let mut entries: Vec<[EdgeAdjacency; 4]> = polyhedron
            .faces()
            .map(|face| {
                FaceEdge::ALL.map(|edge| EdgeAdjacency {
                    neighbor_face: face,
                    neighbor_edge: edge,
                    flipped: false,
                })
            })
            .collect();

        for key in &keys {
            let occurrences = &owners[key];
            let [first, second] = occurrences.as_slice() else {
                return Err(TopologyError::UnpairedEdge {
                    a: key.0,
                    b: key.1,
                    owners: occurrences.len(),
                });
            };
            let flipped = first.start != second.start;
            entries[first.face.index()][first.edge.index()] = EdgeAdjacency {
                neighbor_face: second.face,
                neighbor_edge: second.edge,
                flipped,
            };
            entries[second.face.index()][second.edge.index()] = EdgeAdjacency {
                neighbor_face: first.face,
                neighbor_edge: first.edge,
                flipped,
            };
        }

        info!(
            faces = entries.len(),
            edges = keys.len(),
            "resolved polyhedron topology"
        );
        Ok(Self { entries })
    }

    /// What lies across `edge` of `face`.
    ///
    /// # Panics
    ///
    /// Panics if `face` is out of range.
    #[must_use]
    pub fn adjacency(&self, face: FaceId, edge: FaceEdge) -> EdgeAdjacency {
        self.entries[face.index()][edge.index()]
    }

    /// The four faces bordering `face`, in edge order.
    #[must_use]
    pub fn neighbor_faces(&self, face: FaceId) -> [FaceId; 4] {
        self.entries[face.index()].map(|adj| adj.neighbor_face)
    }

    /// Number of faces covered.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.entries.len()
    }
}
