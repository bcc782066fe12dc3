//! The polyhedron descriptor: shared unit corners, quadrilateral faces, and
//! the per-face patch that maps face-local `(u, v)` onto the unit sphere.

use std::fmt;

use glam::DVec3;

use crate::error::PolyhedronError;

/// Stable identifier of a polyhedron face (`0..face_count`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u16);

impl FaceId {
    /// The face index as a `usize`, for table lookups.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "face{}", self.0)
    }
}

/// Derived geometry of one quadrilateral face.
///
/// Corner 0 sits at `(u, v) = (0, 0)`, corner 1 at `(1, 0)`, corner 2 at
/// `(1, 1)` and corner 3 at `(0, 1)`. The patch is bilinear:
///
/// `P(u, v) = origin + u * edge_u + v * edge_v + u * v * twist`
///
/// `twist` is zero when the four corners form a planar parallelogram. Unit
/// corners of the triacontahedron do not, and keeping the twist term makes
/// the boundary of every face a straight segment between its two corners, so
/// neighbouring faces agree exactly along shared edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceGeometry {
    /// Corner 0.
    pub origin: DVec3,
    /// Corner 1 minus corner 0 (direction of increasing `u` / column).
    pub edge_u: DVec3,
    /// Corner 3 minus corner 0 (direction of increasing `v` / row).
    pub edge_v: DVec3,
    /// Bilinear correction `c2 - c1 - c3 + c0`.
    pub twist: DVec3,
    /// Unit direction through the face centre.
    pub center_dir: DVec3,
    /// Largest angle (radians) between `center_dir` and any corner.
    pub angular_radius: f64,
}

impl FaceGeometry {
    fn from_corners(c: [DVec3; 4]) -> Self {
        let origin = c[0];
        let edge_u = c[1] - c[0];
        let edge_v = c[3] - c[0];
        let twist = c[2] - c[1] - c[3] + c[0];
        let center_dir = (origin + 0.5 * edge_u + 0.5 * edge_v + 0.25 * twist).normalize();
        let angular_radius = c
            .iter()
            .map(|corner| center_dir.dot(corner.normalize()).clamp(-1.0, 1.0).acos())
            .fold(0.0, f64::max);
        Self {
            origin,
            edge_u,
            edge_v,
            twist,
            center_dir,
            angular_radius,
        }
    }

    /// Point on the (non-normalized) bilinear patch.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> DVec3 {
        self.origin + u * self.edge_u + v * self.edge_v + (u * v) * self.twist
    }

    /// Point on the unit sphere above `(u, v)`.
    #[must_use]
    pub fn sphere_point(&self, u: f64, v: f64) -> DVec3 {
        self.point_at(u, v).normalize()
    }

    /// Partial derivatives `(dP/du, dP/dv)` of the patch.
    #[must_use]
    pub fn partials(&self, u: f64, v: f64) -> (DVec3, DVec3) {
        (self.edge_u + v * self.twist, self.edge_v + u * self.twist)
    }
}

/// An immutable closed polyhedron of quadrilateral faces.
///
/// Built once and shared by reference (typically behind an `Arc`) among every
/// component that needs face geometry.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    corners: Vec<DVec3>,
    faces: Vec<[u32; 4]>,
    geometry: Vec<FaceGeometry>,
}

impl Polyhedron {
    /// Build a polyhedron from arbitrary corners and quads.
    ///
    /// Corners are normalized onto the unit sphere. Faces list corner
    /// indices counter-clockwise as seen from outside. Closure is *not*
    /// checked here; that is [`Topology::resolve`](crate::Topology::resolve)'s job.
    pub fn new(corners: Vec<DVec3>, faces: Vec<[u32; 4]>) -> Result<Self, PolyhedronError> {
        if faces.is_empty() {
            return Err(PolyhedronError::NoFaces);
        }
        let mut unit = Vec::with_capacity(corners.len());
        for (index, corner) in corners.iter().enumerate() {
            let len = corner.length();
            if !len.is_finite() || len < 1e-12 {
                return Err(PolyhedronError::DegenerateCorner { index });
            }
            unit.push(*corner / len);
        }
        for (face, quad) in faces.iter().enumerate() {
            if let Some(&corner) = quad.iter().find(|&&c| c as usize >= unit.len()) {
                return Err(PolyhedronError::CornerOutOfRange {
                    face,
                    corner,
                    corner_count: unit.len(),
                });
            }
        }
        Ok(Self::from_unit_parts(unit, faces))
    }

    fn from_unit_parts(corners: Vec<DVec3>, faces: Vec<[u32; 4]>) -> Self {
        let geometry = faces
            .iter()
            .map(|quad| FaceGeometry::from_corners(quad.map(|c| corners[c as usize])))
            .collect();
        Self {
            corners,
            faces,
            geometry,
        }
    }

    /// The rhombic triacontahedron: 32 corners, 30 rhombic faces.
    ///
    /// The 12 icosahedron vertices are the degree-5 corners, the 20
    /// normalized icosahedron face centroids the degree-3 corners. Each
    /// icosahedron edge `(a, b)` yields one face `[a, p, b, q]`, where `p` and
    /// `q` are the centroids of the two triangles sharing that edge. Faces
    /// are numbered in lexicographic order of `(a, b)`.
    #[must_use]
    pub fn rhombic_triacontahedron() -> Self {
        let phi = (1.0 + 5f64.sqrt()) / 2.0;
        let icosa = [
            DVec3::new(-1.0, phi, 0.0),
            DVec3::new(1.0, phi, 0.0),
            DVec3::new(-1.0, -phi, 0.0),
            DVec3::new(1.0, -phi, 0.0),
            DVec3::new(0.0, -1.0, phi),
            DVec3::new(0.0, 1.0, phi),
            DVec3::new(0.0, -1.0, -phi),
            DVec3::new(0.0, 1.0, -phi),
            DVec3::new(phi, 0.0, -1.0),
            DVec3::new(phi, 0.0, 1.0),
            DVec3::new(-phi, 0.0, -1.0),
            DVec3::new(-phi, 0.0, 1.0),
        ];
        // Icosahedron edge length is 2 for these coordinates.
        let is_edge = |a: usize, b: usize| ((icosa[a] - icosa[b]).length_squared() - 4.0).abs() < 1e-9;

        let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(20);
        for a in 0..icosa.len() {
            for b in (a + 1)..icosa.len() {
                if !is_edge(a, b) {
                    continue;
                }
                for c in (b + 1)..icosa.len() {
                    if is_edge(a, c) && is_edge(b, c) {
                        triangles.push([a, b, c]);
                    }
                }
            }
        }

        let mut corners: Vec<DVec3> = icosa.iter().map(|v| v.normalize()).collect();
        corners.extend(
            triangles
                .iter()
                .map(|t| (icosa[t[0]] + icosa[t[1]] + icosa[t[2]]).normalize()),
        );

        let mut faces = Vec::with_capacity(30);
        for a in 0..icosa.len() {
            for b in (a + 1)..icosa.len() {
                if !is_edge(a, b) {
                    continue;
                }
                let mut shared = triangles
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.contains(&a) && t.contains(&b))
                    .map(|(i, _)| (icosa.len() + i) as u32);
                let (Some(p), Some(q)) = (shared.next(), shared.next()) else {
                    continue;
                };
                let mut quad = [a as u32, p, b as u32, q];
                let normal = (corners[p as usize] - corners[a]).cross(corners[q as usize] - corners[a]);
                if normal.dot(corners[a] + corners[b]) < 0.0 {
                    quad.swap(1, 3);
                }
                faces.push(quad);
            }
        }

        Self::from_unit_parts(corners, faces)
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over every face id in order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(|i| FaceId(i as u16))
    }

    /// Whether `face` exists on this polyhedron.
    #[must_use]
    pub fn contains_face(&self, face: FaceId) -> bool {
        face.index() < self.faces.len()
    }

    /// All corners, on the unit sphere.
    #[must_use]
    pub fn corners(&self) -> &[DVec3] {
        &self.corners
    }

    /// Corner indices of `face`, counter-clockwise from outside.
    ///
    /// # Panics
    ///
    /// Panics if `face` is out of range.
    #[must_use]
    pub fn face_corners(&self, face: FaceId) -> [u32; 4] {
        self.faces[face.index()]
    }

    /// Derived patch geometry of `face`.
    ///
    /// # Panics
    ///
    /// Panics if `face` is out of range.
    #[must_use]
    pub fn geometry(&self, face: FaceId) -> &FaceGeometry {
        &self.geometry[face.index()]
    }
}
