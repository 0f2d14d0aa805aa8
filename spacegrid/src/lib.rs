pub mod config;
pub mod error;
pub mod model;
pub mod geometry {
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod polygon;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod point_index;
    pub mod regions;
    pub mod subdivide;
    pub mod subtract;
}
mod json;

pub use config::GridConfig;
pub use error::{GraphError, GraphResult};
pub use model::{BBox3, Edge, EdgeId, Line, Plane, Polygon, Vec3, Vertex, VertexId};

use algorithms::point_index::PointIndex;
use geometry::limits::point_in_bounds;
use model::edge_key;
use std::collections::{BTreeSet, HashMap};

/// Spatial connectivity graph.
///
/// Vertices and edges live in id-indexed tables and refer to each other by
/// id only. Every vertex is registered in a tolerance-aware point index so
/// that coincident points always resolve to one vertex. Mutating calls keep
/// these invariants before returning:
/// - edge endpoints reference live vertices;
/// - at most one edge joins any unordered vertex pair;
/// - no vertex is left without incident edges;
/// - the point index holds exactly the live vertices.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) vertices: Vec<Option<Vertex>>, // id is index; slot 0 is the "not found" sentinel
    pub(crate) edges: Vec<Option<Edge>>,      // id is index; slot 0 unused
    pub(crate) edge_lookup: HashMap<(VertexId, VertexId), EdgeId>, // sorted endpoints -> edge
    pub(crate) index: PointIndex,
    pub(crate) config: GridConfig,
    pub(crate) vertex_count: usize,
    pub(crate) edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::from_config(GridConfig::default())
    }

    pub fn with_config(config: GridConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: GridConfig) -> Self {
        Graph {
            vertices: vec![None],
            edges: vec![None],
            edge_lookup: HashMap::new(),
            index: PointIndex::new(config.tolerance),
            config,
            vertex_count: 0,
            edge_count: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    pub fn point_index(&self) -> &PointIndex {
        &self.index
    }

    // Vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize).and_then(|v| v.as_ref())
    }

    pub fn get_vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().filter_map(|v| v.as_ref())
    }

    /// Id of the vertex within `tolerance` (default: the graph's) of `point`.
    pub fn try_get_vertex_index(&self, point: Vec3, tolerance: Option<f64>) -> Option<VertexId> {
        self.index.find(point, tolerance)
    }

    /// Existing vertex fused with `point`, or a new one. Leaves a new vertex
    /// isolated: callers must attach an edge before returning.
    pub(crate) fn add_vertex(&mut self, point: Vec3) -> GraphResult<VertexId> {
        if !point_in_bounds(point) {
            return Err(GraphError::invalid(format!("point not finite or out of bounds: {:?}", point)));
        }
        let next = self.vertices.len() as VertexId;
        let (id, created) = self.index.insert_with(point, || next);
        if created {
            self.vertices.push(Some(Vertex {
                id,
                point,
                edges: BTreeSet::new(),
            }));
            self.vertex_count += 1;
        }
        Ok(id)
    }

    /// Adds (or finds) the vertex at `point` and connects it to every id in
    /// `connections`. Fails without mutating when `connections` is empty,
    /// names an unknown vertex, or would connect the vertex to itself.
    pub fn add_vertex_connected(&mut self, point: Vec3, connections: &[VertexId]) -> GraphResult<VertexId> {
        if connections.is_empty() {
            return Err(GraphError::invalid("vertex connections must not be empty"));
        }
        if !point_in_bounds(point) {
            return Err(GraphError::invalid(format!("point not finite or out of bounds: {:?}", point)));
        }
        let existing = self.index.find(point, None);
        for c in connections {
            if self.get_vertex(*c).is_none() {
                return Err(GraphError::invalid(format!("unknown vertex id {}", c)));
            }
            if existing == Some(*c) {
                return Err(GraphError::invalid(format!("point fuses with connection {}: self loop", c)));
            }
        }
        let id = self.add_vertex(point)?;
        for c in connections {
            self.add_edge(id, *c)?;
        }
        Ok(id)
    }

    /// Inserts `points` in order, joining consecutive distinct vertices.
    /// Points fused with their predecessor are skipped.
    pub fn add_polyline(&mut self, points: &[Vec3]) -> GraphResult<Vec<VertexId>> {
        if points.iter().any(|p| !point_in_bounds(*p)) {
            return Err(GraphError::invalid("polyline point not finite or out of bounds"));
        }
        let tol = self.tolerance();
        let distinct = points.windows(2).any(|w| !w[0].is_almost_equal_to(w[1], tol));
        if !distinct {
            return Err(GraphError::invalid("polyline needs at least two distinct points"));
        }
        let mut ids: Vec<VertexId> = Vec::with_capacity(points.len());
        for p in points {
            let id = self.add_vertex(*p)?;
            if let Some(prev) = ids.last().copied() {
                if prev == id {
                    continue;
                }
                self.add_edge(prev, id)?;
            }
            ids.push(id);
        }
        self.prune_isolated(ids.iter().copied());
        Ok(ids)
    }

    /// Drops listed vertices that ended up with no incident edges.
    pub(crate) fn prune_isolated<I: IntoIterator<Item = VertexId>>(&mut self, ids: I) {
        for id in ids {
            if self.get_vertex(id).map_or(false, |v| v.edges.is_empty()) {
                self.remove_vertex(id);
            }
        }
    }

    fn remove_vertex(&mut self, id: VertexId) {
        let Some(v) = self.vertices.get_mut(id as usize).and_then(|slot| slot.take()) else {
            return;
        };
        debug_assert!(v.edges.is_empty(), "removing vertex {} with live edges", id);
        let removed = self.index.remove(v.point);
        debug_assert_eq!(removed, Some(id), "point index out of sync for vertex {}", id);
        self.vertex_count -= 1;
    }

    pub fn neighbors(&self, id: VertexId) -> Vec<VertexId> {
        let Some(v) = self.get_vertex(id) else {
            return Vec::new();
        };
        v.edges
            .iter()
            .filter_map(|eid| self.get_edge(*eid))
            .filter_map(|e| e.other(id))
            .collect()
    }

    pub fn bounding_box(&self) -> Option<BBox3> {
        BBox3::from_points(self.get_vertices().map(|v| v.point))
    }

    // Edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }

    pub fn get_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(|e| e.as_ref())
    }

    /// Edge joining `a` and `b` in either order.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Segment between the edge's endpoints, computed on demand.
    pub fn get_line(&self, id: EdgeId) -> Option<Line> {
        let e = self.get_edge(id)?;
        let a = self.get_vertex(e.start)?;
        let b = self.get_vertex(e.end)?;
        Some(Line::new(a.point, b.point))
    }

    /// Connects two vertices. Idempotent on the unordered pair: an existing
    /// edge between them is returned unchanged.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> GraphResult<EdgeId> {
        if a == b {
            return Err(GraphError::invalid(format!("self loop on vertex {}", a)));
        }
        if self.get_vertex(a).is_none() || self.get_vertex(b).is_none() {
            return Err(GraphError::invalid(format!("edge {}-{} references an unknown vertex", a, b)));
        }
        let key = edge_key(a, b);
        if let Some(id) = self.edge_lookup.get(&key) {
            return Ok(*id);
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(Edge { id, start: a, end: b }));
        self.edge_lookup.insert(key, id);
        for v in [a, b] {
            if let Some(Some(vertex)) = self.vertices.get_mut(v as usize) {
                vertex.edges.insert(id);
            }
        }
        self.edge_count += 1;
        Ok(id)
    }

    /// Removes the edge and any endpoint it leaves without edges.
    pub fn delete_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.get_mut(id as usize).and_then(|slot| slot.take()) else {
            return false;
        };
        self.edge_lookup.remove(&edge.key());
        self.edge_count -= 1;
        for v in [edge.start, edge.end] {
            let isolated = match self.vertices.get_mut(v as usize) {
                Some(Some(vertex)) => {
                    vertex.edges.remove(&id);
                    vertex.edges.is_empty()
                }
                _ => {
                    debug_assert!(false, "edge {} references missing vertex {}", id, v);
                    false
                }
            };
            if isolated {
                self.remove_vertex(v);
            }
        }
        true
    }

    /// Splits an edge at `point`. Returns the vertex at the split, which is
    /// an endpoint when `point` fuses with one (the edge is then kept), or
    /// `None` for an unknown edge.
    pub fn cut_edge(&mut self, id: EdgeId, point: Vec3) -> GraphResult<Option<VertexId>> {
        let Some(edge) = self.get_edge(id).copied() else {
            return Ok(None);
        };
        match self.index.find(point, None) {
            Some(v) if v == edge.start || v == edge.end => return Ok(Some(v)),
            _ => {}
        }
        let v = self.add_vertex_connected(point, &[edge.start, edge.end])?;
        self.delete_edge(id);
        Ok(Some(v))
    }

    pub fn clear(&mut self) {
        *self = Self::from_config(self.config);
    }

    // Regions
    /// Inserts the prism spanned by `bbox`: its X/Y rectangle at the lowest
    /// Z, extruded up by the Z extent.
    pub fn add_from_box(&mut self, bbox: &BBox3, key_points: &[Vec3]) -> GraphResult<()> {
        algorithms::regions::add_from_box_impl(self, bbox, key_points)
    }

    pub fn add_from_extrusion(
        &mut self,
        boundary: &Polygon,
        axis: Vec3,
        distance: f64,
        key_points: &[Vec3],
    ) -> GraphResult<()> {
        algorithms::regions::add_from_extrusion_impl(self, boundary, axis, distance, key_points)
    }

    /// Inserts a planar region subdivided at `key_points` and at every
    /// crossing of a pre-existing edge with the region. Returns the ids of
    /// the region's edges, sorted.
    pub fn add_from_polygon(&mut self, boundary: &Polygon, key_points: &[Vec3]) -> GraphResult<Vec<EdgeId>> {
        algorithms::regions::add_from_polygon_impl(self, boundary, key_points)
    }

    // Subtraction
    pub fn subtract_box(
        &mut self,
        bbox: &BBox3,
        remove_cut_edges: bool,
    ) -> GraphResult<algorithms::subtract::SubtractReport> {
        algorithms::subtract::subtract_box_impl(self, bbox, remove_cut_edges)
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
    pub fn from_json_value(&mut self, v: serde_json::Value) -> bool {
        json::from_json_impl(self, v)
    }
    pub fn from_json_value_strict(&mut self, v: serde_json::Value) -> GraphResult<()> {
        json::from_json_impl_strict(self, v)
    }
}
