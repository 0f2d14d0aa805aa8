use crate::config::GridConfig;
use crate::error::{GraphError, GraphResult};
use crate::geometry::limits;
use crate::model::{edge_key, Edge, EdgeId, Vec3, Vertex, VertexId};
use crate::Graph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

const DOC_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct EdgeSer {
    a: VertexId,
    b: VertexId,
}

#[derive(Serialize)]
struct Doc {
    version: u32,
    tolerance: f64,
    vertices: BTreeMap<VertexId, Vec3>,
    edges: BTreeMap<EdgeId, EdgeSer>,
}

#[derive(Deserialize)]
struct DocDe {
    version: Option<u32>,
    tolerance: Option<f64>,
    #[serde(default)]
    vertices: BTreeMap<VertexId, Vec3>,
    #[serde(default)]
    edges: BTreeMap<EdgeId, EdgeSer>,
}

pub fn to_json_impl(g: &Graph) -> Value {
    let vertices = g.get_vertices().map(|v| (v.id, v.point)).collect();
    let edges = g
        .get_edges()
        .map(|e| (e.id, EdgeSer { a: e.start, b: e.end }))
        .collect();
    serde_json::to_value(Doc {
        version: DOC_VERSION,
        tolerance: g.tolerance(),
        vertices,
        edges,
    })
    .unwrap_or(Value::Null)
}

/// Lenient load: structural defects (dangling or duplicate edges, self
/// loops, coincident vertices, isolated vertices) are repaired with a
/// warning; malformed documents, caps and coordinate bounds still fail.
pub fn from_json_impl(g: &mut Graph, v: Value) -> bool {
    match load(v, false) {
        Ok(loaded) => {
            *g = loaded;
            true
        }
        Err(e) => {
            warn!(error = %e, "rejected graph document");
            false
        }
    }
}

pub fn from_json_impl_strict(g: &mut Graph, v: Value) -> GraphResult<()> {
    *g = load(v, true)?;
    Ok(())
}

fn load(v: Value, strict: bool) -> GraphResult<Graph> {
    let doc: DocDe =
        serde_json::from_value(v).map_err(|e| GraphError::persist("json_parse", e.to_string()))?;
    match doc.version {
        Some(DOC_VERSION) => {}
        None if !strict => {}
        other => {
            return Err(GraphError::persist("bad_version", format!("unsupported version {:?}", other)));
        }
    }
    if doc.vertices.len() > limits::MAX_VERTICES {
        return Err(GraphError::persist("caps_exceeded", format!("vertices>{}", limits::MAX_VERTICES)));
    }
    if doc.edges.len() > limits::MAX_EDGES {
        return Err(GraphError::persist("caps_exceeded", format!("edges>{}", limits::MAX_EDGES)));
    }
    for (id, p) in &doc.vertices {
        if !limits::point_in_bounds(*p) {
            return Err(GraphError::persist("out_of_bounds", format!("vertex {} coordinate", id)));
        }
    }

    let mut config = GridConfig::default();
    if let Some(t) = doc.tolerance {
        config = config.with_tolerance(t);
    }
    config
        .validate()
        .map_err(|e| GraphError::persist("bad_config", e.to_string()))?;
    let mut g = Graph::with_config(config)?;

    let structural = |what: String| -> GraphResult<()> {
        if strict {
            Err(GraphError::persist("invalid_structure", what))
        } else {
            warn!(%what, "repairing graph document");
            Ok(())
        }
    };

    // Ids size the tables, so they are capped like the counts.
    let oversized = |what: String| -> GraphResult<()> {
        if strict {
            Err(GraphError::persist("caps_exceeded", what))
        } else {
            warn!(%what, "dropping graph record");
            Ok(())
        }
    };
    let vid_cap = limits::MAX_VERTICES as VertexId;
    let eid_cap = limits::MAX_EDGES as EdgeId;

    // Stored id -> live id; coincident points collapse onto the first.
    let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(doc.vertices.len());
    let max_vid = doc.vertices.range(..=vid_cap).next_back().map_or(0, |(id, _)| *id);
    g.vertices.resize(max_vid as usize + 1, None);
    for (id, p) in &doc.vertices {
        if *id == 0 {
            structural("vertex id 0 is reserved".into())?;
            continue;
        }
        if *id > vid_cap {
            oversized(format!("vertex id {} exceeds {}", id, vid_cap))?;
            continue;
        }
        if let Some(existing) = g.index.find(*p, None) {
            structural(format!("vertex {} coincides with vertex {}", id, existing))?;
            remap.insert(*id, existing);
            continue;
        }
        g.index.insert(*p, *id);
        g.vertices[*id as usize] = Some(Vertex {
            id: *id,
            point: *p,
            edges: BTreeSet::new(),
        });
        g.vertex_count += 1;
        remap.insert(*id, *id);
    }

    let max_eid = doc.edges.range(..=eid_cap).next_back().map_or(0, |(id, _)| *id);
    g.edges.resize(max_eid as usize + 1, None);
    for (id, e) in &doc.edges {
        if *id == 0 {
            structural("edge id 0 is reserved".into())?;
            continue;
        }
        if *id > eid_cap {
            oversized(format!("edge id {} exceeds {}", id, eid_cap))?;
            continue;
        }
        let (Some(a), Some(b)) = (remap.get(&e.a).copied(), remap.get(&e.b).copied()) else {
            structural(format!("edge {} references a missing vertex", id))?;
            continue;
        };
        if a == b {
            structural(format!("edge {} is a self loop", id))?;
            continue;
        }
        let key = edge_key(a, b);
        if let Some(other) = g.edge_lookup.get(&key) {
            structural(format!("edge {} duplicates edge {}", id, other))?;
            continue;
        }
        g.edges[*id as usize] = Some(Edge { id: *id, start: a, end: b });
        g.edge_lookup.insert(key, *id);
        for v in [a, b] {
            if let Some(Some(vertex)) = g.vertices.get_mut(v as usize) {
                vertex.edges.insert(*id);
            }
        }
        g.edge_count += 1;
    }

    let isolated: Vec<VertexId> = g
        .get_vertices()
        .filter(|v| v.edges.is_empty())
        .map(|v| v.id)
        .collect();
    if let Some(first) = isolated.first() {
        structural(format!("vertex {} has no edges", first))?;
    }
    g.prune_isolated(isolated);
    Ok(g)
}
