use bytemuck::{Pod, Zeroable};

use crate::color::ResolvedColor;

/// One tessellated vertex with every per-vertex attribute a renderer may
/// consume. Flags are stored as `0.0` / `1.0`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub fill: [f32; 4],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub edge: f32,
    pub stroke: [f32; 4],
    pub stroke_weight: f32,
    /// Filled in by external transform stages; the core leaves it at `position`.
    pub transformed: [f32; 3],
    pub view: [f32; 4],
    pub ambient: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub emissive: [f32; 3],
    pub been_lit: f32,
    pub has_normal: f32,
}

/// Float count of one [`Vertex`].
pub const VERTEX_FIELDS: usize = 37;

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_FIELDS * 4);

impl Vertex {
    #[inline]
    pub fn edge(&self) -> bool {
        self.edge != 0.0
    }

    #[inline]
    pub fn has_normal(&self) -> bool {
        self.has_normal != 0.0
    }

    /// Fill color packed as ARGB.
    pub fn fill_argb(&self) -> u32 {
        ResolvedColor::from_unit(self.fill).argb
    }

    /// Stroke color packed as ARGB.
    pub fn stroke_argb(&self) -> u32 {
        ResolvedColor::from_unit(self.stroke).argb
    }
}

pub const INITIAL_CAPACITY: usize = 512;

/// Growable vertex store.
///
/// Capacity starts at 512 and doubles exactly whenever it is exceeded; it
/// never shrinks, so a long-lived surface settles on one allocation.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
    capacity: usize,
}

impl Default for VertexBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self { vertices: Vec::with_capacity(INITIAL_CAPACITY), capacity: INITIAL_CAPACITY }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Logical capacity (the doubling sequence 512, 1024, ...).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, vertex: Vertex) {
        if self.vertices.len() == self.capacity {
            self.capacity *= 2;
            self.vertices.reserve_exact(self.capacity - self.vertices.len());
            log::debug!("vertex buffer grown to {}", self.capacity);
        }
        self.vertices.push(vertex);
    }

    #[inline]
    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw vertex stream, `VERTEX_FIELDS` native-endian floats per vertex.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drops every vertex; capacity is kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Drops vertices from `len` onwards.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.vertices.truncate(len);
    }
}
