use crate::object::{ObjectKind, Transform};
use glam::Vec3;
use std::fmt::Write as _;

/// Triangle geometry for a placeable primitive, in object space.
#[derive(Debug, Clone)]
pub struct PrimitiveMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl PrimitiveMesh {
    pub fn for_kind(kind: ObjectKind) -> Option<Self> {
        match kind {
            ObjectKind::Quad => Some(Self::quad(1.0)),
            ObjectKind::Cube => Some(Self::cube(1.0)),
            ObjectKind::Camera => None,
        }
    }

    /// Unit quad in the XY plane facing +Z.
    pub fn quad(size: f32) -> Self {
        let hs = size * 0.5;
        let positions =
            vec![Vec3::new(-hs, -hs, 0.0), Vec3::new(hs, -hs, 0.0), Vec3::new(hs, hs, 0.0), Vec3::new(-hs, hs, 0.0)];
        Self { positions, indices: vec![0, 1, 2, 0, 2, 3] }
    }

    pub fn cube(size: f32) -> Self {
        let hs = size * 0.5;
        let corners = [
            Vec3::new(-hs, -hs, -hs),
            Vec3::new(hs, -hs, -hs),
            Vec3::new(hs, hs, -hs),
            Vec3::new(-hs, hs, -hs),
            Vec3::new(-hs, -hs, hs),
            Vec3::new(hs, -hs, hs),
            Vec3::new(hs, hs, hs),
            Vec3::new(-hs, hs, hs),
        ];
        let faces: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // back
            [4, 5, 6, 7], // front
            [0, 4, 7, 3], // left
            [1, 2, 6, 5], // right
            [3, 7, 6, 2], // top
            [0, 1, 5, 4], // bottom
        ];
        let mut positions = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for face in faces {
            let base = positions.len() as u32;
            positions.extend(face.iter().map(|&corner| corners[corner]));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { positions, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One object as handed to the interchange exporter.
#[derive(Debug, Clone)]
pub struct ExportObject {
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
}

/// Writes world-space geometry for every primitive as a Wavefront OBJ document. Kinds without
/// geometry are skipped.
pub fn write_obj(objects: &[ExportObject]) -> Vec<u8> {
    let mut out = String::from("# stagecraft scene export\n");
    let mut vertex_base = 1u32;
    for object in objects {
        let Some(mesh) = PrimitiveMesh::for_kind(object.kind) else {
            continue;
        };
        let matrix = object.transform.matrix();
        let _ = writeln!(out, "o {}", sanitize_name(&object.name));
        for position in &mesh.positions {
            let world = matrix.transform_point3(*position);
            let _ = writeln!(out, "v {:.6} {:.6} {:.6}", world.x, world.y, world.z);
        }
        for tri in mesh.indices.chunks_exact(3) {
            let _ = writeln!(out, "f {} {} {}", tri[0] + vertex_base, tri[1] + vertex_base, tri[2] + vertex_base);
        }
        vertex_base += mesh.positions.len() as u32;
    }
    out.into_bytes()
}

fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "object".to_string();
    }
    trimmed.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect()
}
