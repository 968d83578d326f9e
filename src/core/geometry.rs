use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    // Two triangles per cell of a (cols+1) x (rows+1) vertex lattice.
    fn push_lattice_indices(&mut self, cols: u32, rows: u32) {
        let stride = cols + 1;
        for j in 0..rows {
            for i in 0..cols {
                let a = j * stride + i;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }
    }
}

/// Flat grid on the floor plane, centered laterally on `center_x`.
///
/// Vertices carry their along-axis coordinate in `position.z`, running from
/// `-length/2` (near end) to `+length/2` (far end); the vertex stage maps that
/// onto world depth. `uv.x` spans the width, `uv.y` the length.
pub fn floor_grid(center_x: f32, width: f32, length: f32, seg_x: u32, seg_z: u32) -> Mesh {
    let seg_x = seg_x.max(1);
    let seg_z = seg_z.max(1);
    let mut mesh = Mesh::default();
    mesh.vertices.reserve(((seg_x + 1) * (seg_z + 1)) as usize);
    for j in 0..=seg_z {
        let v = j as f32 / seg_z as f32;
        let along = -length * 0.5 + length * v;
        for i in 0..=seg_x {
            let u = i as f32 / seg_x as f32;
            let x = center_x - width * 0.5 + width * u;
            mesh.vertices.push(MeshVertex {
                position: [x, 0.0, along],
                uv: [u, v],
            });
        }
    }
    mesh.push_lattice_indices(seg_x, seg_z);
    mesh
}

/// Open tube of radius 1 from z = 0 to z = -1. `uv.x` runs along the tube.
pub fn unit_tube(segments: u32, radial: u32) -> Mesh {
    let segments = segments.max(1);
    let radial = radial.max(3);
    let mut mesh = Mesh::default();
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        for r in 0..=radial {
            let v = r as f32 / radial as f32;
            let (s, c) = (v * TAU).sin_cos();
            mesh.vertices.push(MeshVertex {
                position: [c, s, -u],
                uv: [u, v],
            });
        }
    }
    mesh.push_lattice_indices(radial, segments);
    mesh
}

/// Unit quad in the XY plane, centered on the origin.
pub fn unit_quad() -> Mesh {
    let corners = [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)];
    let mut mesh = Mesh::default();
    for (x, y) in corners {
        mesh.vertices.push(MeshVertex {
            position: [x, y, 0.0],
            uv: [x + 0.5, y + 0.5],
        });
    }
    mesh.push_lattice_indices(1, 1);
    mesh
}
