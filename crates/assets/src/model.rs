//! Decoded model data

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    fn include(&mut self, point: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }
}

/// One triangle mesh with node transforms already applied
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    /// Same length as `positions`, or empty when the source had none
    pub normals: Vec<[f32; 3]>,
    /// Same length as `positions`, or empty when the source had none
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Linear RGBA base color factor
    pub base_color: [f32; 4],
}

/// Complete decoded model, in model space
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub bounds: Bounds,
}

impl ModelData {
    pub fn new(meshes: Vec<MeshData>) -> Self {
        let mut points = meshes.iter().flat_map(|mesh| mesh.positions.iter().copied());
        let bounds = match points.next() {
            Some(first) => {
                let mut bounds = Bounds {
                    min: first,
                    max: first,
                };
                points.for_each(|point| bounds.include(point));
                bounds
            }
            None => Bounds {
                min: [0.0; 3],
                max: [0.0; 3],
            },
        };
        Self { meshes, bounds }
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.positions.len()).sum()
    }
}
