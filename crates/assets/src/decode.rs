//! glTF / GLB decoding into [`ModelData`]
//!
//! Node transforms are baked into vertex data so a model can be drawn as a
//! flat list of meshes under a single entity transform. Only triangle-list
//! primitives are kept.

use std::path::Path;

use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;
use tracing::debug;

use crate::error::ModelLoadError;
use crate::model::{MeshData, ModelData};

/// Decode glTF JSON or binary GLB bytes.
///
/// `base` is the directory external buffer URIs resolve against. Without it
/// only embedded and data-URI buffers load.
pub fn decode_gltf(path: &str, bytes: &[u8], base: Option<&Path>) -> Result<ModelData, ModelLoadError> {
    let decode_err = |e: gltf::Error| ModelLoadError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(decode_err)?;
    let buffers = gltf::import_buffers(&document, base, blob).map_err(decode_err)?;

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        return Err(ModelLoadError::Empty {
            path: path.to_string(),
        });
    };

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
    }

    if meshes.is_empty() {
        return Err(ModelLoadError::Empty {
            path: path.to_string(),
        });
    }

    let model = ModelData::new(meshes);
    debug!(
        "Decoded {}: {} meshes, {} vertices",
        path,
        model.meshes.len(),
        model.vertex_count()
    );
    Ok(model)
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                debug!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
                continue;
            }
            if let Some(data) = read_primitive(&primitive, buffers, world, normal_matrix) {
                out.push(MeshData {
                    name: mesh.name().map(str::to_string),
                    ..data
                });
            }
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    world: Mat4,
    normal_matrix: Mat3,
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from_array(p)).to_array())
        .collect();
    if positions.is_empty() {
        return None;
    }

    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|normals| {
            normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero().to_array())
                .collect()
        })
        .unwrap_or_default();

    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|uvs| uvs.into_f32().collect())
        .unwrap_or_default();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() < 3 {
        return None;
    }

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Some(MeshData {
        name: None,
        positions,
        normals,
        uvs,
        indices,
        base_color,
    })
}
