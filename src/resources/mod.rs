//! Asset loading: the binary glTF scene container and image files.

pub mod texture;

use std::io::{BufReader, Cursor};

use crate::data_structures::mesh::{Instance, MeshVertex};
use crate::resources::texture::load_binary;

/// Geometry of one named node, decoded but not yet uploaded to the GPU.
#[derive(Clone, Debug)]
pub struct LoadedMesh {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// Local-to-world transform accumulated down the node hierarchy.
    pub transform: cgmath::Matrix4<f32>,
}

/// Load a `.glb` container and decode every named mesh node in it.
///
/// Only positions, UVs and indices are read; the baked scene carries no
/// normals or skinning data worth decoding.
pub async fn load_scene_gltf(file_name: &str) -> anyhow::Result<Vec<LoadedMesh>> {
    let glb = load_binary(file_name).await?;
    let glb_cursor = Cursor::new(glb);
    let glb_reader = BufReader::new(glb_cursor);
    let gltf = gltf::Gltf::from_reader(glb_reader)?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    let mut meshes = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            visit_node(node, cgmath::Matrix4::from_scale(1.0), &buffer_data, &mut meshes);
        }
    }

    Ok(meshes)
}

fn visit_node(
    node: gltf::scene::Node,
    parent: cgmath::Matrix4<f32>,
    buf: &Vec<Vec<u8>>,
    out: &mut Vec<LoadedMesh>,
) {
    let (translation, rotation, scale) = node.transform().decomposed();
    let local = Instance {
        position: translation.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    let world = parent * local.to_matrix();

    if let (Some(name), Some(mesh)) = (node.name(), node.mesh()) {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buf[buffer.index()]));
            let base = vertices.len() as u32;

            if let Some(positions) = reader.read_positions() {
                positions.for_each(|position| {
                    vertices.push(MeshVertex {
                        position,
                        tex_coords: Default::default(),
                    })
                });
            }
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                let mut tex_coord_index = base as usize;
                tex_coords.for_each(|tex_coord| {
                    vertices[tex_coord_index].tex_coords = tex_coord;
                    tex_coord_index += 1;
                });
            }
            if let Some(indices_raw) = reader.read_indices() {
                indices.extend(indices_raw.into_u32().map(|i| base + i));
            }
        }

        out.push(LoadedMesh {
            name: name.to_string(),
            vertices,
            indices,
            transform: world,
        });
    }

    for child in node.children() {
        visit_node(child, world, buf, out);
    }
}
