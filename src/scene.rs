//! The portal scene: node lookup, material bindings and assembled GPU state.
//!
//! The loaded environment must expose four named nodes. Their names are
//! collected once into a [`NodeTable`] and validated eagerly; a model
//! missing any of them is rejected before a single GPU resource for it is
//! created, instead of limping along with unbound geometry.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};

use crate::{
    data_structures::mesh::Mesh,
    pipelines::{
        ScenePipelines,
        baked::lightmap_layout,
        emissive::EmissiveResources,
        fireflies::FirefliesUniform,
        portal::{PortalResources, PortalUniform},
    },
    resources::{load_scene_gltf, texture::load_texture},
};

/// Node names the environment export must contain.
pub const BAKED_NODE: &str = "baked";
pub const POLE_LIGHT_L_NODE: &str = "poleLightL";
pub const POLE_LIGHT_R_NODE: &str = "poleLightR";
pub const PORTAL_NODE: &str = "portal";

const EXPECTED_NODES: [&str; 4] = [BAKED_NODE, POLE_LIGHT_L_NODE, POLE_LIGHT_R_NODE, PORTAL_NODE];

/// Default portal gradient, sRGB (#2f075f -> #a2ade2).
pub const PORTAL_COLOR_START: [f32; 3] = [0.184, 0.027, 0.373];
pub const PORTAL_COLOR_END: [f32; 3] = [0.635, 0.678, 0.886];

/// Pole lamp glass colour, sRGB (#ffffe5).
pub const POLE_LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.898];

/// Default background, sRGB (#1f2728).
pub const CLEAR_COLOR: [f32; 3] = [0.122, 0.153, 0.157];

/// Convert an sRGB component to linear. The surface format is sRGB, so
/// every colour handed to a shader or the clear value must be linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn srgb_to_linear_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [
        srgb_to_linear(rgb[0]),
        srgb_to_linear(rgb[1]),
        srgb_to_linear(rgb[2]),
    ]
}

/// Which material a node receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Baked,
    PoleLight,
    Portal,
}

/// Name-to-index lookup over the loaded nodes, built once per load.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    indices: HashMap<String, usize>,
}

impl NodeTable {
    /// Build the table from node names in load order. The first occurrence
    /// of a duplicated name wins.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut indices = HashMap::new();
        for (idx, name) in names.into_iter().enumerate() {
            indices.entry(name.into()).or_insert(idx);
        }
        Self { indices }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Expected node names absent from the table, in declaration order.
    pub fn missing_nodes(&self) -> Vec<&'static str> {
        EXPECTED_NODES
            .iter()
            .copied()
            .filter(|name| !self.indices.contains_key(*name))
            .collect()
    }
}

/// The four fixed material assignments.
///
/// `bind` validates the whole table before assigning anything, so a failed
/// bind leaves the assignment map untouched; binding the same table twice
/// reproduces the identical map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialBindings {
    assigned: BTreeMap<usize, MaterialKind>,
}

impl MaterialBindings {
    pub fn bind(&mut self, table: &NodeTable) -> Result<()> {
        let missing = table.missing_nodes();
        if !missing.is_empty() {
            bail!(
                "scene structure mismatch: expected node(s) {} not found in the loaded model",
                missing.join(", ")
            );
        }

        for (name, kind) in [
            (BAKED_NODE, MaterialKind::Baked),
            (POLE_LIGHT_L_NODE, MaterialKind::PoleLight),
            (POLE_LIGHT_R_NODE, MaterialKind::PoleLight),
            (PORTAL_NODE, MaterialKind::Portal),
        ] {
            // index_of cannot fail here, the table was just validated
            let idx = table.index_of(name).unwrap();
            self.assigned.insert(idx, kind);
        }

        Ok(())
    }

    pub fn kind_of(&self, node: usize) -> Option<MaterialKind> {
        self.assigned.get(&node).copied()
    }

    pub fn assignments(&self) -> &BTreeMap<usize, MaterialKind> {
        &self.assigned
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// CPU-side uniform state for both animated materials.
///
/// The frame loop writes `advance` once per tick; the resize handler writes
/// `set_viewport`; the tweak panel writes colours and size. GPU buffers are
/// refreshed from this struct at the start of every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneUniforms {
    pub portal: PortalUniform,
    pub fireflies: FirefliesUniform,
}

impl SceneUniforms {
    pub fn new(pixel_ratio: f32, resolution: [f32; 2]) -> Self {
        Self {
            portal: PortalUniform::new(
                srgb_to_linear_rgb(PORTAL_COLOR_START),
                srgb_to_linear_rgb(PORTAL_COLOR_END),
            ),
            fireflies: FirefliesUniform::new(pixel_ratio, 100.0, resolution),
        }
    }

    /// Push the elapsed time into both animated materials.
    pub fn advance(&mut self, elapsed: f32) {
        self.portal.time = elapsed;
        self.fireflies.time = elapsed;
    }

    /// Track the surface after a resize so firefly sprites keep a stable
    /// on-screen size across pixel densities.
    pub fn set_viewport(&mut self, pixel_ratio: f32, resolution: [f32; 2]) {
        self.fireflies.pixel_ratio = pixel_ratio;
        self.fireflies.resolution = resolution;
    }
}

/// The loaded environment: meshes, bindings and the two scene materials.
#[derive(Debug)]
pub struct PortalModel {
    meshes: Vec<Mesh>,
    bindings: MaterialBindings,
    lightmap_bind_group: wgpu::BindGroup,
    pub portal: PortalResources,
    emissive: EmissiveResources,
}

impl PortalModel {
    /// Fetch and assemble the environment.
    ///
    /// The glb container and the baked lightmap load concurrently; material
    /// binding runs before any mesh is uploaded, so a structurally broken
    /// model never reaches the GPU.
    pub async fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniforms: &SceneUniforms,
    ) -> Result<Self> {
        let (loaded, lightmap) = futures::join!(
            load_scene_gltf("portal.glb"),
            load_texture("baked.jpg", true, device, queue, Some("jpg")),
        );
        let loaded = loaded?;
        let lightmap = lightmap?;

        let table = NodeTable::from_names(loaded.iter().map(|mesh| mesh.name.clone()));
        let mut bindings = MaterialBindings::default();
        bindings.bind(&table)?;

        let meshes = loaded
            .iter()
            .map(|mesh| {
                Mesh::new(
                    device,
                    &mesh.name,
                    &mesh.vertices,
                    &mesh.indices,
                    mesh.transform,
                )
            })
            .collect();

        let lightmap_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &lightmap_layout(device),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&lightmap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(
                        lightmap.sampler.as_ref().expect("lightmap sampler"),
                    ),
                },
            ],
            label: Some("lightmap_bind_group"),
        });

        let portal = PortalResources::new(device, &uniforms.portal);
        let emissive = EmissiveResources::new(device, srgb_to_linear_rgb(POLE_LIGHT_COLOR));

        log::info!("portal scene loaded: {} node(s) bound", loaded.len());

        Ok(Self {
            meshes,
            bindings,
            lightmap_bind_group,
            portal,
            emissive,
        })
    }

    /// Draw the environment. Bind group 0 (camera) is set by the caller;
    /// opaque materials first, the blended portal surface last.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, pipelines: &ScenePipelines) {
        render_pass.set_pipeline(&pipelines.baked);
        render_pass.set_bind_group(1, &self.lightmap_bind_group, &[]);
        self.draw_kind(render_pass, MaterialKind::Baked);

        render_pass.set_pipeline(&pipelines.emissive);
        render_pass.set_bind_group(1, &self.emissive.bind_group, &[]);
        self.draw_kind(render_pass, MaterialKind::PoleLight);

        render_pass.set_pipeline(&pipelines.portal);
        render_pass.set_bind_group(1, &self.portal.bind_group, &[]);
        self.draw_kind(render_pass, MaterialKind::Portal);
    }

    fn draw_kind(&self, render_pass: &mut wgpu::RenderPass<'_>, kind: MaterialKind) {
        for (&idx, &assigned) in self.bindings.assignments() {
            if assigned == kind {
                self.meshes[idx].draw(render_pass);
            }
        }
    }
}
