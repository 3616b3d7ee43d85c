//! Render pipeline variants for topology, culling and depth testing.
//!
//! WebGPU bakes these into the pipeline, so every combination is built at
//! startup and the per-frame options only pick one.

use corelib::program::{DrawMode, RenderOptions};
use wgpu::{
    BlendState, ColorTargetState, ColorWrites, CompareFunction, DepthBiasState,
    DepthStencilState, Device, Face, FragmentState, PipelineLayout, PrimitiveState,
    PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor, ShaderModule, TextureFormat,
    VertexState,
};

use crate::mesh::GpuVertex;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub mode: DrawMode,
    pub culling: bool,
    pub depth_test: bool,
}

impl PipelineKey {
    pub const ALL: [PipelineKey; 8] = {
        let mut keys = [PipelineKey {
            mode: DrawMode::Filled,
            culling: false,
            depth_test: false,
        }; 8];
        let mut i = 0;
        while i < 8 {
            keys[i] = PipelineKey {
                mode: if (i & 4) != 0 {
                    DrawMode::Wireframe
                } else {
                    DrawMode::Filled
                },
                culling: (i & 2) != 0,
                depth_test: (i & 1) != 0,
            };
            i += 1;
        }
        keys
    };

    pub fn new(mode: DrawMode, options: RenderOptions) -> Self {
        Self {
            mode,
            culling: options.backface_culling,
            depth_test: options.depth_test,
        }
    }

    pub fn index(self) -> usize {
        let mode = match self.mode {
            DrawMode::Filled => 0,
            DrawMode::Wireframe => 4,
        };
        mode | ((self.culling as usize) << 1) | (self.depth_test as usize)
    }

    pub fn primitive(self) -> PrimitiveState {
        match self.mode {
            // Lines have no facing; culling is a no-op for them.
            DrawMode::Wireframe => PrimitiveState {
                topology: PrimitiveTopology::LineList,
                ..Default::default()
            },
            DrawMode::Filled => PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                cull_mode: self.culling.then_some(Face::Back),
                ..Default::default()
            },
        }
    }

    pub fn depth_stencil(self) -> DepthStencilState {
        DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: self.depth_test,
            depth_compare: if self.depth_test {
                CompareFunction::LessEqual
            } else {
                CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }
    }
}

pub struct Pipelines {
    variants: Vec<RenderPipeline>,
}

impl Pipelines {
    pub fn new(
        device: &Device,
        layout: &PipelineLayout,
        shader: &ShaderModule,
        color_format: TextureFormat,
    ) -> Self {
        let variants = PipelineKey::ALL
            .iter()
            .map(|key| {
                device.create_render_pipeline(&RenderPipelineDescriptor {
                    label: Some(&format!("Scene Pipeline {key:?}")),
                    layout: Some(layout),
                    vertex: VertexState {
                        module: shader,
                        entry_point: Some("vs_main"),
                        buffers: &[GpuVertex::LAYOUT],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(FragmentState {
                        module: shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(ColorTargetState {
                            format: color_format,
                            blend: Some(BlendState::REPLACE),
                            write_mask: ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: key.primitive(),
                    depth_stencil: Some(key.depth_stencil()),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
            })
            .collect();
        log::debug!("Built {} scene pipeline variants", PipelineKey::ALL.len());
        Self { variants }
    }

    pub fn get(&self, key: PipelineKey) -> &RenderPipeline {
        &self.variants[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_index_their_own_slot() {
        for (i, key) in PipelineKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn options_select_the_variant() {
        let key = PipelineKey::new(
            DrawMode::Filled,
            RenderOptions {
                backface_culling: false,
                depth_test: true,
            },
        );
        assert_eq!(key.primitive().cull_mode, None);
        assert_eq!(key.depth_stencil().depth_compare, CompareFunction::LessEqual);

        let culled = PipelineKey::new(DrawMode::Filled, RenderOptions::default());
        assert_eq!(culled.primitive().cull_mode, Some(Face::Back));
    }

    #[test]
    fn disabled_depth_test_always_passes_without_writes() {
        let key = PipelineKey {
            mode: DrawMode::Filled,
            culling: true,
            depth_test: false,
        };
        let ds = key.depth_stencil();
        assert_eq!(ds.depth_compare, CompareFunction::Always);
        assert!(!ds.depth_write_enabled);
    }

    #[test]
    fn wireframe_uses_lines() {
        let key = PipelineKey::new(DrawMode::Wireframe, RenderOptions::default());
        assert_eq!(key.primitive().topology, PrimitiveTopology::LineList);
        assert_eq!(key.primitive().cull_mode, None);
    }
}
