//! Per-frame orchestration: camera matrices, lights, scene walk, options.

use crate::Mat4;
use crate::config::{CameraControl, SceneConfig};
use crate::error::CoreResult;
use crate::program::{PROJECTION, Program, VIEW};
use crate::scene::StaticScene;
use crate::stack::MatrixStack;
use crate::state::SceneState;

pub struct FrameDriver {
    stack: MatrixStack,
    scene: StaticScene,
}

impl FrameDriver {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            stack: MatrixStack::new(),
            scene: StaticScene::standard(config.world_offset, config.materials),
        }
    }

    /// View matrix for the current camera, orbit included when enabled.
    pub fn view_matrix(state: &SceneState) -> Mat4 {
        match state.config.camera_control {
            CameraControl::Orbit => state.camera.orbit_view(state.orbit),
            CameraControl::Presets => state.camera.view(),
        }
    }

    /// Render one frame. Camera matrices are rebuilt and render options
    /// re-applied every time; nothing is cached across frames.
    pub fn render(&mut self, state: &SceneState, program: &mut impl Program) -> CoreResult<()> {
        program.begin_frame(state.clear_color);

        let projection = state.camera.projection(state.aspect, state.zoom);
        program.set_uniform(PROJECTION, projection.into())?;
        let view = Self::view_matrix(state);
        program.set_uniform(VIEW, view.into())?;
        self.stack.load(view);

        state.lights.upload(program)?;
        state.material.upload(program)?;

        self.scene
            .draw(&mut self.stack, program, &state.material, state.mode)?;
        if state.config.robot_arm {
            state
                .arm
                .draw(&mut self.stack, program, &state.material, state.mode)?;
        }

        program.apply_options(state.options);

        assert_eq!(self.stack.depth(), 1, "matrix stack unbalanced at frame end");
        Ok(())
    }
}
