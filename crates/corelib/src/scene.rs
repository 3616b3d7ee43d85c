//! Static scene: ground, cube, torus, cylinder and bunny.
//!
//! Each node is one scope/upload/draw unit visited in a fixed order. There
//! is no culling or batching; uniforms are rewritten for every draw.

use crate::config::MaterialSet;
use crate::error::CoreResult;
use crate::lighting::Material;
use crate::program::{COLOR, DrawMode, Geometry, MODEL_VIEW, NORMALS, Program};
use crate::stack::MatrixStack;
use crate::transform::{LocalOp, normal_matrix};
use crate::{Mat4, Vec3, vec3};

/// Material source for a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    /// The panel-edited material of the frame.
    Shared,
    Own(Material),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub name: &'static str,
    pub geometry: Geometry,
    /// Applied in order after the parent transform.
    pub ops: Vec<LocalOp>,
    pub color: Vec3,
    pub surface: Surface,
}

impl Drawable {
    pub fn new(name: &'static str, geometry: Geometry, color: Vec3) -> Self {
        Self {
            name,
            geometry,
            ops: Vec::new(),
            color,
            surface: Surface::Shared,
        }
    }

    pub fn with(mut self, op: LocalOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    /// Draw under the current stack top; the stack is unchanged on return.
    pub fn draw(
        &self,
        stack: &mut MatrixStack,
        program: &mut impl Program,
        shared: &Material,
        mode: DrawMode,
    ) -> CoreResult<()> {
        let mut node = stack.scope();
        for op in &self.ops {
            node.apply(*op);
        }
        upload_model_view(program, node.top())?;
        program.set_uniform(COLOR, self.color.into())?;
        match &self.surface {
            Surface::Shared => shared.upload(program)?,
            Surface::Own(material) => material.upload(program)?,
        }
        log::trace!("draw {} ({:?}, {:?})", self.name, self.geometry, mode);
        program.draw(self.geometry, mode)
    }
}

/// Upload `mModelView` and the matching `mNormals`.
pub fn upload_model_view(program: &mut impl Program, model_view: Mat4) -> CoreResult<()> {
    program.set_uniform(MODEL_VIEW, model_view.into())?;
    program.set_uniform(NORMALS, normal_matrix(model_view).into())
}

pub const GROUND_COLOR: Vec3 = vec3(0.76, 0.45, 0.04);
pub const CUBE_COLOR: Vec3 = vec3(0.85, 0.068, 0.068);
pub const TORUS_COLOR: Vec3 = vec3(0.01, 0.63, 0.11);
pub const CYLINDER_COLOR: Vec3 = vec3(0.27, 0.78, 0.35);
pub const BUNNY_COLOR: Vec3 = vec3(0.95, 0.70, 0.82);

#[derive(Clone, Debug, PartialEq)]
pub struct StaticScene {
    /// Translation applied to the whole scene.
    pub world_offset: Vec3,
    pub nodes: Vec<Drawable>,
}

impl StaticScene {
    pub fn standard(world_offset: Vec3, materials: MaterialSet) -> Self {
        let own = |m: Material| match materials {
            MaterialSet::Flat => Surface::Own(Material::flat()),
            MaterialSet::Shared => Surface::Shared,
            MaterialSet::PerObject => Surface::Own(m),
        };

        let nodes = vec![
            Drawable::new("ground", Geometry::Cube, GROUND_COLOR)
                .with(LocalOp::scale(10.0, 0.5, 10.0))
                .with_surface(own(Material {
                    ks: Vec3::ZERO,
                    shininess: 1.0,
                    ..Material::default()
                })),
            Drawable::new("cube", Geometry::Cube, CUBE_COLOR)
                .with(LocalOp::translate(-2.5, 1.0, -2.5))
                .with(LocalOp::uniform_scale(2.0))
                .with_surface(own(Material::default())),
            Drawable::new("torus", Geometry::Torus, TORUS_COLOR)
                .with(LocalOp::translate(-2.5, 0.6, 2.5))
                .with(LocalOp::uniform_scale(2.0))
                .with_surface(own(Material {
                    shininess: 30.0,
                    ..Material::default()
                })),
            Drawable::new("cylinder", Geometry::Cylinder, CYLINDER_COLOR)
                .with(LocalOp::translate(2.5, 1.0, -2.5))
                .with(LocalOp::uniform_scale(2.0))
                .with_surface(own(Material {
                    kd: Vec3::splat(200.0),
                    ks: Vec3::splat(80.0),
                    shininess: 10.0,
                    ..Material::default()
                })),
            // The bunny always shows the panel material, except in flat mode.
            Drawable::new("bunny", Geometry::Bunny, BUNNY_COLOR)
                .with(LocalOp::translate(2.5, 0.25, 2.5))
                .with(LocalOp::uniform_scale(20.0))
                .with_surface(match materials {
                    MaterialSet::Flat => Surface::Own(Material::flat()),
                    _ => Surface::Shared,
                }),
        ];

        Self {
            world_offset,
            nodes,
        }
    }

    pub fn draw(
        &self,
        stack: &mut MatrixStack,
        program: &mut impl Program,
        shared: &Material,
        mode: DrawMode,
    ) -> CoreResult<()> {
        let mut world = stack.scope();
        world.translate(self.world_offset);
        for node in &self.nodes {
            node.draw(&mut world, program, shared, mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::UniformValue;
    use crate::testing::RecordingProgram;

    fn render(mode: DrawMode, materials: MaterialSet) -> RecordingProgram {
        let scene = StaticScene::standard(vec3(0.0, -0.5, 0.0), materials);
        let mut stack = MatrixStack::new();
        stack.load(Mat4::IDENTITY);
        let mut program = RecordingProgram::default();
        scene
            .draw(&mut stack, &mut program, &Material::default(), mode)
            .unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);
        program
    }

    #[test]
    fn nodes_are_drawn_in_fixed_order() {
        let program = render(DrawMode::Filled, MaterialSet::Shared);
        let order: Vec<Geometry> = program.draws.iter().map(|d| d.geometry).collect();
        assert_eq!(
            order,
            vec![
                Geometry::Cube,
                Geometry::Cube,
                Geometry::Torus,
                Geometry::Cylinder,
                Geometry::Bunny
            ]
        );
    }

    #[test]
    fn cube_transform_composes_world_offset_and_local_ops() {
        let program = render(DrawMode::Filled, MaterialSet::Shared);
        let cube = &program.draws[1];
        let expected = Mat4::from_translation(vec3(0.0, -0.5, 0.0))
            * Mat4::from_translation(vec3(-2.5, 1.0, -2.5))
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(cube.model_view().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn siblings_do_not_inherit_each_others_placement() {
        let program = render(DrawMode::Filled, MaterialSet::Shared);
        let torus = program.draws_of(Geometry::Torus)[0];
        assert!((torus.origin() - vec3(-2.5, 0.1, 2.5)).length() < 1e-5);
    }

    #[test]
    fn every_draw_gets_a_normal_matrix_for_its_own_transform() {
        let program = render(DrawMode::Filled, MaterialSet::Shared);
        for draw in &program.draws {
            let expected = normal_matrix(draw.model_view());
            match draw.uniforms.get(NORMALS) {
                Some(UniformValue::Mat3(m)) => assert!(m.abs_diff_eq(expected, 1e-5)),
                other => panic!("unexpected mNormals {other:?}"),
            }
        }
    }

    #[test]
    fn draw_mode_changes_only_topology() {
        let filled = render(DrawMode::Filled, MaterialSet::PerObject);
        let wire = render(DrawMode::Wireframe, MaterialSet::PerObject);
        assert_eq!(filled.draws.len(), wire.draws.len());
        for (f, w) in filled.draws.iter().zip(&wire.draws) {
            assert_eq!(f.mode, DrawMode::Filled);
            assert_eq!(w.mode, DrawMode::Wireframe);
            assert_eq!(f.geometry, w.geometry);
            assert_eq!(f.uniforms, w.uniforms);
        }
        assert_eq!(filled.writes, wire.writes);
    }

    #[test]
    fn shared_surface_uses_frame_material() {
        let panel = Material {
            shininess: 7.0,
            ..Material::default()
        };
        let scene = StaticScene::standard(Vec3::ZERO, MaterialSet::PerObject);
        let mut stack = MatrixStack::new();
        stack.load(Mat4::IDENTITY);
        let mut program = RecordingProgram::default();
        scene
            .draw(&mut stack, &mut program, &panel, DrawMode::Filled)
            .unwrap();

        let shininess = |d: &crate::testing::DrawRecord| d.uniforms["uMaterial.shininess"];
        let bunny = program.draws_of(Geometry::Bunny)[0];
        assert_eq!(shininess(bunny), UniformValue::Float(7.0));
        // The cube drawn before it has its own material, not the panel's.
        assert_eq!(shininess(&program.draws[1]), UniformValue::Float(100.0));
    }

    #[test]
    fn flat_scene_ignores_panel_material() {
        let panel = Material {
            shininess: 7.0,
            ..Material::default()
        };
        let scene = StaticScene::standard(Vec3::ZERO, MaterialSet::Flat);
        let mut stack = MatrixStack::new();
        stack.load(Mat4::IDENTITY);
        let mut program = RecordingProgram::default();
        scene
            .draw(&mut stack, &mut program, &panel, DrawMode::Filled)
            .unwrap();

        let flat = UniformValue::Float(Material::flat().shininess);
        for draw in &program.draws {
            assert_eq!(draw.uniforms["uMaterial.shininess"], flat);
        }
    }

    #[test]
    fn missing_uniform_aborts_but_keeps_stack_balanced() {
        let scene = StaticScene::standard(Vec3::ZERO, MaterialSet::Shared);
        let mut stack = MatrixStack::new();
        stack.load(Mat4::IDENTITY);
        let mut program = RecordingProgram::default().without(COLOR);
        let result = scene.draw(&mut stack, &mut program, &Material::default(), DrawMode::Filled);
        assert!(result.is_err());
        assert!(program.draws.is_empty());
        assert_eq!(stack.depth(), 1);
    }
}
