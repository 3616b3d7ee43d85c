//! Live parameter panel. Widgets edit copies of the current state; any
//! change is queued as a command and lands on the next frame.

use corelib::input::{Command, CommandQueue};
use corelib::lighting::{Light, Material};
use corelib::state::SceneState;
use corelib::{Vec3, Vec4};
use egui::{DragValue, Slider, Ui};

pub fn parameter_panel(ctx: &egui::Context, state: &SceneState, queue: &mut CommandQueue) {
    egui::Window::new("Parameters")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.collapsing("options", |ui| options_section(ui, state, queue));
            ui.collapsing("camera", |ui| camera_section(ui, state, queue));
            ui.collapsing("lights", |ui| {
                for index in 0..state.lights.count() {
                    ui.collapsing(format!("Light{}", index + 1), |ui| {
                        light_section(ui, state, index, queue);
                    });
                }
            });
            if state.config.uses_panel_material() {
                ui.collapsing("material", |ui| material_section(ui, &state.material, queue));
            }
            if state.config.robot_arm {
                ui.collapsing("arm", |ui| {
                    let a = &state.arm.angles;
                    ui.label(format!("shoulder yaw  {:>7.1}", a.shoulder_yaw));
                    ui.label(format!("elbow pitch   {:>7.1}", a.elbow_pitch));
                    ui.label(format!("wrist yaw     {:>7.1}", a.wrist_yaw));
                    ui.label(format!("claw spread   {:>7.3}", a.claw_spread));
                });
            }
        });
}

fn options_section(ui: &mut Ui, state: &SceneState, queue: &mut CommandQueue) {
    let mut options = state.options;
    ui.checkbox(&mut options.backface_culling, "backface culling");
    ui.checkbox(&mut options.depth_test, "depth test");
    if options != state.options {
        queue.push(Command::SetOptions(options));
    }
}

fn camera_section(ui: &mut Ui, state: &SceneState, queue: &mut CommandQueue) {
    let mut camera = state.camera;
    ui.add(Slider::new(&mut camera.fovy, 0.0..=100.0).text("fovy"));
    ui.add(Slider::new(&mut camera.near, 0.1..=1.0).text("near"));
    ui.add(Slider::new(&mut camera.far, 20.0..=40.0).text("far"));
    vec3_row(ui, "eye", &mut camera.eye);
    vec3_row(ui, "at", &mut camera.at);
    vec3_row(ui, "up", &mut camera.up);
    if camera != state.camera {
        queue.push(Command::SetCamera(camera));
    }
}

fn light_section(ui: &mut Ui, state: &SceneState, index: usize, queue: &mut CommandQueue) {
    let Some(current) = state.lights.get(index) else {
        return;
    };
    let mut light: Light = *current;
    vec4_row(ui, "position", &mut light.position);
    rgb255_row(ui, "ambient", &mut light.intensities.ambient);
    rgb255_row(ui, "diffuse", &mut light.intensities.diffuse);
    rgb255_row(ui, "specular", &mut light.intensities.specular);
    vec3_row(ui, "axis", &mut light.axis);
    ui.add(Slider::new(&mut light.aperture, 0.0..=180.0).text("aperture"));
    ui.add(Slider::new(&mut light.cutoff, -1.0..=100.0).text("cutoff"));
    if light != *current {
        queue.push(Command::SetLight { index, light });
    }
}

fn material_section(ui: &mut Ui, current: &Material, queue: &mut CommandQueue) {
    let mut material = *current;
    rgb255_row(ui, "Ka", &mut material.ka);
    rgb255_row(ui, "Kd", &mut material.kd);
    rgb255_row(ui, "Ks", &mut material.ks);
    ui.add(Slider::new(&mut material.shininess, 1.0..=500.0).text("shininess"));
    if material != *current {
        queue.push(Command::SetMaterial(material));
    }
}

fn vec3_row(ui: &mut Ui, label: &str, v: &mut Vec3) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(DragValue::new(&mut v.x).speed(0.1).prefix("x "));
        ui.add(DragValue::new(&mut v.y).speed(0.1).prefix("y "));
        ui.add(DragValue::new(&mut v.z).speed(0.1).prefix("z "));
    });
}

fn vec4_row(ui: &mut Ui, label: &str, v: &mut Vec4) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(DragValue::new(&mut v.x).speed(0.1).prefix("x "));
        ui.add(DragValue::new(&mut v.y).speed(0.1).prefix("y "));
        ui.add(DragValue::new(&mut v.z).speed(0.1).prefix("z "));
        ui.add(DragValue::new(&mut v.w).speed(1.0).prefix("w "));
    });
}

/// Colour picker over a 0..255 triple.
fn rgb255_row(ui: &mut Ui, label: &str, v: &mut Vec3) {
    ui.horizontal(|ui| {
        let mut rgb = to_unit_rgb(*v);
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *v = from_unit_rgb(rgb);
        }
        ui.label(label);
    });
}

fn to_unit_rgb(v: Vec3) -> [f32; 3] {
    (v / 255.0).clamp(Vec3::ZERO, Vec3::ONE).to_array()
}

fn from_unit_rgb(rgb: [f32; 3]) -> Vec3 {
    Vec3::from_array(rgb) * 255.0
}
