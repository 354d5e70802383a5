//! CPU-side scene state.
//!
//! [`Scene`] owns everything `update` touches: the animation, the camera,
//! the settings panel state and the uniform data staged for the next draw.
//! It holds no device objects, so it survives reloads and device changes.

use std::time::Instant;

use glam::{Mat4, Vec2, Vec3, Vec4};
use skyrig_animation::mesh::{self, MeshVertex};
use skyrig_animation::{
    AnimatedObject, Animation, Clip, ClipController, Rig, SkeletonBatcher, SkeletonBatcherDesc,
};
use skyrig_app::{AppError, Camera, CameraController, UpdateContext};
use skyrig_input::Action;
use skyrig_ui::{AppUi, Pointer, TextDrawDesc, UiEvent, Widget, WidgetId};
use tracing::{debug, trace_span};

use crate::skybox;
use crate::uniforms::{PlaneBlock, SkeletonBlock, SkyboxBlock, MAX_INSTANCES};

const CAMERA_POSITION: Vec3 = Vec3::new(-3.0, 3.0, 5.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const LIGHT_POSITION: Vec4 = Vec4::new(0.0, 10.0, 2.0, 0.0);
const LIGHT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.0);
const FRAME_TIME_POSITION: Vec2 = Vec2::new(8.0, 15.0);
const ANIMATION_TIME_POSITION: Vec2 = Vec2::new(8.0, 40.0);

/// Vertex data generated at init and uploaded at every load.
#[derive(Debug, Clone)]
pub struct Meshes {
    pub skybox: Vec<[f32; 4]>,
    pub plane: Vec<[f32; 6]>,
    pub joint: Vec<MeshVertex>,
    pub bone: Vec<MeshVertex>,
}

impl Meshes {
    #[must_use]
    pub fn generate() -> Self {
        Self {
            skybox: skybox::cube_vertices(),
            plane: skybox::plane_vertices(),
            joint: mesh::sphere(mesh::SPHERE_RESOLUTION),
            bone: mesh::bone(mesh::BONE_WIDTH_RATIO),
        }
    }
}

/// Widgets on the settings panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelWidgets {
    pub play: WidgetId,
    pub looping: WidgetId,
    pub animation_time: WidgetId,
    pub playback_speed: WidgetId,
    pub show_bind_pose: WidgetId,
    pub draw_bones: WidgetId,
    pub draw_plane: WidgetId,
}

impl PanelWidgets {
    fn build(ui: &mut AppUi, controller: &ClipController) -> Result<(usize, Self), AppError> {
        let panel = ui.add_component("Animation", Vec2::new(16.0, 48.0), 320.0);
        let mut add = |widget| ui.add_widget(panel, widget);

        add(Widget::label("Clip"))?;
        let play = add(Widget::checkbox("Play", controller.is_playing()))?;
        let looping = add(Widget::checkbox("Loop", controller.is_looping()))?;
        let animation_time = add(Widget::slider(
            "Animation Time",
            controller.time_ratio(),
            0.0,
            1.0,
            0.001,
        ))?;
        let playback_speed = add(Widget::slider(
            "Playback Speed",
            controller.playback_speed(),
            -5.0,
            5.0,
            0.1,
        ))?;
        add(Widget::Separator)?;
        add(Widget::label("General Settings"))?;
        let show_bind_pose = add(Widget::checkbox("Show Bind Pose", false))?;
        let draw_bones = add(Widget::checkbox("Draw Bones", false))?;
        let draw_plane = add(Widget::checkbox("Draw Plane", true))?;

        Ok((
            panel,
            Self {
                play,
                looping,
                animation_time,
                playback_speed,
                show_bind_pose,
                draw_bones,
                draw_plane,
            },
        ))
    }
}

/// Uniform data and draw counts for the next frame.
///
/// Written by `update`, read by `draw`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub skybox: SkyboxBlock,
    pub plane: PlaneBlock,
    pub joints: Box<SkeletonBlock>,
    pub bones: Box<SkeletonBlock>,
    pub joint_count: u32,
    pub bone_count: u32,
    pub draw_plane: bool,
}

impl Default for FrameData {
    fn default() -> Self {
        Self {
            skybox: SkyboxBlock {
                proj_view: Mat4::IDENTITY,
            },
            plane: PlaneBlock {
                proj_view: Mat4::IDENTITY,
                to_world: Mat4::IDENTITY,
            },
            joints: Box::default(),
            bones: Box::default(),
            joint_count: 0,
            bone_count: 0,
            draw_plane: true,
        }
    }
}

/// Animated stick figure, camera and settings.
#[derive(Debug)]
pub struct Scene {
    rig: Rig,
    animation: Animation,
    object: AnimatedObject,
    batcher: SkeletonBatcher,
    camera: Camera,
    controller: CameraController,
    panel: usize,
    widgets: PanelWidgets,
    meshes: Meshes,
    frame: FrameData,
    /// Wall time of the last animation update, in milliseconds.
    animation_update_ms: f32,
}

impl Scene {
    /// Bind `clip` to `rig` and add the settings panel to `ui`.
    pub fn new(rig: Rig, clip: Clip, ui: &mut AppUi) -> Result<Self, AppError> {
        let animation = Animation::new(&rig, clip, ClipController::new())?;
        let mut object = AnimatedObject::new(&rig);
        object.update(&rig, &animation);
        let batcher = SkeletonBatcher::new(SkeletonBatcherDesc {
            max_instances: MAX_INSTANCES,
            ..SkeletonBatcherDesc::default()
        });
        let (panel, widgets) = PanelWidgets::build(ui, animation.controller())?;
        let camera = Camera::looking_at(CAMERA_POSITION, CAMERA_TARGET);
        let controller = CameraController::new(&camera);

        debug!(
            "Scene ready: {} joints, clip '{}'",
            rig.num_joints(),
            animation.clip().name()
        );
        Ok(Self {
            rig,
            animation,
            object,
            batcher,
            camera,
            controller,
            panel,
            widgets,
            meshes: Meshes::generate(),
            frame: FrameData::default(),
            animation_update_ms: 0.0,
        })
    }

    #[must_use]
    pub const fn meshes(&self) -> &Meshes {
        &self.meshes
    }

    #[must_use]
    pub const fn frame(&self) -> &FrameData {
        &self.frame
    }

    #[must_use]
    pub const fn widgets(&self) -> &PanelWidgets {
        &self.widgets
    }

    #[must_use]
    pub const fn animation(&self) -> &Animation {
        &self.animation
    }

    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub const fn animation_update_ms(&self) -> f32 {
        self.animation_update_ms
    }

    /// Advance one frame: input, panel, animation, then staged uniforms.
    pub fn update(&mut self, ctx: &UpdateContext<'_>, ui: &mut AppUi, dt: f32) {
        let input = ctx.input;
        if input.is_action_just_pressed(Action::ResetCamera) {
            self.controller.reset(&mut self.camera);
        } else {
            self.controller
                .update(&mut self.camera, input.move_axis(), input.look_axis(), dt);
        }
        if input.is_action_just_pressed(Action::ToggleUi) {
            if let Some(panel) = ui.component_mut(self.panel) {
                panel.set_visible(!panel.is_visible());
            }
        }

        let pointer = Pointer {
            position: input.pointer(),
            down: input.pointer_button().is_pressed(),
            just_pressed: input.pointer_button().is_just_pressed(),
        };
        for event in ui.update(dt, &pointer) {
            self.apply(&event);
        }

        let started = Instant::now();
        {
            let _span = trace_span!("scene.animation_update").entered();
            self.animation.update(dt);
            self.object.update(&self.rig, &self.animation);
            self.batcher.update(&self.rig, &[&self.object]);
        }
        self.animation_update_ms = started.elapsed().as_secs_f32() * 1000.0;
        ui.set_slider(
            self.widgets.animation_time,
            self.animation.controller().time_ratio(),
        );

        self.camera.set_aspect(ctx.settings.aspect_ratio());
        self.stage();
        ui.queue_text(
            format!("CPU {:.2} ms", dt * 1000.0),
            FRAME_TIME_POSITION,
            &TextDrawDesc::default(),
        );
        ui.queue_text(
            format!("Animation Update {:.3} ms", self.animation_update_ms),
            ANIMATION_TIME_POSITION,
            &TextDrawDesc::default(),
        );
    }

    /// React to a panel change.
    pub fn apply(&mut self, event: &UiEvent) {
        let w = self.widgets;
        let controller = self.animation.controller_mut();
        match *event {
            UiEvent::Toggled { id, value } if id == w.play => controller.set_playing(value),
            UiEvent::Toggled { id, value } if id == w.looping => controller.set_looping(value),
            UiEvent::ValueChanged { id, value } if id == w.animation_time => {
                controller.set_time_ratio_hard(value);
            }
            UiEvent::ValueChanged { id, value } if id == w.playback_speed => {
                controller.set_playback_speed(value);
            }
            UiEvent::Toggled { id, value } if id == w.show_bind_pose => {
                self.object.set_show_bind_pose(value);
            }
            UiEvent::Toggled { id, value } if id == w.draw_bones => {
                self.batcher.set_draw_bones(value);
            }
            UiEvent::Toggled { id, value } if id == w.draw_plane => self.frame.draw_plane = value,
            _ => {}
        }
    }

    fn stage(&mut self) {
        let proj_view = self.camera.view_projection_matrix();
        let batch = self.batcher.batch();
        let frame = &mut self.frame;

        frame.skybox.proj_view = self.camera.sky_view_projection_matrix();
        frame.plane = PlaneBlock {
            proj_view,
            to_world: Mat4::IDENTITY,
        };
        frame.joint_count = frame
            .joints
            .fill(proj_view, LIGHT_POSITION, LIGHT_COLOR, &batch.joints);
        frame.bone_count = frame
            .bones
            .fill(proj_view, LIGHT_POSITION, LIGHT_COLOR, &batch.bones);
    }
}
