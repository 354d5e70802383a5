//! The UI middleware an application owns.

use std::path::PathBuf;

use glam::Vec2;
use skyrig_core::{Color, SampleCount};
use skyrig_gpu::{
    Buffer, BufferDesc, Cmd, Command, DescriptorData, DescriptorSet, DescriptorSetDesc,
    DescriptorUpdateFrequency, GraphicsPipelineDesc, Handle, ImageFormat, Pipeline,
    PrimitiveTopology, Renderer, ResourceSet, RootSignatureDesc, SamplerDesc, ShaderLoadDesc,
    Texture, TextureDesc,
};
use tracing::{debug, info, warn};

use crate::component::{GuiComponent, Pointer, CHECKBOX_SIZE, PADDING, TITLE_HEIGHT};
use crate::error::{Result, UiError};
use crate::text::{push_text, solid_uv, Font, QueuedText, TextDrawDesc, ATLAS_SIZE};
use crate::vertex::{QuadBuilder, UiVertex};
use crate::widget::{UiEvent, Widget, WidgetId};

/// Vertices drawn per frame at most.
pub const MAX_UI_VERTICES: usize = 16 * 1024;

const PANEL_COLOR: Color = Color::rgba(0.08, 0.08, 0.1, 0.85);
const TITLE_COLOR: Color = Color::rgba(0.2, 0.3, 0.55, 1.0);
const WIDGET_COLOR: Color = Color::rgba(0.3, 0.3, 0.35, 1.0);
const ACCENT_COLOR: Color = Color::rgba(0.35, 0.6, 1.0, 1.0);
const WIDGET_TEXT_SIZE: f32 = 14.0;

/// Device-dependent configuration for [`AppUi::load`].
#[derive(Clone, Debug, PartialEq)]
pub struct UiLoadDesc {
    pub color_format: ImageFormat,
    pub sample_count: SampleCount,
    /// One vertex buffer is kept per swap chain image.
    pub image_count: u32,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

#[derive(Debug)]
struct GpuBatch {
    pipeline: Pipeline,
    descriptor_set: DescriptorSet,
    atlas: Texture,
    vertex_buffers: Vec<Buffer>,
    width: u32,
    height: u32,
}

/// Panels, widgets and queued text, plus the GPU batch that draws them.
#[derive(Debug, Default)]
pub struct AppUi {
    font: Option<Font>,
    components: Vec<GuiComponent>,
    text: Vec<QueuedText>,
    gpu: Option<GpuBatch>,
}

impl AppUi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the font. Must precede [`AppUi::load`].
    pub fn init(&mut self, font_name: &str, font_bytes: &[u8]) -> Result<()> {
        if self.font.is_some() {
            warn!("UI initialized twice, replacing font");
        }
        let font = Font::parse(font_name, font_bytes)?;
        info!("UI initialized with font {}", font.name());
        self.font = Some(font);
        Ok(())
    }

    /// Drop the font, all components and queued text.
    pub fn exit(&mut self) {
        if self.gpu.is_some() {
            warn!("UI exited while still loaded");
            self.gpu = None;
        }
        self.font = None;
        self.components.clear();
        self.text.clear();
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.font.is_some()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Add a panel at `position` (pixels, top-left) `width` pixels wide.
    pub fn add_component(&mut self, title: impl Into<String>, position: Vec2, width: f32) -> usize {
        let id = self.components.len();
        self.components
            .push(GuiComponent::new(id, title.into(), position, width));
        id
    }

    #[must_use]
    pub fn component(&self, id: usize) -> Option<&GuiComponent> {
        self.components.get(id)
    }

    pub fn component_mut(&mut self, id: usize) -> Option<&mut GuiComponent> {
        self.components.get_mut(id)
    }

    #[must_use]
    pub fn components(&self) -> &[GuiComponent] {
        &self.components
    }

    pub fn add_widget(&mut self, component: usize, widget: Widget) -> Result<WidgetId> {
        self.components
            .get_mut(component)
            .map(|c| c.add_widget(widget))
            .ok_or(UiError::UnknownComponent(component))
    }

    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.components.get(id.component)?.widget(id.index)
    }

    #[must_use]
    pub fn checkbox(&self, id: WidgetId) -> Option<bool> {
        match self.widget(id)? {
            Widget::CheckBox { value, .. } => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn slider(&self, id: WidgetId) -> Option<f32> {
        match self.widget(id)? {
            Widget::SliderFloat { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Programmatic checkbox update; no event is produced.
    pub fn set_checkbox(&mut self, id: WidgetId, new_value: bool) {
        if let Some(Widget::CheckBox { value, .. }) = self.widget_mut(id) {
            *value = new_value;
        }
    }

    /// Programmatic slider update, clamped and snapped; no event is produced.
    pub fn set_slider(&mut self, id: WidgetId, new_value: f32) {
        if let Some(Widget::SliderFloat {
            value,
            min,
            max,
            step,
            ..
        }) = self.widget_mut(id)
        {
            *value = crate::widget::snap(new_value, *min, *max, *step);
        }
    }

    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.components.get_mut(id.component)?.widget_mut(id.index)
    }

    /// Handle pointer input and start a new text frame.
    ///
    /// Text queued before this call is discarded, so queue text after
    /// updating.
    pub fn update(&mut self, _dt: f32, pointer: &Pointer) -> Vec<UiEvent> {
        self.text.clear();
        let mut events = Vec::new();
        for component in &mut self.components {
            component.update(*pointer, &mut events);
        }
        events
    }

    /// Queue `text` at `position` (pixels) for the next draw.
    pub fn queue_text(&mut self, text: impl Into<String>, position: Vec2, desc: &TextDrawDesc) {
        self.text.push(QueuedText {
            text: text.into(),
            position,
            desc: *desc,
        });
    }

    /// Text queued since the last update, in draw order.
    pub fn queued_text(&self) -> impl Iterator<Item = &str> {
        self.text.iter().map(|t| t.text.as_str())
    }

    /// Create the GPU batch, tracking every object in `set`.
    pub fn load(
        &mut self,
        renderer: &mut dyn Renderer,
        set: &mut ResourceSet,
        desc: &UiLoadDesc,
    ) -> Result<()> {
        let font = self.font.as_ref().ok_or(UiError::NotInitialized)?;
        if self.gpu.is_some() {
            return Err(UiError::AlreadyLoaded);
        }

        let shader = set.track(renderer.add_shader(&ShaderLoadDesc::graphics(
            "ui",
            &desc.vertex_shader,
            &desc.fragment_shader,
        ))?);
        let sampler = set.track(renderer.add_sampler(&SamplerDesc::LINEAR_CLAMP)?);
        let root_signature = set.track(renderer.add_root_signature(&RootSignatureDesc {
            shaders: vec![shader],
            static_samplers: vec![("uSampler".into(), sampler)],
        })?);
        let descriptor_set = set.track(renderer.add_descriptor_set(&DescriptorSetDesc {
            root_signature,
            update_frequency: DescriptorUpdateFrequency::None,
            max_sets: 1,
        })?);

        let atlas = set.track(renderer.add_texture(&TextureDesc::new_2d(
            format!("ui atlas {}", font.name()),
            ATLAS_SIZE,
            ATLAS_SIZE,
            ImageFormat::R8Unorm,
        ))?);
        renderer.write_texture(atlas, font.atlas())?;
        renderer.update_descriptor_set(descriptor_set, 0, &[DescriptorData::texture("uTex", atlas)])?;

        let buffer_size = (MAX_UI_VERTICES * std::mem::size_of::<UiVertex>()) as u64;
        let mut vertex_buffers = Vec::with_capacity(desc.image_count as usize);
        for i in 0..desc.image_count {
            vertex_buffers.push(set.track(
                renderer.add_buffer(&BufferDesc::dynamic_vertex(format!("ui vertices {i}"), buffer_size))?,
            ));
        }

        let pipeline = set.track(renderer.add_pipeline(&GraphicsPipelineDesc {
            label: "ui".into(),
            shader,
            root_signature,
            vertex_layout: UiVertex::layout(),
            topology: PrimitiveTopology::TriangleList,
            depth_state: None,
            cull_mode: skyrig_gpu::CullMode::None,
            color_formats: vec![desc.color_format],
            depth_format: None,
            sample_count: desc.sample_count,
            alpha_blend: true,
        })?);

        debug!(
            "UI batch loaded: {} vertex buffers, {}x{}",
            vertex_buffers.len(),
            desc.width,
            desc.height
        );
        self.gpu = Some(GpuBatch {
            pipeline,
            descriptor_set,
            atlas,
            vertex_buffers,
            width: desc.width,
            height: desc.height,
        });
        Ok(())
    }

    /// Forget the GPU batch. Its objects are released with the owning set.
    pub fn unload(&mut self) {
        if self.gpu.take().is_some() {
            debug!("UI batch unloaded");
        }
    }

    /// Build this frame's vertices in pixel space converted to NDC.
    fn build_vertices(&self, width: u32, height: u32) -> Vec<UiVertex> {
        let mut builder = QuadBuilder::new(width, height);
        let fill = solid_uv();
        let solid = |b: &mut QuadBuilder, min: Vec2, max: Vec2, color: Color| {
            b.quad(min, max, fill, fill, color.to_abgr());
        };
        let label_desc = TextDrawDesc {
            font: 0,
            color: Color::WHITE,
            size: WIDGET_TEXT_SIZE,
        };

        for component in self.components.iter().filter(|c| c.is_visible()) {
            let bounds = component.bounds();
            solid(&mut builder, bounds.min, bounds.max, PANEL_COLOR);
            solid(
                &mut builder,
                bounds.min,
                Vec2::new(bounds.max.x, bounds.min.y + TITLE_HEIGHT),
                TITLE_COLOR,
            );
            push_text(
                &mut builder,
                component.title(),
                bounds.min + Vec2::new(PADDING, (TITLE_HEIGHT - WIDGET_TEXT_SIZE) * 0.5),
                &label_desc,
            );

            for (index, widget) in component.widgets().iter().enumerate() {
                let row = component.row(index);
                let text_y = row.min.y + (row.size().y - WIDGET_TEXT_SIZE) * 0.5;
                match widget {
                    Widget::CheckBox { label, value } => {
                        let y = row.min.y + (row.size().y - CHECKBOX_SIZE) * 0.5;
                        let min = Vec2::new(row.min.x, y);
                        solid(&mut builder, min, min + Vec2::splat(CHECKBOX_SIZE), WIDGET_COLOR);
                        if *value {
                            solid(
                                &mut builder,
                                min + Vec2::splat(3.0),
                                min + Vec2::splat(CHECKBOX_SIZE - 3.0),
                                ACCENT_COLOR,
                            );
                        }
                        let text_x = row.min.x + CHECKBOX_SIZE + PADDING;
                        push_text(&mut builder, label, Vec2::new(text_x, text_y), &label_desc);
                    }
                    Widget::SliderFloat {
                        label,
                        value,
                        min,
                        max,
                        ..
                    } => {
                        let track = component.slider_track(index);
                        solid(&mut builder, track.min, track.max, WIDGET_COLOR);
                        let t = if max > min { (value - min) / (max - min) } else { 0.0 };
                        let fill_max = Vec2::new(track.min.x + track.size().x * t, track.max.y);
                        solid(&mut builder, track.min, fill_max, ACCENT_COLOR);
                        let text = format!("{label}: {value:.2}");
                        push_text(&mut builder, &text, Vec2::new(row.min.x, text_y), &label_desc);
                    }
                    Widget::Label { text } => {
                        push_text(&mut builder, text, Vec2::new(row.min.x, text_y), &label_desc);
                    }
                    Widget::Separator => {
                        let y = row.min.y + row.size().y * 0.5;
                        solid(
                            &mut builder,
                            Vec2::new(row.min.x, y - 0.5),
                            Vec2::new(row.max.x, y + 0.5),
                            WIDGET_COLOR,
                        );
                    }
                }
            }
        }

        for queued in &self.text {
            push_text(&mut builder, &queued.text, queued.position, &queued.desc);
        }
        builder.vertices
    }

    /// Record the UI into `cmd` using the vertex buffer of `frame_index`.
    ///
    /// Render targets must already be bound.
    pub fn draw(&self, renderer: &mut dyn Renderer, cmd: Cmd, frame_index: usize) -> Result<()> {
        let gpu = self.gpu.as_ref().ok_or(UiError::NotLoaded)?;
        let mut vertices = self.build_vertices(gpu.width, gpu.height);
        if vertices.is_empty() {
            return Ok(());
        }
        if vertices.len() > MAX_UI_VERTICES {
            warn!(
                "UI produced {} vertices, drawing the first {MAX_UI_VERTICES}",
                vertices.len()
            );
            vertices.truncate(MAX_UI_VERTICES - MAX_UI_VERTICES % 6);
        }

        let buffer = gpu.vertex_buffers[frame_index % gpu.vertex_buffers.len()];
        renderer.write_buffer(buffer, 0, bytemuck::cast_slice(&vertices))?;

        renderer.record(cmd, Command::BeginMarker("Draw UI".into()))?;
        renderer.record(cmd, Command::BindPipeline(gpu.pipeline))?;
        renderer.record(
            cmd,
            Command::BindDescriptorSet {
                index: 0,
                set: gpu.descriptor_set,
            },
        )?;
        renderer.record(
            cmd,
            Command::BindVertexBuffers {
                buffers: vec![buffer],
                strides: vec![UiVertex::layout().stride],
            },
        )?;
        let vertex_count = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
        renderer.record(
            cmd,
            Command::Draw {
                vertex_count,
                first_vertex: 0,
            },
        )?;
        renderer.record(cmd, Command::EndMarker)?;
        Ok(())
    }

    /// The font atlas texture while loaded.
    #[must_use]
    pub fn atlas_texture(&self) -> Option<Texture> {
        self.gpu.as_ref().map(|g| g.atlas)
    }

    /// Ids of the GPU objects currently referenced by the batch.
    #[must_use]
    pub fn gpu_objects(&self) -> Vec<skyrig_gpu::ResourceId> {
        self.gpu.as_ref().map_or_else(Vec::new, |g| {
            let mut ids = vec![g.pipeline.id(), g.descriptor_set.id(), g.atlas.id()];
            ids.extend(g.vertex_buffers.iter().map(|b| b.id()));
            ids
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrig_core::DeviceConfig;
    use skyrig_gpu::{DeviceFactory, NullDeviceFactory, QueueDesc, ResourceKind};

    fn load_desc() -> UiLoadDesc {
        UiLoadDesc {
            color_format: ImageFormat::Bgra8Srgb,
            sample_count: SampleCount::X1,
            image_count: 3,
            width: 1280,
            height: 720,
            vertex_shader: "ui.vert".into(),
            fragment_shader: "ui.frag".into(),
        }
    }

    fn ui_with_panel() -> (AppUi, WidgetId) {
        let mut ui = AppUi::new();
        ui.init("Fonts/test.otf", b"OTTO....").unwrap();
        let panel = ui.add_component("Settings", Vec2::new(10.0, 10.0), 280.0);
        let play = ui.add_widget(panel, Widget::checkbox("Play", true)).unwrap();
        ui.add_widget(panel, Widget::slider("Speed", 1.0, 0.0, 5.0, 0.1))
            .unwrap();
        (ui, play)
    }

    #[test]
    fn queued_text_lasts_until_next_update() {
        let mut ui = AppUi::new();
        ui.queue_text("first", Vec2::ZERO, &TextDrawDesc::default());
        ui.queue_text("second", Vec2::ZERO, &TextDrawDesc::default());
        assert_eq!(ui.queued_text().collect::<Vec<_>>(), ["first", "second"]);
        ui.update(0.016, &Pointer::default());
        assert_eq!(ui.queued_text().count(), 0);
    }

    #[test]
    fn load_requires_init() {
        let mut factory = NullDeviceFactory::new();
        let mut renderer = factory.create("ui", &DeviceConfig::default()).unwrap();
        let mut set = ResourceSet::new();
        let mut ui = AppUi::new();
        assert!(matches!(
            ui.load(renderer.as_mut(), &mut set, &load_desc()),
            Err(UiError::NotInitialized)
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn load_tracks_objects_and_draw_records_batch() {
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let mut renderer = factory.create("ui", &DeviceConfig::default()).unwrap();
        let (mut ui, _) = ui_with_panel();

        let mut set = ResourceSet::new();
        ui.load(renderer.as_mut(), &mut set, &load_desc()).unwrap();
        assert!(ui.is_loaded());
        assert_eq!(set.count(ResourceKind::Buffer), 3);
        assert_eq!(set.count(ResourceKind::Pipeline), 1);
        for id in ui.gpu_objects() {
            assert!(set.contains(id));
        }

        let queue = renderer.add_queue(&QueueDesc::default()).unwrap();
        let pool = renderer.add_cmd_pool(queue).unwrap();
        let cmd = renderer.add_cmds(pool, 1).unwrap()[0];
        ui.update(0.016, &Pointer::default());
        ui.queue_text("16.7 ms", Vec2::new(8.0, 700.0), &TextDrawDesc::default());
        renderer.begin_cmd(cmd).unwrap();
        ui.draw(renderer.as_mut(), cmd, 4).unwrap();
        renderer.end_cmd(cmd).unwrap();
        renderer
            .queue_submit(
                queue,
                &skyrig_gpu::SubmitDesc {
                    cmds: vec![cmd],
                    ..Default::default()
                },
            )
            .unwrap();
        let commands = probe.last_submission();
        assert_eq!(commands.first(), Some(&Command::BeginMarker("Draw UI".into())));
        assert_eq!(commands.iter().filter(|c| c.is_draw()).count(), 1);

        ui.unload();
        set.release(renderer.as_mut());
        renderer.remove(cmd.id());
        renderer.remove(pool.id());
        renderer.remove(queue.id());
        assert_eq!(probe.live_count(), 0);
    }

    #[test]
    fn draw_before_load_is_an_error() {
        let mut factory = NullDeviceFactory::new();
        let mut renderer = factory.create("ui", &DeviceConfig::default()).unwrap();
        let (ui, _) = ui_with_panel();
        let queue = renderer.add_queue(&QueueDesc::default()).unwrap();
        let pool = renderer.add_cmd_pool(queue).unwrap();
        let cmd = renderer.add_cmds(pool, 1).unwrap()[0];
        assert!(matches!(
            ui.draw(renderer.as_mut(), cmd, 0),
            Err(UiError::NotLoaded)
        ));
        renderer.remove(cmd.id());
        renderer.remove(pool.id());
        renderer.remove(queue.id());
    }

    #[test]
    fn programmatic_values_and_pointer_events() {
        let (mut ui, play) = ui_with_panel();
        ui.set_checkbox(play, false);
        assert_eq!(ui.checkbox(play), Some(false));
        assert_eq!(ui.slider(play), None);

        let speed = WidgetId {
            component: 0,
            index: 1,
        };
        ui.set_slider(speed, 9.0);
        assert_eq!(ui.slider(speed), Some(5.0));

        let row = ui.component(0).unwrap().row(0);
        let events = ui.update(
            0.0,
            &Pointer {
                position: Some(row.min + Vec2::splat(2.0)),
                down: true,
                just_pressed: true,
            },
        );
        assert_eq!(events, vec![UiEvent::Toggled { id: play, value: true }]);
    }

    #[test]
    fn exit_clears_everything() {
        let (mut ui, _) = ui_with_panel();
        ui.exit();
        assert!(!ui.is_initialized());
        assert!(ui.components().is_empty());
        assert!(matches!(
            ui.add_widget(0, Widget::Separator),
            Err(UiError::UnknownComponent(0))
        ));
    }
}
