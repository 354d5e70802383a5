//! Creation descriptors for renderer objects.

use std::path::PathBuf;

use bitflags::bitflags;
use raw_window_handle::RawWindowHandle;
use skyrig_core::SampleCount;

use crate::handle::{Buffer, Queue, RootSignature, Sampler, Shader, Texture};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueueType {
    #[default]
    Graphics,
    Compute,
    Transfer,
}

bitflags! {
    /// Queue creation flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct QueueFlags: u32 {
        /// Attach GPU timestamp queries for profiling.
        const INIT_PROFILER = 1 << 0;
        /// Never time out waiting on this queue.
        const DISABLE_GPU_TIMEOUT = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueDesc {
    pub queue_type: QueueType,
    pub flags: QueueFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderStageDesc {
    pub stage: ShaderStage,
    /// Source path, already resolved against the shader directory.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderLoadDesc {
    pub name: String,
    pub stages: Vec<ShaderStageDesc>,
}

impl ShaderLoadDesc {
    /// Vertex + fragment program.
    pub fn graphics(
        name: impl Into<String>,
        vertex: impl Into<PathBuf>,
        fragment: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            stages: vec![
                ShaderStageDesc {
                    stage: ShaderStage::Vertex,
                    path: vertex.into(),
                },
                ShaderStageDesc {
                    stage: ShaderStage::Fragment,
                    path: fragment.into(),
                },
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MipmapMode {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Repeat,
    Mirror,
    ClampToEdge,
    ClampToBorder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmap_mode: MipmapMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
}

impl SamplerDesc {
    /// Trilinear filtering with wrapping coordinates.
    pub const LINEAR_REPEAT: Self = Self::linear(AddressMode::Repeat);
    /// Trilinear filtering clamped to the edge; used for cube faces.
    pub const LINEAR_CLAMP: Self = Self::linear(AddressMode::ClampToEdge);

    const fn linear(address: AddressMode) -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            mipmap_mode: MipmapMode::Linear,
            address_u: address,
            address_v: address,
            address_w: address,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootSignatureDesc {
    pub shaders: Vec<Shader>,
    /// Samplers baked into the signature, by shader binding name.
    pub static_samplers: Vec<(String, Sampler)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorUpdateFrequency {
    /// Written once after creation.
    None,
    PerFrame,
    PerBatch,
    PerDraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorSetDesc {
    pub root_signature: RootSignature,
    pub update_frequency: DescriptorUpdateFrequency,
    pub max_sets: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorResource {
    Textures(Vec<Texture>),
    Buffers(Vec<Buffer>),
    Samplers(Vec<Sampler>),
}

/// One named binding written into a descriptor set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorData {
    pub name: String,
    pub resource: DescriptorResource,
}

impl DescriptorData {
    pub fn texture(name: impl Into<String>, texture: Texture) -> Self {
        Self {
            name: name.into(),
            resource: DescriptorResource::Textures(vec![texture]),
        }
    }

    pub fn buffer(name: impl Into<String>, buffer: Buffer) -> Self {
        Self {
            name: name.into(),
            resource: DescriptorResource::Buffers(vec![buffer]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    R8Unorm,
    Rgba8Unorm,
    Rgba8Srgb,
    Bgra8Unorm,
    Bgra8Srgb,
    D32Float,
}

impl ImageFormat {
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::R8Unorm => 1,
            Self::Rgba8Unorm
            | Self::Rgba8Srgb
            | Self::Bgra8Unorm
            | Self::Bgra8Srgb
            | Self::D32Float => 4,
        }
    }

    #[must_use]
    pub const fn is_depth(self) -> bool {
        matches!(self, Self::D32Float)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextureCreationFlags: u32 {
        const SRGB = 1 << 0;
        /// Keep the attachment in tile memory where the hardware allows.
        const ON_TILE = 1 << 1;
        const ALLOW_DISPLAY_TARGET = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_size: u32,
    pub mip_levels: u32,
    pub format: ImageFormat,
    pub flags: TextureCreationFlags,
}

impl TextureDesc {
    /// Single-mip 2D texture.
    pub fn new_2d(label: impl Into<String>, width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            depth: 1,
            array_size: 1,
            mip_levels: 1,
            format,
            flags: TextureCreationFlags::empty(),
        }
    }

    /// Size in bytes of the top mip level.
    #[must_use]
    pub const fn byte_size(&self) -> u64 {
        self.width as u64
            * self.height as u64
            * self.depth as u64
            * self.array_size as u64
            * self.format.bytes_per_pixel() as u64
    }
}

bitflags! {
    /// How a buffer may be bound.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DescriptorType: u32 {
        const VERTEX_BUFFER = 1 << 0;
        const INDEX_BUFFER = 1 << 1;
        const UNIFORM_BUFFER = 1 << 2;
        const RW_BUFFER = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResourceMemoryUsage {
    #[default]
    GpuOnly,
    CpuToGpu,
    GpuToCpu,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BufferCreationFlags: u32 {
        /// Keep the buffer mapped for its whole lifetime.
        const PERSISTENT_MAP = 1 << 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferDesc {
    pub label: String,
    pub size: u64,
    pub descriptors: DescriptorType,
    pub memory_usage: ResourceMemoryUsage,
    pub flags: BufferCreationFlags,
}

impl BufferDesc {
    /// Static vertex buffer living in device memory.
    pub fn vertex(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: label.into(),
            size,
            descriptors: DescriptorType::VERTEX_BUFFER,
            memory_usage: ResourceMemoryUsage::GpuOnly,
            flags: BufferCreationFlags::empty(),
        }
    }

    /// Persistently mapped uniform buffer written by the CPU every frame.
    pub fn uniform(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: label.into(),
            size,
            descriptors: DescriptorType::UNIFORM_BUFFER,
            memory_usage: ResourceMemoryUsage::CpuToGpu,
            flags: BufferCreationFlags::PERSISTENT_MAP,
        }
    }

    /// CPU-writable vertex buffer rebuilt every frame.
    pub fn dynamic_vertex(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: label.into(),
            size,
            descriptors: DescriptorType::VERTEX_BUFFER,
            memory_usage: ResourceMemoryUsage::CpuToGpu,
            flags: BufferCreationFlags::PERSISTENT_MAP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClearValue {
    Color([f32; 4]),
    DepthStencil { depth: f32, stencil: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderTargetDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub sample_count: SampleCount,
    pub clear_value: ClearValue,
    pub flags: TextureCreationFlags,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwapChainDesc {
    /// Native window to present into. `None` for offscreen presentation.
    pub window: Option<RawWindowHandle>,
    pub present_queue: Queue,
    pub width: u32,
    pub height: u32,
    pub image_count: u32,
    pub color_format: ImageFormat,
    pub clear_value: ClearValue,
    pub vsync: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
    TriangleStrip,
    LineList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
    UByte4Norm,
}

impl VertexFormat {
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::UByte4Norm => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttrib {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u32,
}

/// Interleaved single-binding vertex layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub stride: u32,
    pub attribs: Vec<VertexAttrib>,
}

impl VertexLayout {
    /// Tightly packed layout with consecutive locations.
    #[must_use]
    pub fn packed(formats: &[VertexFormat]) -> Self {
        let mut offset = 0;
        let attribs = formats
            .iter()
            .zip(0u32..)
            .map(|(&format, location)| {
                let attrib = VertexAttrib {
                    location,
                    format,
                    offset,
                };
                offset += format.size();
                attrib
            })
            .collect();
        Self {
            stride: offset,
            attribs,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CullMode {
    #[default]
    None,
    Back,
    Front,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DepthState {
    pub test: bool,
    pub write: bool,
    pub compare: CompareOp,
}

impl DepthState {
    /// Reverse-Z depth test with writes, matching a depth buffer cleared to 0.
    pub const REVERSE_Z: Self = Self {
        test: true,
        write: true,
        compare: CompareOp::GreaterEqual,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsPipelineDesc {
    pub label: String,
    pub shader: Shader,
    pub root_signature: RootSignature,
    pub vertex_layout: VertexLayout,
    pub topology: PrimitiveTopology,
    pub depth_state: Option<DepthState>,
    pub cull_mode: CullMode,
    pub color_formats: Vec<ImageFormat>,
    pub depth_format: Option<ImageFormat>,
    pub sample_count: SampleCount,
    pub alpha_blend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout_offsets() {
        let layout = VertexLayout::packed(&[VertexFormat::Float3, VertexFormat::Float3]);
        assert_eq!(layout.stride, 24);
        assert_eq!(layout.attribs[1].offset, 12);
        assert_eq!(layout.attribs[1].location, 1);
    }

    #[test]
    fn texture_byte_size() {
        let desc = TextureDesc::new_2d("t", 4, 2, ImageFormat::Rgba8Unorm);
        assert_eq!(desc.byte_size(), 32);
    }
}
