//! Resource loading with priority-ordered uploads.
//!
//! Creating a texture or buffer through the loader returns its handle right
//! away; the contents are uploaded later, when [`ResourceLoader::wait_for_all`]
//! drains the queue. Higher priorities upload first, and requests of equal
//! priority upload in submission order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::path::PathBuf;
use std::sync::Arc;

use skyrig_core::AssetStore;
use tracing::{debug, trace};

use crate::desc::{BufferDesc, ImageFormat, TextureCreationFlags, TextureDesc};
use crate::error::{GpuError, Result};
use crate::handle::{Buffer, Handle, ResourceId, Texture};
use crate::renderer::Renderer;

/// Upload priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Texture read from an image asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureLoadDesc {
    /// Asset path, already resolved against the texture directory.
    pub path: PathBuf,
    /// Interpret color data as sRGB.
    pub srgb: bool,
}

impl TextureLoadDesc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            srgb: true,
        }
    }
}

/// Buffer with optional initial contents.
#[derive(Clone, Debug)]
pub struct BufferLoadDesc<'a> {
    pub desc: BufferDesc,
    pub data: Option<&'a [u8]>,
}

/// Asynchronous resource loading.
pub trait ResourceLoader {
    fn load_texture(
        &mut self,
        renderer: &mut dyn Renderer,
        desc: &TextureLoadDesc,
        priority: LoadPriority,
    ) -> Result<Texture>;

    fn load_buffer(
        &mut self,
        renderer: &mut dyn Renderer,
        desc: &BufferLoadDesc<'_>,
        priority: LoadPriority,
    ) -> Result<Buffer>;

    /// Complete every queued upload.
    ///
    /// Uploads whose target was removed in the meantime are dropped.
    fn wait_for_all(&mut self, renderer: &mut dyn Renderer) -> Result<()>;

    /// Number of queued uploads.
    fn pending(&self) -> usize;

    /// Discard every queued upload without writing it. Returns how many
    /// were dropped.
    fn clear(&mut self) -> usize;
}

#[derive(Debug)]
enum UploadTarget {
    Texture(Texture),
    Buffer(Buffer),
}

impl UploadTarget {
    fn id(&self) -> ResourceId {
        match self {
            Self::Texture(t) => t.id(),
            Self::Buffer(b) => b.id(),
        }
    }
}

#[derive(Debug)]
struct PendingUpload {
    priority: LoadPriority,
    seq: u64,
    target: UploadTarget,
    data: Vec<u8>,
}

impl PartialEq for PendingUpload {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingUpload {}

impl PartialOrd for PendingUpload {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingUpload {
    // Max-heap: highest priority first, then oldest request first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Loader that decodes images from an [`AssetStore`] and queues uploads.
pub struct QueuedLoader {
    assets: Arc<dyn AssetStore>,
    queue: BinaryHeap<PendingUpload>,
    next_seq: u64,
}

impl QueuedLoader {
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Self {
            assets,
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn enqueue(&mut self, priority: LoadPriority, target: UploadTarget, data: Vec<u8>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(PendingUpload {
            priority,
            seq,
            target,
            data,
        });
    }
}

impl ResourceLoader for QueuedLoader {
    fn load_texture(
        &mut self,
        renderer: &mut dyn Renderer,
        desc: &TextureLoadDesc,
        priority: LoadPriority,
    ) -> Result<Texture> {
        let bytes = self.assets.read(&desc.path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| GpuError::ImageDecode(format!("{}: {e}", desc.path.display())))?
            .to_rgba8();

        let (format, flags) = if desc.srgb {
            (ImageFormat::Rgba8Srgb, TextureCreationFlags::SRGB)
        } else {
            (ImageFormat::Rgba8Unorm, TextureCreationFlags::empty())
        };
        let mut texture_desc = TextureDesc::new_2d(
            desc.path.to_string_lossy(),
            image.width(),
            image.height(),
            format,
        );
        texture_desc.flags = flags;

        let texture = renderer.add_texture(&texture_desc)?;
        trace!(
            "Queued texture upload {} ({}x{})",
            desc.path.display(),
            image.width(),
            image.height()
        );
        self.enqueue(priority, UploadTarget::Texture(texture), image.into_raw());
        Ok(texture)
    }

    fn load_buffer(
        &mut self,
        renderer: &mut dyn Renderer,
        desc: &BufferLoadDesc<'_>,
        priority: LoadPriority,
    ) -> Result<Buffer> {
        if let Some(data) = desc.data {
            if data.len() as u64 > desc.desc.size {
                return Err(GpuError::InvalidState(format!(
                    "buffer '{}' initial data ({} bytes) exceeds size {}",
                    desc.desc.label,
                    data.len(),
                    desc.desc.size
                )));
            }
        }

        let buffer = renderer.add_buffer(&desc.desc)?;
        if let Some(data) = desc.data {
            self.enqueue(priority, UploadTarget::Buffer(buffer), data.to_vec());
        }
        Ok(buffer)
    }

    fn wait_for_all(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let count = self.queue.len();
        while let Some(upload) = self.queue.pop() {
            if !renderer.is_alive(upload.target.id()) {
                trace!("Dropping upload for removed {:?}", upload.target.id());
                continue;
            }
            match upload.target {
                UploadTarget::Texture(texture) => renderer.write_texture(texture, &upload.data)?,
                UploadTarget::Buffer(buffer) => renderer.write_buffer(buffer, 0, &upload.data)?,
            }
        }
        if count > 0 {
            debug!("Completed {count} resource uploads");
        }
        Ok(())
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        if dropped > 0 {
            debug!("Discarded {dropped} queued uploads");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null::NullDeviceFactory;
    use crate::renderer::DeviceFactory;
    use skyrig_core::{DeviceConfig, MemoryAssets};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn uploads_drain_by_priority_then_order() {
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let mut renderer = factory.create("test", &DeviceConfig::default()).unwrap();
        let mut loader = QueuedLoader::new(Arc::new(MemoryAssets::new()));

        let data = [1u8; 16];
        let mut load = |label: &str, priority| {
            loader
                .load_buffer(
                    renderer.as_mut(),
                    &BufferLoadDesc {
                        desc: BufferDesc::vertex(label, 16),
                        data: Some(&data),
                    },
                    priority,
                )
                .unwrap()
        };
        let low = load("low", LoadPriority::Low);
        let first = load("first", LoadPriority::Normal);
        let high = load("high", LoadPriority::High);
        let second = load("second", LoadPriority::Normal);
        assert_eq!(loader.pending(), 4);

        loader.wait_for_all(renderer.as_mut()).unwrap();
        assert_eq!(loader.pending(), 0);
        assert_eq!(
            probe.write_order(),
            vec![high.id(), first.id(), second.id(), low.id()]
        );
    }

    #[test]
    fn texture_decoded_from_assets() {
        let mut assets = MemoryAssets::new();
        assets.insert("tex.png", png_bytes(4, 2));
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let mut renderer = factory.create("test", &DeviceConfig::default()).unwrap();
        let mut loader = QueuedLoader::new(Arc::new(assets));

        let texture = loader
            .load_texture(
                renderer.as_mut(),
                &TextureLoadDesc::new("tex.png"),
                LoadPriority::Normal,
            )
            .unwrap();
        loader.wait_for_all(renderer.as_mut()).unwrap();

        let record = probe.record(texture.id()).unwrap();
        assert_eq!(record.detail, "4x2 Rgba8Srgb");
        renderer.remove(texture.id());
    }

    #[test]
    fn missing_texture_is_an_error() {
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let mut renderer = factory.create("test", &DeviceConfig::default()).unwrap();
        let mut loader = QueuedLoader::new(Arc::new(MemoryAssets::new()));

        let result = loader.load_texture(
            renderer.as_mut(),
            &TextureLoadDesc::new("nope.png"),
            LoadPriority::High,
        );
        assert!(matches!(result, Err(GpuError::Asset(_))));
        assert_eq!(probe.live_count(), 0);
    }

    #[test]
    fn clear_discards_queued_uploads() {
        let mut factory = NullDeviceFactory::new();
        let device = factory.probe();
        let mut renderer = factory.create("test", &DeviceConfig::default()).unwrap();
        let mut loader = QueuedLoader::new(Arc::new(MemoryAssets::new()));

        let data = [7u8; 8];
        for label in ["a", "b"] {
            loader
                .load_buffer(
                    renderer.as_mut(),
                    &BufferLoadDesc {
                        desc: BufferDesc::vertex(label, 8),
                        data: Some(&data),
                    },
                    LoadPriority::Normal,
                )
                .unwrap();
        }
        assert_eq!(loader.clear(), 2);
        assert_eq!(loader.pending(), 0);

        loader.wait_for_all(renderer.as_mut()).unwrap();
        assert!(device.write_order().is_empty());
    }

    #[test]
    fn uploads_to_removed_targets_are_skipped() {
        let mut factory = NullDeviceFactory::new();
        let probe = factory.probe();
        let mut renderer = factory.create("test", &DeviceConfig::default()).unwrap();
        let mut loader = QueuedLoader::new(Arc::new(MemoryAssets::new()));

        let data = [0u8; 8];
        let buffer = loader
            .load_buffer(
                renderer.as_mut(),
                &BufferLoadDesc {
                    desc: BufferDesc::vertex("gone", 8),
                    data: Some(&data),
                },
                LoadPriority::Normal,
            )
            .unwrap();
        renderer.remove(buffer.id());

        loader.wait_for_all(renderer.as_mut()).unwrap();
        assert!(probe.write_order().is_empty());
    }
}
