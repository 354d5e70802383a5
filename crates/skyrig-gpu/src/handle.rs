//! Typed resource handles.
//!
//! Every object a [`Renderer`](crate::Renderer) hands out is identified by a
//! [`ResourceId`]: a kind tag plus a device-unique index. The typed wrappers
//! keep a shader from being bound where a pipeline is expected.

use std::fmt;

/// Category of a renderer object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Queue,
    CmdPool,
    Cmd,
    Fence,
    Semaphore,
    Shader,
    Sampler,
    RootSignature,
    DescriptorSet,
    Texture,
    Buffer,
    RenderTarget,
    SwapChain,
    Pipeline,
}

/// Untyped identifier of a renderer object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    kind: ResourceKind,
    index: u64,
}

impl ResourceId {
    #[must_use]
    pub const fn new(kind: ResourceKind, index: u64) -> Self {
        Self { kind, index }
    }

    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub const fn index(self) -> u64 {
        self.index
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.index)
    }
}

/// A typed handle to a renderer object.
pub trait Handle: Copy + fmt::Debug + Into<ResourceId> {
    /// Kind of object this handle refers to.
    const KIND: ResourceKind;

    /// Wrap a raw id. The id's kind must be [`Self::KIND`].
    fn from_id(id: ResourceId) -> Self;

    /// The untyped id.
    fn id(self) -> ResourceId {
        self.into()
    }
}

macro_rules! resource_handles {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub struct $name(ResourceId);

            impl Handle for $name {
                const KIND: ResourceKind = ResourceKind::$kind;

                fn from_id(id: ResourceId) -> Self {
                    debug_assert_eq!(id.kind(), Self::KIND);
                    Self(id)
                }
            }

            impl From<$name> for ResourceId {
                fn from(handle: $name) -> Self {
                    handle.0
                }
            }
        )*
    };
}

resource_handles! {
    /// Submission queue.
    Queue => Queue,
    /// Command pool bound to a queue.
    CmdPool => CmdPool,
    /// Command buffer.
    Cmd => Cmd,
    /// CPU-waitable fence.
    Fence => Fence,
    /// GPU-GPU semaphore.
    Semaphore => Semaphore,
    /// Compiled shader program.
    Shader => Shader,
    Sampler => Sampler,
    RootSignature => RootSignature,
    DescriptorSet => DescriptorSet,
    Texture => Texture,
    Buffer => Buffer,
    RenderTarget => RenderTarget,
    SwapChain => SwapChain,
    Pipeline => Pipeline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_handle_round_trip() {
        let id = ResourceId::new(ResourceKind::Shader, 7);
        let shader = Shader::from_id(id);
        assert_eq!(shader.id(), id);
        assert_eq!(Shader::KIND, ResourceKind::Shader);
        assert_eq!(format!("{id:?}"), "Shader#7");
    }
}
