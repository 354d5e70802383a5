//! Ordered ownership of renderer objects.

use tracing::{debug, warn};

use crate::handle::{Handle, ResourceId, ResourceKind};
use crate::renderer::Renderer;

/// Objects owned by one lifecycle scope, in creation order.
///
/// Released in reverse creation order so dependants go before the objects
/// they were built from.
#[derive(Debug, Default)]
pub struct ResourceSet {
    ids: Vec<ResourceId>,
}

impl ResourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set with `f`, all or nothing.
    ///
    /// If `f` fails, every object it tracked is released before the error is
    /// returned.
    pub fn build<T, E>(
        renderer: &mut dyn Renderer,
        f: impl FnOnce(&mut dyn Renderer, &mut Self) -> Result<T, E>,
    ) -> Result<(Self, T), E> {
        let mut set = Self::new();
        match f(&mut *renderer, &mut set) {
            Ok(value) => Ok((set, value)),
            Err(e) => {
                debug!("Rolling back {} partially created resources", set.len());
                set.release(renderer);
                Err(e)
            }
        }
    }

    /// Take ownership of a handle and pass it back.
    pub fn track<H: Handle>(&mut self, handle: H) -> H {
        self.ids.push(handle.id());
        handle
    }

    /// Take ownership of several handles.
    pub fn track_all<H: Handle>(&mut self, handles: Vec<H>) -> Vec<H> {
        self.ids.extend(handles.iter().map(|h| h.id()));
        handles
    }

    /// Move every object from `other` into this set.
    pub fn absorb(&mut self, mut other: Self) {
        self.ids.append(&mut other.ids);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ResourceId] {
        &self.ids
    }

    /// Number of tracked objects of a kind.
    #[must_use]
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.ids.iter().filter(|id| id.kind() == kind).count()
    }

    /// Release everything, newest first.
    pub fn release(&mut self, renderer: &mut dyn Renderer) {
        for id in self.ids.drain(..).rev() {
            renderer.remove(id);
        }
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        if !self.ids.is_empty() {
            warn!(
                "ResourceSet dropped while still owning {} objects",
                self.ids.len()
            );
        }
    }
}
