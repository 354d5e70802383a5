//! Settings-panel UI for skyrig.
//!
//! [`AppUi`] owns titled panels of widgets ([`Widget`]), turns pointer input
//! into [`UiEvent`]s, queues free-standing text and records everything as a
//! single alpha-blended batch. GPU objects are created into the caller's
//! [`ResourceSet`](skyrig_gpu::ResourceSet) so they share its lifetime.

mod app_ui;
mod component;
pub mod error;
mod text;
mod vertex;
mod widget;

pub use app_ui::{AppUi, UiLoadDesc, MAX_UI_VERTICES};
pub use component::{GuiComponent, Pointer, Rect};
pub use error::{Result, UiError};
pub use text::{Font, TextDrawDesc, ATLAS_SIZE};
pub use vertex::UiVertex;
pub use widget::{snap, UiEvent, Widget, WidgetId};
