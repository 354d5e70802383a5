//! Panels holding widgets, with layout and pointer handling.

use glam::Vec2;

use crate::widget::{snap, UiEvent, Widget, WidgetId};

pub(crate) const TITLE_HEIGHT: f32 = 24.0;
pub(crate) const ROW_HEIGHT: f32 = 28.0;
pub(crate) const PADDING: f32 = 8.0;
pub(crate) const CHECKBOX_SIZE: f32 = 16.0;
/// Fraction of a row taken by a slider track, right-aligned.
pub(crate) const SLIDER_TRACK_FRACTION: f32 = 0.55;

/// Axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Pointer state for one UI update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub position: Option<Vec2>,
    pub down: bool,
    pub just_pressed: bool,
}

/// A titled panel of widgets.
#[derive(Clone, Debug)]
pub struct GuiComponent {
    pub(crate) id: usize,
    title: String,
    position: Vec2,
    width: f32,
    widgets: Vec<Widget>,
    visible: bool,
    /// Slider being dragged, by widget index.
    drag: Option<usize>,
}

impl GuiComponent {
    pub(crate) fn new(id: usize, title: String, position: Vec2, width: f32) -> Self {
        Self {
            id,
            title,
            position,
            width,
            widgets: Vec::new(),
            visible: true,
            drag: None,
        }
    }

    pub fn add_widget(&mut self, widget: Widget) -> WidgetId {
        self.widgets.push(widget);
        WidgetId {
            component: self.id,
            index: self.widgets.len() - 1,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    #[must_use]
    pub fn widget(&self, index: usize) -> Option<&Widget> {
        self.widgets.get(index)
    }

    pub(crate) fn widget_mut(&mut self, index: usize) -> Option<&mut Widget> {
        self.widgets.get_mut(index)
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.drag = None;
        }
    }

    /// Panel bounds including the title bar.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        let height = TITLE_HEIGHT + ROW_HEIGHT * self.widgets.len() as f32 + PADDING;
        Rect::new(self.position, Vec2::new(self.width, height))
    }

    /// Bounds of the row holding widget `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        let top = self.position.y + TITLE_HEIGHT + ROW_HEIGHT * index as f32;
        Rect::new(
            Vec2::new(self.position.x + PADDING, top),
            Vec2::new(self.width - 2.0 * PADDING, ROW_HEIGHT),
        )
    }

    /// Interactive area of a slider row.
    #[must_use]
    pub fn slider_track(&self, index: usize) -> Rect {
        let row = self.row(index);
        let width = row.size().x * SLIDER_TRACK_FRACTION;
        Rect::new(
            Vec2::new(row.max.x - width, row.min.y + 6.0),
            Vec2::new(width, ROW_HEIGHT - 12.0),
        )
    }

    pub(crate) fn update(&mut self, pointer: Pointer, events: &mut Vec<UiEvent>) {
        if !self.visible {
            return;
        }
        if !pointer.down {
            self.drag = None;
        }
        let Some(position) = pointer.position else {
            return;
        };

        if pointer.just_pressed {
            let hit = (0..self.widgets.len()).find(|&i| self.row(i).contains(position));
            match hit.map(|i| (i, &mut self.widgets[i])) {
                Some((index, Widget::CheckBox { value, .. })) => {
                    *value = !*value;
                    events.push(UiEvent::Toggled {
                        id: WidgetId {
                            component: self.id,
                            index,
                        },
                        value: *value,
                    });
                }
                Some((index, Widget::SliderFloat { .. })) => {
                    if self.slider_track(index).contains(position) {
                        self.drag = Some(index);
                    }
                }
                _ => {}
            }
        }

        if let Some(index) = self.drag {
            let track = self.slider_track(index);
            let t = ((position.x - track.min.x) / track.size().x).clamp(0.0, 1.0);
            if let Some(Widget::SliderFloat {
                value,
                min,
                max,
                step,
                ..
            }) = self.widgets.get_mut(index)
            {
                let new_value = snap(*min + t * (*max - *min), *min, *max, *step);
                if (new_value - *value).abs() > f32::EPSILON {
                    *value = new_value;
                    events.push(UiEvent::ValueChanged {
                        id: WidgetId {
                            component: self.id,
                            index,
                        },
                        value: new_value,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn panel() -> GuiComponent {
        let mut component = GuiComponent::new(0, "Test".into(), Vec2::ZERO, 300.0);
        component.add_widget(Widget::checkbox("Play", true));
        component.add_widget(Widget::slider("Speed", 1.0, 0.0, 5.0, 0.0));
        component
    }

    fn click(position: Vec2) -> Pointer {
        Pointer {
            position: Some(position),
            down: true,
            just_pressed: true,
        }
    }

    #[test]
    fn click_toggles_checkbox() {
        let mut component = panel();
        let mut events = Vec::new();
        let center = (component.row(0).min + component.row(0).max) * 0.5;
        component.update(click(center), &mut events);
        assert_eq!(
            events,
            vec![UiEvent::Toggled {
                id: WidgetId {
                    component: 0,
                    index: 0
                },
                value: false
            }]
        );
    }

    #[test]
    fn dragging_slider_sets_value() {
        let mut component = panel();
        let mut events = Vec::new();
        let track = component.slider_track(1);
        let y = (track.min.y + track.max.y) * 0.5;
        component.update(click(Vec2::new(track.min.x + 1.0, y)), &mut events);

        let held = Pointer {
            position: Some(Vec2::new(track.max.x + 50.0, y)),
            down: true,
            just_pressed: false,
        };
        component.update(held, &mut events);
        let Some(UiEvent::ValueChanged { value, .. }) = events.last() else {
            panic!("no slider event: {events:?}");
        };
        assert_relative_eq!(*value, 5.0);
    }

    #[test]
    fn hidden_panel_ignores_pointer() {
        let mut component = panel();
        component.set_visible(false);
        let mut events = Vec::new();
        let center = (component.row(0).min + component.row(0).max) * 0.5;
        component.update(click(center), &mut events);
        assert!(events.is_empty());
    }
}
