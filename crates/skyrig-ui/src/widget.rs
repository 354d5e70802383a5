//! Widgets and the events they produce.

/// Identifies a widget across all components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId {
    pub component: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    CheckBox {
        label: String,
        value: bool,
    },
    SliderFloat {
        label: String,
        value: f32,
        min: f32,
        max: f32,
        /// Values snap to multiples of `step` above `min`; 0 disables.
        step: f32,
    },
    Label {
        text: String,
    },
    Separator,
}

impl Widget {
    pub fn checkbox(label: impl Into<String>, value: bool) -> Self {
        Self::CheckBox {
            label: label.into(),
            value,
        }
    }

    pub fn slider(label: impl Into<String>, value: f32, min: f32, max: f32, step: f32) -> Self {
        Self::SliderFloat {
            label: label.into(),
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::CheckBox { label, .. } | Self::SliderFloat { label, .. } => label,
            Self::Label { text } => text,
            Self::Separator => "",
        }
    }
}

/// Value changes caused by user interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Toggled { id: WidgetId, value: bool },
    ValueChanged { id: WidgetId, value: f32 },
}

impl UiEvent {
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        match self {
            Self::Toggled { id, .. } | Self::ValueChanged { id, .. } => *id,
        }
    }
}

/// Snap `value` into `[min, max]` on the slider's step grid.
#[must_use]
pub fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let value = value.clamp(min, max);
    if step > 0.0 {
        (min + ((value - min) / step).round() * step).clamp(min, max)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn snapping() {
        assert_relative_eq!(snap(0.26, 0.0, 1.0, 0.1), 0.3, epsilon = 1e-6);
        assert_relative_eq!(snap(7.0, 0.0, 5.0, 0.0), 5.0);
        assert_relative_eq!(snap(-3.0, -5.0, 5.0, 0.0), -3.0);
    }

    #[test]
    fn slider_starts_clamped() {
        let Widget::SliderFloat { value, .. } = Widget::slider("s", 9.0, 0.0, 2.0, 0.1) else {
            unreachable!()
        };
        assert_relative_eq!(value, 2.0);
    }
}
