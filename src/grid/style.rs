//! Cell styles and the conditional rules that pick them

use super::coerce::{coerce_float, coerce_int};
use crate::types::CellValue;
use serde::Serialize;

pub const FONT_SIZE: &str = "11px";
pub const FONT_FAMILY: &str = "Arial, sans-serif";
pub const LINE_HEIGHT: &str = "1.2";
/// Tint for the required classification columns
pub const HIGHLIGHT_BACKGROUND: &str = "#fffac8";

/// Inline CSS for one cell, in the grid's camelCase property names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl StyleDescriptor {
    /// Compact font only
    pub fn compact_font() -> Self {
        Self {
            font_size: Some(FONT_SIZE.to_string()),
            font_family: Some(FONT_FAMILY.to_string()),
            ..Self::default()
        }
    }

    /// Compact font with tight line height; the default for every cell
    pub fn compact() -> Self {
        Self {
            line_height: Some(LINE_HEIGHT.to_string()),
            ..Self::compact_font()
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_string());
        self
    }

    /// White bold text on red
    pub fn alarm(mut self) -> Self {
        self.color = Some("white".to_string());
        self.background_color = Some("red".to_string());
        self.font_weight = Some("bold".to_string());
        self
    }

    pub fn is_alarm(&self) -> bool {
        self.color.as_deref() == Some("white")
            && self.background_color.as_deref() == Some("red")
            && self.font_weight.as_deref() == Some("bold")
    }
}

/// Style chosen per cell value.
///
/// Numeric coercion mirrors the page's `parseFloat` / `parseInt`, see
/// [`coerce_float`] and [`coerce_int`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StyleRule {
    Fixed {
        style: StyleDescriptor,
    },
    GreaterThan {
        threshold: f64,
        base: StyleDescriptor,
        matched: StyleDescriptor,
    },
    EqualsInteger {
        value: i64,
        base: StyleDescriptor,
        matched: StyleDescriptor,
    },
}

impl StyleRule {
    /// Background tint for the required columns
    pub fn highlight() -> Self {
        StyleRule::Fixed {
            style: StyleDescriptor::compact_font().with_background(HIGHLIGHT_BACKGROUND),
        }
    }

    /// Alarm when the value exceeds `threshold`
    pub fn alarm_above(threshold: f64) -> Self {
        StyleRule::GreaterThan {
            threshold,
            base: StyleDescriptor::compact_font(),
            matched: StyleDescriptor::compact_font().alarm(),
        }
    }

    /// Alarm when the integer value equals `value`
    pub fn alarm_on(value: i64) -> Self {
        StyleRule::EqualsInteger {
            value,
            base: StyleDescriptor::compact_font(),
            matched: StyleDescriptor::compact_font().alarm(),
        }
    }

    pub fn style_for(&self, cell: &CellValue) -> StyleDescriptor {
        match self {
            StyleRule::Fixed { style } => style.clone(),
            StyleRule::GreaterThan {
                threshold,
                base,
                matched,
            } => match coerce_float(cell) {
                Some(n) if n > *threshold => matched.clone(),
                _ => base.clone(),
            },
            StyleRule::EqualsInteger {
                value,
                base,
                matched,
            } => match coerce_int(cell) {
                Some(n) if n == *value as f64 => matched.clone(),
                _ => base.clone(),
            },
        }
    }
}
