use std::f64::consts::PI;

use formats::AttributeSchema;
use serde::{Deserialize, Serialize};

use crate::popup::PopupSchema;

/// Area multiplier applied before taking the radius.
pub const SCALE_FACTOR: f64 = 50.0;

/// Radius of a circle whose area is proportional to `value`.
///
/// Unguarded: negative values give NaN.
pub fn prop_radius(value: f64) -> f64 {
    let area = value * SCALE_FACTOR;
    (area / PI).sqrt()
}

/// Rounds half up to two decimals, the way the popups and legends print values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", round2(value))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Theme {
    Renewable,
    Fossil,
}

/// Tokens that identify which dataset an attribute belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTokens {
    pub renewable: String,
    pub fossil: String,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        Self {
            renewable: "ren".to_string(),
            fossil: "ff".to_string(),
        }
    }
}

impl ThemeTokens {
    /// Renewable wins when both tokens occur.
    pub fn classify(&self, attribute: &str) -> Option<Theme> {
        if !self.renewable.is_empty() && attribute.contains(self.renewable.as_str()) {
            Some(Theme::Renewable)
        } else if !self.fossil.is_empty() && attribute.contains(self.fossil.as_str()) {
            Some(Theme::Fossil)
        } else {
            None
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Fill and stroke of a proportional symbol.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SymbolStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl SymbolStyle {
    pub const fn renewable() -> Self {
        Self {
            fill: Rgb(0x31, 0xa3, 0x54),
            stroke: Rgb(0x00, 0x6d, 0x2c),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }

    pub const fn fossil() -> Self {
        Self {
            fill: Rgb(0x63, 0x63, 0x63),
            stroke: Rgb(0x00, 0x00, 0x00),
            weight: 1.0,
            opacity: 0.7,
            fill_opacity: 0.5,
        }
    }

    /// Green for renewable attributes, gray for everything else.
    pub fn for_attribute(attribute: &str, tokens: &ThemeTokens) -> Self {
        match tokens.classify(attribute) {
            Some(Theme::Renewable) => Self::renewable(),
            _ => Self::fossil(),
        }
    }
}

/// Everything needed to turn an attribute into a styled, labelled symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbology {
    pub tokens: ThemeTokens,
    pub attributes: AttributeSchema,
    pub popup: PopupSchema,
}
