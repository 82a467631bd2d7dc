use compute::analysis::{Spread, Statistics};
use serde::{Deserialize, Serialize};

use crate::proportional::SymbolLayer;
use crate::symbology::{SymbolStyle, format_percent, prop_radius};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Max,
    Mean,
    Min,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::Max, SlotKind::Mean, SlotKind::Min];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Max => "max",
            SlotKind::Mean => "mean",
            SlotKind::Min => "min",
        }
    }
}

/// Fixed layout of one legend panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSpec {
    pub title: String,
    pub detail: String,
    /// Circles sit on this line: `cy = baseline - radius`.
    pub baseline: f64,
    /// Text y for the max, mean and min slots.
    pub text_y: [f64; 3],
    pub circle_x: f64,
    pub text_x: f64,
    pub width: f64,
    pub height: f64,
}

impl LegendSpec {
    pub fn renewable() -> Self {
        Self {
            title: "Renewable Energy Production".to_string(),
            detail: "(%of total)".to_string(),
            baseline: 60.0,
            text_y: [20.0, 40.0, 60.0],
            circle_x: 40.0,
            text_x: 85.0,
            width: 200.0,
            height: 100.0,
        }
    }

    pub fn fossil() -> Self {
        Self {
            title: "Fossil Fuel Energy Consumption".to_string(),
            detail: "(%of total)".to_string(),
            baseline: 80.0,
            text_y: [20.0, 47.5, 75.0],
            circle_x: 40.0,
            text_x: 85.0,
            width: 200.0,
            height: 110.0,
        }
    }
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self::renewable()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSlot {
    pub kind: SlotKind,
    pub value: Option<f64>,
    pub radius: f64,
    pub cy: f64,
    pub text: String,
}

impl LegendSlot {
    fn empty(kind: SlotKind) -> Self {
        Self {
            kind,
            value: None,
            radius: 0.0,
            cy: 0.0,
            text: String::new(),
        }
    }
}

/// Max / mean / min circles summarising one symbol layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub spec: LegendSpec,
    pub style: SymbolStyle,
    slots: [LegendSlot; 3],
    attribute: Option<String>,
}

impl Legend {
    pub fn new(spec: LegendSpec, style: SymbolStyle) -> Self {
        Self {
            spec,
            style,
            slots: SlotKind::ALL.map(LegendSlot::empty),
            attribute: None,
        }
    }

    pub fn slots(&self) -> &[LegendSlot] {
        &self.slots
    }

    pub fn slot(&self, kind: SlotKind) -> &LegendSlot {
        &self.slots[slot_position(kind)]
    }

    pub fn text_y(&self, kind: SlotKind) -> f64 {
        self.spec.text_y[slot_position(kind)]
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Recomputes the slots from `layer`'s values for `attribute`. Leaves the legend
    /// untouched and returns `None` when no marker carries a usable value.
    pub fn update(&mut self, layer: &SymbolLayer, attribute: &str) -> Option<Spread> {
        let spread = Statistics::spread(&layer.values(attribute))?;
        self.apply_spread(spread);
        self.attribute = Some(attribute.to_string());
        Some(spread)
    }

    pub fn apply_spread(&mut self, spread: Spread) {
        for slot in &mut self.slots {
            let value = match slot.kind {
                SlotKind::Max => spread.max,
                SlotKind::Mean => spread.mid,
                SlotKind::Min => spread.min,
            };
            let radius = prop_radius(value);
            slot.value = Some(value);
            slot.radius = radius;
            slot.cy = self.spec.baseline - radius;
            slot.text = format_percent(value);
        }
    }
}

fn slot_position(kind: SlotKind) -> usize {
    match kind {
        SlotKind::Max => 0,
        SlotKind::Mean => 1,
        SlotKind::Min => 2,
    }
}

/// The "Year: ..." label shown above the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalLegend {
    year: Option<String>,
}

impl TemporalLegend {
    pub fn new() -> Self {
        Self { year: None }
    }

    pub fn update(&mut self, year: &str) {
        self.year = Some(year.to_string());
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn text(&self) -> String {
        match &self.year {
            Some(year) => format!("Year: {year}"),
            None => String::new(),
        }
    }
}
