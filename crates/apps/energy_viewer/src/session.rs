use compute::analysis::{Spread, Statistics};
use formats::{AttributePair, AttributePairs, Dataset, extract_attributes};
use layers::{Legend, Popup, SymbolLayer, SymbolStyle, Symbology, TemporalLegend, Theme};
use runtime::{EventBus, EventKind, SequenceIndex, Step};
use tracing::{debug, info, warn};

use crate::config::{MapConfig, OverlayConfig};
use crate::loading::LoadedDatasets;

/// One dataset's symbols, legend and toggle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub theme: Theme,
    pub title: String,
    pub attribution: String,
    pub layer: SymbolLayer,
    pub legend: Legend,
    pub visible: bool,
}

impl Overlay {
    fn build(
        theme: Theme,
        id: u64,
        dataset: &Dataset,
        attributes: &[String],
        config: &OverlayConfig,
        symbology: &Symbology,
    ) -> Self {
        let style = match theme {
            Theme::Renewable => SymbolStyle::renewable(),
            Theme::Fossil => SymbolStyle::fossil(),
        };
        Self {
            theme,
            title: config.title.clone(),
            attribution: config.attribution.clone(),
            layer: SymbolLayer::build(id, dataset, attributes, symbology),
            legend: Legend::new(config.legend.clone(), style),
            visible: true,
        }
    }
}

/// What one overlay did during a transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayUpdate {
    pub attribute: Option<String>,
    pub markers: usize,
    pub spread: Option<Spread>,
}

/// Result of applying the active index to both overlays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Applied {
    pub index: usize,
    pub year: Option<String>,
    pub renewable: OverlayUpdate,
    pub fossil: OverlayUpdate,
}

/// The map session: both overlays, their legends, the year label and the
/// active index that keeps them on the same year.
#[derive(Debug)]
pub struct MapSession {
    symbology: Symbology,
    pairs: AttributePairs,
    renewable: Option<Overlay>,
    fossil: Option<Overlay>,
    year_label: TemporalLegend,
    sequence: SequenceIndex,
    base_layer: String,
    base_layers: Vec<String>,
    events: EventBus,
    step_count: u64,
}

impl MapSession {
    /// Builds layers and legends from whatever loaded, then shows the first year.
    pub fn new(loaded: LoadedDatasets, config: &MapConfig) -> Self {
        let symbology = config.symbology.clone();
        let schema = &symbology.attributes;

        let ren_attrs = loaded
            .renewable
            .as_ref()
            .map(|ds| extract_attributes(ds, schema));
        let fos_attrs = loaded
            .fossil
            .as_ref()
            .map(|ds| extract_attributes(ds, schema));
        debug!(attributes = ?ren_attrs, "renewable attributes");
        debug!(attributes = ?fos_attrs, "fossil attributes");

        let pairs = AttributePairs::build(ren_attrs.as_deref(), fos_attrs.as_deref(), schema);
        if pairs.is_empty() {
            warn!("no year attributes found; the slider has nothing to show");
        }

        let renewable = loaded.renewable.as_ref().map(|ds| {
            Overlay::build(
                Theme::Renewable,
                1,
                ds,
                ren_attrs.as_deref().unwrap_or_default(),
                &config.renewable,
                &symbology,
            )
        });
        let fossil = loaded.fossil.as_ref().map(|ds| {
            Overlay::build(
                Theme::Fossil,
                2,
                ds,
                fos_attrs.as_deref().unwrap_or_default(),
                &config.fossil,
                &symbology,
            )
        });

        let mut session = Self {
            sequence: SequenceIndex::new(pairs.len()),
            symbology,
            pairs,
            renewable,
            fossil,
            year_label: TemporalLegend::new(),
            base_layer: config.default_base.clone(),
            base_layers: config.base_layers.iter().map(|b| b.name.clone()).collect(),
            events: EventBus::new(),
            step_count: 0,
        };
        let applied = session.apply_current();
        info!(
            years = session.pairs.len(),
            renewable_markers = applied.renewable.markers,
            fossil_markers = applied.fossil.markers,
            "session ready"
        );
        session
    }

    /// Moves the active index and brings both overlays to the new year.
    pub fn step(&mut self, step: Step) -> Applied {
        let index = self.sequence.apply(step);
        self.step_count += 1;
        debug!(%step, index, "sequence transition");
        self.events
            .emit(self.step_count, EventKind::Transition, format!("{step} -> {index}"));
        self.apply_current()
    }

    fn apply_current(&mut self) -> Applied {
        let index = self.sequence.index();
        let Some(pair) = self.pairs.get(index).cloned() else {
            warn!(
                index,
                years = self.pairs.len(),
                "no attributes at this index; display unchanged"
            );
            self.events.emit(
                self.step_count,
                EventKind::Skip,
                format!("index {index} has no attribute pair"),
            );
            return Applied {
                index,
                ..Applied::default()
            };
        };

        let renewable = apply_overlay(
            self.renewable.as_mut(),
            pair.renewable.as_deref(),
            &self.symbology,
            &mut self.events,
            self.step_count,
        );
        let fossil = apply_overlay(
            self.fossil.as_mut(),
            pair.fossil.as_deref(),
            &self.symbology,
            &mut self.events,
            self.step_count,
        );

        if let Some(year) = &pair.year
            && (renewable.markers > 0 || fossil.markers > 0)
        {
            self.year_label.update(year);
        }

        Applied {
            index,
            year: pair.year,
            renewable,
            fossil,
        }
    }

    /// Opens the popups of every visible marker named `name`.
    pub fn hover(&mut self, name: &str) -> Vec<Popup> {
        let name_field = self.symbology.popup.name_field.clone();
        let mut opened = Vec::new();
        for overlay in [self.renewable.as_mut(), self.fossil.as_mut()]
            .into_iter()
            .flatten()
            .filter(|o| o.visible)
        {
            for i in overlay.layer.find(name, &name_field) {
                if let Some(popup) = overlay.layer.pointer_enter(i) {
                    opened.push(popup.clone());
                }
            }
        }
        opened
    }

    /// Closes the popups of markers named `name`. Returns how many were open.
    pub fn leave(&mut self, name: &str) -> usize {
        let name_field = self.symbology.popup.name_field.clone();
        let mut closed = 0;
        for overlay in [self.renewable.as_mut(), self.fossil.as_mut()]
            .into_iter()
            .flatten()
        {
            for i in overlay.layer.find(name, &name_field) {
                if overlay.layer.pointer_leave(i) {
                    closed += 1;
                }
            }
        }
        closed
    }

    pub fn set_base_layer(&mut self, name: &str) -> bool {
        match self
            .base_layers
            .iter()
            .find(|b| b.eq_ignore_ascii_case(name.trim()))
        {
            Some(found) => {
                self.base_layer = found.clone();
                true
            }
            None => false,
        }
    }

    /// Returns `false` when that overlay never loaded.
    pub fn set_overlay_visible(&mut self, theme: Theme, visible: bool) -> bool {
        match self.overlay_mut(theme) {
            Some(overlay) => {
                overlay.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn overlay(&self, theme: Theme) -> Option<&Overlay> {
        match theme {
            Theme::Renewable => self.renewable.as_ref(),
            Theme::Fossil => self.fossil.as_ref(),
        }
    }

    fn overlay_mut(&mut self, theme: Theme) -> Option<&mut Overlay> {
        match theme {
            Theme::Renewable => self.renewable.as_mut(),
            Theme::Fossil => self.fossil.as_mut(),
        }
    }

    /// Loaded overlays in draw order: fossil below renewable.
    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        [self.fossil.as_ref(), self.renewable.as_ref()]
            .into_iter()
            .flatten()
    }

    pub fn pairs(&self) -> &AttributePairs {
        &self.pairs
    }

    pub fn current_pair(&self) -> Option<&AttributePair> {
        self.pairs.get(self.sequence.index())
    }

    pub fn sequence(&self) -> &SequenceIndex {
        &self.sequence
    }

    pub fn year_label(&self) -> &TemporalLegend {
        &self.year_label
    }

    pub fn base_layer(&self) -> &str {
        &self.base_layer
    }

    pub fn base_layers(&self) -> &[String] {
        &self.base_layers
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn symbology(&self) -> &Symbology {
        &self.symbology
    }

    /// One line per loaded legend, e.g. `Renewable Energy Production: max 90% / mean 50% / min 10%`.
    pub fn legend_summary(&self) -> Vec<String> {
        [self.renewable.as_ref(), self.fossil.as_ref()]
            .into_iter()
            .flatten()
            .map(|o| {
                let parts: Vec<String> = o
                    .legend
                    .slots()
                    .iter()
                    .map(|s| {
                        let text = if s.text.is_empty() { "-" } else { s.text.as_str() };
                        format!("{} {text}", s.kind.as_str())
                    })
                    .collect();
                format!("{}: {}", o.legend.spec.title, parts.join(" / "))
            })
            .collect()
    }
}

fn apply_overlay(
    overlay: Option<&mut Overlay>,
    attribute: Option<&str>,
    symbology: &Symbology,
    events: &mut EventBus,
    step: u64,
) -> OverlayUpdate {
    let Some(overlay) = overlay else {
        return OverlayUpdate::default();
    };
    let Some(attribute) = attribute else {
        warn!(overlay = %overlay.title, "no attribute for this year");
        events.emit(step, EventKind::Skip, format!("{}: no attribute", overlay.title));
        return OverlayUpdate::default();
    };

    let markers = overlay.layer.apply_attribute(attribute, symbology);
    if markers == 0 {
        warn!(overlay = %overlay.title, attribute, "attribute missing from every feature");
        events.emit(
            step,
            EventKind::Skip,
            format!("{}: {attribute} missing", overlay.title),
        );
        return OverlayUpdate {
            attribute: Some(attribute.to_string()),
            markers,
            spread: None,
        };
    }

    let spread = overlay.legend.update(&overlay.layer, attribute);
    if let Some(spread) = spread {
        debug!(
            overlay = %overlay.title,
            attribute,
            min = spread.min,
            mid = spread.mid,
            max = spread.max,
            arithmetic_mean = ?Statistics::mean(&overlay.layer.values(attribute)),
            "legend updated"
        );
    }

    OverlayUpdate {
        attribute: Some(attribute.to_string()),
        markers,
        spread,
    }
}
