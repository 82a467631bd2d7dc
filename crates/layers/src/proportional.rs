use formats::{Dataset, Feature};
use foundation::GeoPoint;

use crate::popup::Popup;
use crate::symbology::{SymbolStyle, Symbology, prop_radius};

/// One circle marker bound to a point feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub feature: Feature,
    pub position: GeoPoint,
    pub radius: f64,
    pub style: SymbolStyle,
    pub popup: Popup,
    pub popup_open: bool,
}

impl Marker {
    pub fn value(&self, attribute: &str) -> Option<f64> {
        self.feature.number(attribute)
    }
}

/// Proportional symbols for one dataset. Built once, then resized in place as the
/// displayed attribute changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolLayer {
    id: u64,
    name: String,
    markers: Vec<Marker>,
    attribute: Option<String>,
}

impl SymbolLayer {
    /// One marker per point feature, sized by the first attribute.
    pub fn build(id: u64, dataset: &Dataset, attributes: &[String], symbology: &Symbology) -> Self {
        let attribute = attributes.first().cloned();
        let key = attribute.as_deref().unwrap_or_default();
        let style = SymbolStyle::for_attribute(key, &symbology.tokens);

        let markers = dataset
            .features
            .iter()
            .filter_map(|feature| {
                let position = feature.position?;
                let radius = prop_radius(feature.number(key).unwrap_or(f64::NAN));
                Some(Marker {
                    popup: Popup::format(feature, key, radius, symbology),
                    feature: feature.clone(),
                    position,
                    radius,
                    style,
                    popup_open: false,
                })
            })
            .collect();

        Self {
            id,
            name: dataset.name.clone(),
            markers,
            attribute,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Attribute the markers were last sized by.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Values of `attribute` across markers that carry it. Non-numeric values come back as NaN.
    pub fn values(&self, attribute: &str) -> Vec<f64> {
        self.markers
            .iter()
            .filter(|m| m.feature.has(attribute))
            .map(|m| m.value(attribute).unwrap_or(f64::NAN))
            .collect()
    }

    /// Resizes and relabels every marker whose feature carries `attribute`; the others are
    /// left as they were. Returns how many markers changed.
    pub fn apply_attribute(&mut self, attribute: &str, symbology: &Symbology) -> usize {
        let mut updated = 0;
        for marker in &mut self.markers {
            if !marker.feature.has(attribute) {
                continue;
            }
            let radius = prop_radius(marker.value(attribute).unwrap_or(f64::NAN));
            marker.radius = radius;
            marker.popup = Popup::format(&marker.feature, attribute, radius, symbology);
            updated += 1;
        }
        if updated > 0 {
            self.attribute = Some(attribute.to_string());
        }
        updated
    }

    /// Indices of markers whose name field equals `name`, ignoring case.
    pub fn find(&self, name: &str, name_field: &str) -> Vec<usize> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| {
                m.feature
                    .text(name_field)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name.trim()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn pointer_enter(&mut self, index: usize) -> Option<&Popup> {
        let marker = self.markers.get_mut(index)?;
        marker.popup_open = true;
        Some(&marker.popup)
    }

    pub fn pointer_leave(&mut self, index: usize) -> bool {
        match self.markers.get_mut(index) {
            Some(marker) => {
                let was_open = marker.popup_open;
                marker.popup_open = false;
                was_open
            }
            None => false,
        }
    }

    pub fn open_popups(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.popup_open)
    }
}
