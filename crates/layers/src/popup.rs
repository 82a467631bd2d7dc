use formats::Feature;
use serde::{Deserialize, Serialize};

use crate::symbology::{Symbology, Theme, round2};

/// Declared popup fields, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSchema {
    /// Property holding the display name.
    pub name_field: String,
    /// Extra properties listed under the sentence, in this order.
    pub extra_fields: Vec<String>,
}

impl Default for PopupSchema {
    fn default() -> Self {
        Self {
            name_field: "Country".to_string(),
            extra_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub name: String,
    /// Value rounded to two decimals, without the percent sign.
    pub value_text: String,
    pub theme: Option<Theme>,
    pub year: String,
    pub details: Vec<(String, String)>,
    /// Anchor offset from the marker center; places the popup on the circle's top edge.
    pub offset: [f64; 2],
}

impl Popup {
    pub fn format(feature: &Feature, attribute: &str, radius: f64, symbology: &Symbology) -> Self {
        let schema = &symbology.popup;
        let name = feature.text(&schema.name_field).unwrap_or_default();
        let value_text = match feature.number(attribute) {
            Some(v) => round2(v).to_string(),
            None => "NaN".to_string(),
        };
        let year = symbology
            .attributes
            .year_token(attribute)
            .unwrap_or_default()
            .to_string();
        let details = schema
            .extra_fields
            .iter()
            .filter_map(|field| feature.text(field).map(|v| (field.clone(), v)))
            .collect();

        Self {
            name,
            value_text,
            theme: symbology.tokens.classify(attribute),
            year,
            details,
            offset: [0.0, -radius],
        }
    }

    /// `"<name> | <value>%"`, empty for an unclassified attribute.
    pub fn heading(&self) -> String {
        match self.theme {
            Some(_) => format!("{} | {}%", self.name, self.value_text),
            None => String::new(),
        }
    }

    pub fn sentence(&self) -> String {
        match self.theme {
            Some(Theme::Renewable) => format!(
                "of energy produced was from Renewable Sources in {}.",
                self.year
            ),
            Some(Theme::Fossil) => {
                format!("of energy consumed was from Fossil Fuels in {}.", self.year)
            }
            None => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.details.is_empty()
    }

    /// Plain-text rendering, one line per part.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        let heading = self.heading();
        if !heading.is_empty() {
            lines.push(heading);
        }
        let sentence = self.sentence();
        if !sentence.is_empty() {
            lines.push(sentence);
        }
        for (k, v) in &self.details {
            lines.push(format!("{k}: {v}"));
        }
        lines.join("\n")
    }

    pub fn html(&self) -> String {
        let mut out = String::new();
        if let Some(theme) = self.theme {
            let (verb, source) = match theme {
                Theme::Renewable => ("produced", "Renewable Sources"),
                Theme::Fossil => ("consumed", "Fossil Fuels"),
            };
            out.push_str(&format!(
                "<p style='font-size:16px'><b>{}</b> | {}%</p>",
                escape_markup(&self.name),
                self.value_text
            ));
            out.push_str(&format!(
                "<p style='font-size:11px'>of energy {verb} was from <br><b>{source}</b> in {}.</p>",
                escape_markup(&self.year)
            ));
        }
        for (k, v) in &self.details {
            out.push_str(&format!("<p>{}: {}</p>", escape_markup(k), escape_markup(v)));
        }
        out
    }
}

/// Escapes text for HTML and SVG bodies and attribute values.
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
