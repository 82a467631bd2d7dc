//! Renders a session to a self-contained SVG document.
//!
//! Base tiles are referenced by URL. Every marker carries its popup as a
//! `<title>`, so hovering a circle in a browser shows it; popups opened from
//! the command line are drawn as boxes above their circles.

use foundation::{MapView, TILE_SIZE_PX, visible_tiles};
use layers::{Legend, Marker, SymbolStyle, escape_markup};

use crate::config::MapConfig;
use crate::session::{MapSession, Overlay};

const FONT: &str = "font-family='Helvetica, Arial, sans-serif'";
const PANEL: &str = "fill='#ffffff' fill-opacity='0.85' stroke='#999999' stroke-width='1'";
const MARGIN: f64 = 10.0;

pub fn render_svg(session: &MapSession, config: &MapConfig) -> String {
    let view = config.map_view();
    let w = view.width_px;
    let h = view.height_px;
    let mut s = String::with_capacity(64 << 10);

    s.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <title>Renewable energy and fossil fuels by country</title>
"#
    ));
    s.push_str(&format!("  <rect width='{w}' height='{h}' fill='#e8e8e8'/>\n"));

    push_base_tiles(&mut s, session, config, &view);
    for overlay in session.overlays().filter(|o| o.visible) {
        push_overlay(&mut s, overlay, &view);
    }
    for overlay in session.overlays().filter(|o| o.visible) {
        push_open_popups(&mut s, overlay, &view);
    }
    push_year_label(&mut s, session);
    push_layer_control(&mut s, session, w);
    push_sequence_control(&mut s, session, h);
    push_legends(&mut s, session, w, h);
    push_attribution(&mut s, session, config, w, h);

    s.push_str("</svg>\n");
    s
}

fn push_base_tiles(s: &mut String, session: &MapSession, config: &MapConfig, view: &MapView) {
    let Some(base) = config.base_layer(session.base_layer()) else {
        return;
    };
    s.push_str(&format!(
        "  <g id='base' data-name='{}'>\n",
        escape_markup(&base.name)
    ));
    for tile in visible_tiles(view) {
        let href = escape_markup(&tile.coord.url(&base.url_template));
        s.push_str(&format!(
            "    <image href='{href}' xlink:href='{href}' x='{:.1}' y='{:.1}' width='{TILE_SIZE_PX}' height='{TILE_SIZE_PX}'/>\n",
            tile.screen_px[0], tile.screen_px[1]
        ));
    }
    s.push_str("  </g>\n");
}

fn push_overlay(s: &mut String, overlay: &Overlay, view: &MapView) {
    s.push_str(&format!(
        "  <g id='overlay-{}'>\n",
        overlay_slug(overlay)
    ));
    for marker in overlay.layer.markers() {
        if !marker.radius.is_finite() {
            continue;
        }
        let [x, y] = view.to_screen(marker.position);
        s.push_str(&format!(
            "    <circle cx='{x:.1}' cy='{y:.1}' r='{:.2}' {}><title>{}</title></circle>\n",
            marker.radius,
            style_attrs(&marker.style),
            escape_markup(&marker.popup.text())
        ));
    }
    s.push_str("  </g>\n");
}

fn push_open_popups(s: &mut String, overlay: &Overlay, view: &MapView) {
    for marker in overlay.layer.open_popups() {
        push_popup_box(s, marker, view);
    }
}

fn push_popup_box(s: &mut String, marker: &Marker, view: &MapView) {
    let lines: Vec<String> = marker.popup.text().lines().map(str::to_string).collect();
    if lines.is_empty() {
        return;
    }
    let [x, y] = view.to_screen(marker.position);
    let anchor_y = y + marker.popup.offset[1];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64 * 6.5 + 16.0;
    let height = lines.len() as f64 * 16.0 + 10.0;
    let left = x - width / 2.0;
    let top = anchor_y - height - 8.0;

    s.push_str(&format!("  <g class='popup' {FONT} font-size='12'>\n"));
    s.push_str(&format!(
        "    <rect x='{left:.1}' y='{top:.1}' width='{width:.1}' height='{height:.1}' rx='6' {PANEL}/>\n"
    ));
    s.push_str(&format!(
        "    <path d='M{:.1},{:.1} L{x:.1},{anchor_y:.1} L{:.1},{:.1}' fill='#ffffff' stroke='#999999'/>\n",
        x - 6.0,
        top + height,
        x + 6.0,
        top + height
    ));
    for (i, line) in lines.iter().enumerate() {
        let weight = if i == 0 { " font-weight='bold'" } else { "" };
        s.push_str(&format!(
            "    <text x='{:.1}' y='{:.1}'{weight}>{}</text>\n",
            left + 8.0,
            top + 18.0 + i as f64 * 16.0,
            escape_markup(line)
        ));
    }
    s.push_str("  </g>\n");
}

fn push_year_label(s: &mut String, session: &MapSession) {
    let text = session.year_label().text();
    if text.is_empty() {
        return;
    }
    s.push_str(&format!(
        "  <g id='timestamp' {FONT} font-size='18'>\n    <rect x='{MARGIN}' y='{MARGIN}' width='120' height='32' rx='4' {PANEL}/>\n    <text x='{:.1}' y='{:.1}'>{}</text>\n  </g>\n",
        MARGIN + 10.0,
        MARGIN + 22.0,
        escape_markup(&text)
    ));
}

fn push_layer_control(s: &mut String, session: &MapSession, w: f64) {
    let overlays: Vec<&Overlay> = session.overlays().collect();
    let rows = session.base_layers().len() + overlays.len() + 1;
    let width = 190.0;
    let height = rows as f64 * 18.0 + 12.0;
    let left = w - width - MARGIN;

    s.push_str(&format!("  <g id='layer-control' {FONT} font-size='12'>\n"));
    s.push_str(&format!(
        "    <rect x='{left:.1}' y='{MARGIN}' width='{width}' height='{height:.1}' rx='4' {PANEL}/>\n"
    ));
    let mut y = MARGIN + 20.0;
    for name in session.base_layers() {
        let mark = if name == session.base_layer() { "(•)" } else { "( )" };
        s.push_str(&format!(
            "    <text x='{:.1}' y='{y:.1}'>{mark} {}</text>\n",
            left + 10.0,
            escape_markup(name)
        ));
        y += 18.0;
    }
    y += 18.0;
    for overlay in overlays.iter().rev() {
        let mark = if overlay.visible { "[x]" } else { "[ ]" };
        s.push_str(&format!(
            "    <text x='{:.1}' y='{y:.1}'>{mark} {}</text>\n",
            left + 10.0,
            escape_markup(&overlay.title)
        ));
        y += 18.0;
    }
    s.push_str("  </g>\n");
}

fn push_sequence_control(s: &mut String, session: &MapSession, h: f64) {
    let seq = session.sequence();
    let track_x = MARGIN + 44.0;
    let track_w = 200.0;
    let top = h - MARGIN - 40.0;
    let mid = top + 20.0;

    s.push_str(&format!("  <g id='sequence-control' {FONT} font-size='14'>\n"));
    s.push_str(&format!(
        "    <rect x='{MARGIN}' y='{top:.1}' width='{:.1}' height='40' rx='4' {PANEL}/>\n",
        track_w + 88.0
    ));
    s.push_str(&format!(
        "    <g id='reverse'><title>Reverse</title><text x='{:.1}' y='{:.1}'>◀</text></g>\n",
        MARGIN + 12.0,
        mid + 5.0
    ));
    s.push_str(&format!(
        "    <line x1='{track_x:.1}' y1='{mid:.1}' x2='{:.1}' y2='{mid:.1}' stroke='#666666' stroke-width='3'/>\n",
        track_x + track_w
    ));

    let max = seq.slider_max();
    let step_w = if max == 0 { 0.0 } else { track_w / max as f64 };
    for i in 0..=max {
        let x = track_x + i as f64 * step_w;
        s.push_str(&format!(
            "    <line x1='{x:.1}' y1='{:.1}' x2='{x:.1}' y2='{:.1}' stroke='#666666'/>\n",
            mid - 5.0,
            mid + 5.0
        ));
    }
    let thumb = seq.index().min(max);
    s.push_str(&format!(
        "    <circle id='slider-thumb' cx='{:.1}' cy='{mid:.1}' r='7' fill='#3a7bd5' stroke='#ffffff'><title>{}</title></circle>\n",
        track_x + thumb as f64 * step_w,
        seq.index()
    ));
    s.push_str(&format!(
        "    <g id='forward'><title>Forward</title><text x='{:.1}' y='{:.1}'>▶</text></g>\n",
        track_x + track_w + 16.0,
        mid + 5.0
    ));
    s.push_str("  </g>\n");
}

fn push_legends(s: &mut String, session: &MapSession, w: f64, h: f64) {
    let mut legends: Vec<&Legend> = session.overlays().map(|o| &o.legend).collect();
    legends.reverse();
    let total: f64 = legends.iter().map(|l| l.spec.height + 40.0).sum();
    let mut top = h - MARGIN - 20.0 - total;
    for legend in legends {
        push_legend(s, legend, w - legend.spec.width - MARGIN, top);
        top += legend.spec.height + 40.0;
    }
}

fn push_legend(s: &mut String, legend: &Legend, left: f64, top: f64) {
    let spec = &legend.spec;
    s.push_str(&format!(
        "  <g class='legend' transform='translate({left:.1},{top:.1})' {FONT} font-size='12'>\n"
    ));
    s.push_str(&format!(
        "    <rect width='{}' height='{}' rx='4' {PANEL}/>\n",
        spec.width,
        spec.height + 36.0
    ));
    s.push_str(&format!(
        "    <text x='8' y='16' font-weight='bold'>{}</text>\n",
        escape_markup(&spec.title)
    ));
    s.push_str(&format!(
        "    <text x='8' y='30'>{}</text>\n",
        escape_markup(&spec.detail)
    ));
    s.push_str("    <g transform='translate(0,34)'>\n");
    for slot in legend.slots() {
        if slot.value.is_none() || !slot.radius.is_finite() {
            continue;
        }
        s.push_str(&format!(
            "      <circle id='{}' cx='{}' cy='{:.2}' r='{:.2}' {}/>\n",
            slot.kind.as_str(),
            spec.circle_x,
            slot.cy,
            slot.radius,
            style_attrs(&legend.style)
        ));
        s.push_str(&format!(
            "      <text id='{}-text' x='{}' y='{}'>{}</text>\n",
            slot.kind.as_str(),
            spec.text_x,
            legend.text_y(slot.kind),
            escape_markup(&slot.text)
        ));
    }
    s.push_str("    </g>\n  </g>\n");
}

fn push_attribution(s: &mut String, session: &MapSession, config: &MapConfig, w: f64, h: f64) {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(base) = config.base_layer(session.base_layer()) {
        parts.push(&base.attribution);
    }
    for overlay in session.overlays().filter(|o| o.visible) {
        parts.push(&overlay.attribution);
    }
    if parts.is_empty() {
        return;
    }
    s.push_str(&format!(
        "  <text x='{:.1}' y='{:.1}' text-anchor='end' {FONT} font-size='9' fill='#333333'>{}</text>\n",
        w - 4.0,
        h - 4.0,
        escape_markup(&parts.join(" | "))
    ));
}

fn style_attrs(style: &SymbolStyle) -> String {
    format!(
        "fill='{}' fill-opacity='{}' stroke='{}' stroke-width='{}' stroke-opacity='{}'",
        style.fill.hex(),
        style.fill_opacity,
        style.stroke.hex(),
        style.weight,
        style.opacity
    )
}

fn overlay_slug(overlay: &Overlay) -> &'static str {
    match overlay.theme {
        layers::Theme::Renewable => "renewable",
        layers::Theme::Fossil => "fossil",
    }
}

#[cfg(test)]
mod tests {
    use super::render_svg;
    use crate::config::MapConfig;
    use crate::loading::LoadedDatasets;
    use crate::session::MapSession;
    use formats::Dataset;
    use layers::Theme;
    use runtime::Step;

    fn dataset(token: &str, values: [f64; 2]) -> Dataset {
        let payload = format!(
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "properties": {{"Country": "Norway", "perc_{token}_2002": {}, "perc_{token}_2003": 1}},
                  "geometry": {{"type": "Point", "coordinates": [10.0, 61.0]}}}},
                {{"type": "Feature", "properties": {{"Country": "Chad & Co", "perc_{token}_2002": {}, "perc_{token}_2003": 2}},
                  "geometry": {{"type": "Point", "coordinates": [18.0, 15.0]}}}}
            ]}}"#,
            values[0], values[1]
        );
        Dataset::from_geojson_str(token, &payload).expect("parse")
    }

    fn session() -> MapSession {
        MapSession::new(
            LoadedDatasets {
                renewable: Some(dataset("ren", [10.0, 20.0])),
                fossil: Some(dataset("ff", [70.0, 90.0])),
            },
            &MapConfig::default(),
        )
    }

    #[test]
    fn renders_markers_legends_and_year() {
        let config = MapConfig::default();
        let svg = render_svg(&session(), &config);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle cx=").count(), 4);
        assert!(svg.contains("Year: 2002"));
        assert!(svg.contains("Renewable Energy Production"));
        assert!(svg.contains("Fossil Fuel Energy Consumption"));
        assert!(svg.contains("id='mean-text' x='85' y='40'>15%</text>"));
        assert!(svg.contains("id='mean-text' x='85' y='47.5'>80%</text>"));
        assert!(svg.contains("Chad &amp; Co | 20%"));
        assert!(svg.contains("World_Light_Gray_Base/MapServer/tile/2/"));
    }

    #[test]
    fn hidden_overlay_is_not_drawn() {
        let config = MapConfig::default();
        let mut s = session();
        s.set_overlay_visible(Theme::Fossil, false);
        let svg = render_svg(&s, &config);
        assert_eq!(svg.matches("<circle cx=").count(), 2);
        assert!(!svg.contains("id='overlay-fossil'"));
        assert!(svg.contains("[ ] Fossil Fuels"));
    }

    #[test]
    fn open_popup_is_drawn_as_box() {
        let config = MapConfig::default();
        let mut s = session();
        s.step(Step::Forward);
        s.hover("Norway");
        let svg = render_svg(&s, &config);
        assert_eq!(svg.matches("class='popup'").count(), 2);
        assert!(svg.contains("Norway | 1%"));
        assert!(svg.contains("Year: 2003"));
    }

    #[test]
    fn base_layer_switch_changes_tiles() {
        let config = MapConfig::default();
        let mut s = session();
        s.set_base_layer("Streets");
        let svg = render_svg(&s, &config);
        assert!(svg.contains("tile.openstreetmap.org/2/"));
        assert!(svg.contains("(•) Streets"));
    }
}
