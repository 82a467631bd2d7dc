use crate::geo::{MapView, TILE_SIZE_PX};

/// Tile coordinate in the XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at zoom `z`.
    pub fn tiles_per_axis(z: u8) -> u32 {
        1u32 << z
    }

    /// Fills a `{z}/{x}/{y}` URL template. `{s}` becomes the first subdomain.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{s}", "a")
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// A tile and where its top-left corner lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub screen_px: [f64; 2],
}

/// Tiles covering the viewport. Columns wrap around the antimeridian, rows are clipped
/// to the mercator square.
/// A viewport without a finite size or center covers nothing.
pub fn visible_tiles(view: &MapView) -> Vec<PlacedTile> {
    let finite = [
        view.width_px,
        view.height_px,
        view.center.lon_deg,
        view.center.lat_deg,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !finite {
        return Vec::new();
    }
    let n = TileCoord::tiles_per_axis(view.zoom) as i64;
    let o = view.origin_px();

    let col_min = (o[0] / TILE_SIZE_PX).floor() as i64;
    let col_max = ((o[0] + view.width_px - 1.0) / TILE_SIZE_PX).floor() as i64;
    let row_min = ((o[1] / TILE_SIZE_PX).floor() as i64).max(0);
    let row_max = (((o[1] + view.height_px - 1.0) / TILE_SIZE_PX).floor() as i64).min(n - 1);

    let mut out = Vec::new();
    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let x = col.rem_euclid(n) as u32;
            out.push(PlacedTile {
                coord: TileCoord::new(view.zoom, x, row as u32),
                screen_px: [
                    col as f64 * TILE_SIZE_PX - o[0],
                    row as f64 * TILE_SIZE_PX - o[1],
                ],
            });
        }
    }
    out
}
