use std::f64::consts::PI;

/// Side length of one XYZ tile in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;
/// Latitude bound of the web-mercator square.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// WGS84 position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Width (and height) of the whole web-mercator world at `zoom`, in pixels.
pub fn world_size_px(zoom: u8) -> f64 {
    TILE_SIZE_PX * (1u64 << zoom) as f64
}

/// Global web-mercator pixel coordinates, origin at the top-left corner of tile (0, 0).
pub fn project_mercator(point: GeoPoint, zoom: u8) -> [f64; 2] {
    let size = world_size_px(zoom);
    let lat_rad = point
        .lat_deg
        .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
        .to_radians();
    let x = (point.lon_deg + 180.0) / 360.0 * size;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;
    [x, y]
}

/// A fixed map view: center, zoom and viewport size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub width_px: f64,
    pub height_px: f64,
}

impl MapView {
    pub fn new(center: GeoPoint, zoom: u8, width_px: f64, height_px: f64) -> Self {
        Self {
            center,
            zoom,
            width_px,
            height_px,
        }
    }

    /// Global pixel position of the viewport's top-left corner.
    pub fn origin_px(&self) -> [f64; 2] {
        let c = project_mercator(self.center, self.zoom);
        [c[0] - self.width_px / 2.0, c[1] - self.height_px / 2.0]
    }

    /// Viewport pixel position of `point`.
    pub fn to_screen(&self, point: GeoPoint) -> [f64; 2] {
        let p = project_mercator(point, self.zoom);
        let o = self.origin_px();
        [p[0] - o[0], p[1] - o[1]]
    }

    pub fn contains_screen(&self, xy: [f64; 2]) -> bool {
        xy[0] >= 0.0 && xy[1] >= 0.0 && xy[0] <= self.width_px && xy[1] <= self.height_px
    }
}
