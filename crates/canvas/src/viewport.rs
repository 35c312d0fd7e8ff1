use glam::DVec2;
use node::Extent;
use serde::{Deserialize, Serialize};

/// Tile size used to derive zoom levels from an extent.
const TILE_SIZE: f64 = 256.0;

/// Camera state of a map surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// View center in lon/lat.
    pub center: DVec2,
    /// Slippy-map zoom level.
    pub zoom: f64,
    /// Size of the view in pixels.
    pub size: DVec2,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DVec2::new(-73.938503, 40.655769),
            zoom: 13.0,
            size: DVec2::new(1024.0, 768.0),
            min_zoom: 4.0,
            max_zoom: 19.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Center on `extent` and pick the largest zoom that still shows all of it.
    pub fn fit(&mut self, extent: Extent) {
        self.center = extent.center();
        let span = extent.size();
        // Degrees covered by one pixel at zoom 0 along each axis.
        let world = DVec2::new(360.0, 180.0) / TILE_SIZE;
        let zoom_x = fit_zoom(self.size.x, span.x, world.x);
        let zoom_y = fit_zoom(self.size.y, span.y, world.y);
        self.set_zoom(zoom_x.min(zoom_y).floor());
    }
}

fn fit_zoom(pixels: f64, span: f64, degrees_per_pixel: f64) -> f64 {
    if span <= f64::EPSILON {
        return f64::INFINITY;
    }
    (pixels * degrees_per_pixel / span).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centers_on_extent() {
        let mut viewport = Viewport::new();
        viewport.fit(Extent::new(DVec2::new(10.0, 20.0), DVec2::new(12.0, 21.0)));
        assert_eq!(viewport.center, DVec2::new(11.0, 20.5));
        assert!(viewport.zoom >= viewport.min_zoom && viewport.zoom <= viewport.max_zoom);
    }

    #[test]
    fn smaller_extents_zoom_further_in() {
        let mut wide = Viewport::new();
        wide.fit(Extent::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0)));
        let mut narrow = Viewport::new();
        narrow.fit(Extent::new(DVec2::new(0.0, 0.0), DVec2::new(0.01, 0.01)));
        assert!(narrow.zoom > wide.zoom);
    }

    #[test]
    fn point_extent_uses_max_zoom() {
        let mut viewport = Viewport::new();
        viewport.fit(Extent::from_point(DVec2::new(5.0, 5.0)));
        assert_eq!(viewport.zoom, viewport.max_zoom);
    }
}
