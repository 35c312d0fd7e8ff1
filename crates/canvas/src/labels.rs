/// Tracks whether permanent labels should be shown for the current zoom.
///
/// Labels are hidden below the threshold and shown at or above it. Only a
/// zoom change that crosses the threshold produces a toggle.
#[derive(Clone, Debug)]
pub struct LabelVisibility {
    threshold: f64,
    last_zoom: Option<f64>,
}

impl LabelVisibility {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_zoom: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Record a zoom change. Returns the new visibility when it flips.
    ///
    /// The first zoom seen always reports, to establish the initial state,
    /// even when it lands on the same side of the threshold as the default.
    pub fn on_zoom(&mut self, zoom: f64) -> Option<bool> {
        let visible = zoom >= self.threshold;
        let previous = self.last_zoom.replace(zoom);
        match previous {
            None => Some(visible),
            Some(last) if (last >= self.threshold) != visible => Some(visible),
            Some(_) => None,
        }
    }
}
