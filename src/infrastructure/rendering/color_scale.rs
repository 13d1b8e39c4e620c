/// Sequential white-to-navy scale, light at `vmin` and dark at `vmax`.
const BLUES: [[u8; 3]; 9] = [
    [247, 251, 255],
    [222, 235, 247],
    [198, 219, 239],
    [158, 202, 225],
    [107, 174, 214],
    [66, 146, 198],
    [33, 113, 181],
    [8, 81, 156],
    [8, 48, 107],
];

/// Color used for undefined (NaN) cells.
pub const MISSING_COLOR: [u8; 3] = [128, 128, 128];

/// Maps a value range onto the blue scale by piecewise-linear interpolation.
#[derive(Debug, Clone, Copy)]
pub struct BluesColorScale {
    vmin: f64,
    vmax: f64,
}

impl Default for BluesColorScale {
    fn default() -> Self {
        Self::new(-1.0, 1.0)
    }
}

impl BluesColorScale {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// RGB for `value`; out-of-range values are clamped, NaN maps to [`MISSING_COLOR`].
    pub fn color(&self, value: f64) -> [u8; 3] {
        if value.is_nan() || self.vmax <= self.vmin {
            return MISSING_COLOR;
        }

        let t = ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0);
        let scaled = t * (BLUES.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(BLUES.len() - 2);
        let frac = scaled - lower as f64;

        let from = BLUES[lower];
        let to = BLUES[lower + 1];
        let mut rgb = [0u8; 3];
        for channel in 0..3 {
            let a = f64::from(from[channel]);
            let b = f64::from(to[channel]);
            rgb[channel] = (a + (b - a) * frac).round() as u8;
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let scale = BluesColorScale::default();
        assert_eq!(scale.color(-1.0), [247, 251, 255]);
        assert_eq!(scale.color(1.0), [8, 48, 107]);
        assert_eq!(scale.color(0.0), BLUES[4]);
    }

    #[test]
    fn test_clamped_and_missing() {
        let scale = BluesColorScale::default();
        assert_eq!(scale.color(-7.0), scale.color(-1.0));
        assert_eq!(scale.color(f64::INFINITY), scale.color(1.0));
        assert_eq!(scale.color(f64::NAN), MISSING_COLOR);
    }

    #[test]
    fn test_darker_for_higher_correlation() {
        let scale = BluesColorScale::default();
        let low: u32 = scale.color(-0.5).iter().map(|&c| u32::from(c)).sum();
        let high: u32 = scale.color(0.5).iter().map(|&c| u32::from(c)).sum();
        assert!(high < low);
    }
}
