// Procedurally painted sun glow texture.
//
// Paints a radial gradient into an RGBA8 buffer the way a 2D canvas fills a
// rect with concentric radial gradient: distances inside the inner circle
// take the first stop, outside the outer circle the last one.

/// Side length of the glow texture in pixels.
pub const GLOW_TEXTURE_SIZE: u32 = 256;
/// Billboard scale of the glow sprite in world units.
pub const GLOW_SCALE: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    /// Straight (non-premultiplied) RGBA, 0..1.
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct RadialGradient {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Sorted by offset, at least one stop.
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Warm core fading to a transparent edge.
    pub fn sun_glow() -> Self {
        Self {
            inner_radius: 20.0,
            outer_radius: 128.0,
            stops: vec![
                GradientStop { offset: 0.0, color: [1.0, 240.0 / 255.0, 160.0 / 255.0, 1.0] },
                GradientStop { offset: 0.5, color: [1.0, 200.0 / 255.0, 120.0 / 255.0, 0.45] },
                GradientStop { offset: 1.0, color: [1.0, 200.0 / 255.0, 120.0 / 255.0, 0.0] },
            ],
        }
    }

    /// Color at `distance` from the gradient centre.
    pub fn sample(&self, distance: f32) -> [f32; 4] {
        let span = self.outer_radius - self.inner_radius;
        let t = if span > 0.0 {
            ((distance - self.inner_radius) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let Some(first) = self.stops.first() else {
            return [0.0; 4];
        };
        if t <= first.offset {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let width = b.offset - a.offset;
                let k = if width > 0.0 { (t - a.offset) / width } else { 1.0 };
                return std::array::from_fn(|i| a.color[i] + (b.color[i] - a.color[i]) * k);
            }
        }

        self.stops[self.stops.len() - 1].color
    }

    /// Paint a `size × size` RGBA8 image with the gradient centred in it.
    /// The gradient radii are given for a 256-pixel canvas and scale with `size`.
    pub fn paint(&self, size: u32) -> Vec<u8> {
        let scale = size as f32 / GLOW_TEXTURE_SIZE as f32;
        let center = size as f32 / 2.0;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                // Sample at pixel centres.
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let distance = (dx * dx + dy * dy).sqrt() / scale;
                let color = self.sample(distance);
                pixels.extend(color.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
            }
        }

        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_is_opaque_and_edge_transparent() {
        let g = RadialGradient::sun_glow();
        assert_eq!(g.sample(0.0), g.stops[0].color);
        assert_eq!(g.sample(20.0)[3], 1.0);
        assert_eq!(g.sample(128.0)[3], 0.0);
        assert_eq!(g.sample(500.0)[3], 0.0);
    }

    #[test]
    fn midpoint_matches_middle_stop() {
        let g = RadialGradient::sun_glow();
        let mid = g.sample(74.0);
        assert!((mid[3] - 0.45).abs() < 1e-5);
        assert!((mid[1] - 200.0 / 255.0).abs() < 1e-5);
    }

    #[test]
    fn alpha_falls_off_monotonically() {
        let g = RadialGradient::sun_glow();
        let mut prev = f32::INFINITY;
        for d in 0..=140 {
            let a = g.sample(d as f32)[3];
            assert!(a <= prev);
            prev = a;
        }
    }

    #[test]
    fn painted_texture_layout() {
        let g = RadialGradient::sun_glow();
        let pixels = g.paint(GLOW_TEXTURE_SIZE);
        assert_eq!(pixels.len(), 256 * 256 * 4);

        let at = |x: usize, y: usize| &pixels[(y * 256 + x) * 4..(y * 256 + x) * 4 + 4];
        assert_eq!(at(128, 128)[3], 255);
        assert_eq!(at(0, 0)[3], 0);
        assert!(at(255, 128)[3] <= 2);
    }

    #[test]
    fn smaller_canvas_scales_radii() {
        let g = RadialGradient::sun_glow();
        let pixels = g.paint(64);
        assert_eq!(pixels.len(), 64 * 64 * 4);
        let center = (32 * 64 + 32) * 4;
        assert_eq!(pixels[center + 3], 255);
        assert_eq!(pixels[3], 0);
    }
}
