use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Result, TimelineError};
use crate::timeline::{Timeline, TimelineConfig};

/// Parse a `#rrggbb` color
pub fn parse_hex_color(value: &str) -> Option<Rgb<u8>> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

fn color(value: &str) -> Result<Rgb<u8>> {
    parse_hex_color(value).ok_or_else(|| {
        TimelineError::RenderFailed {
            reason: format!("invalid color '{}'", value),
        }
        .into()
    })
}

/// Fill the pixel rectangle `[x0, x1) x [y0, y1)`, clipped to the image
fn fill_rect(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let x0 = x0.max(0) as u32;
    let y0 = y0.max(0) as u32;
    let x1 = x1.clamp(0, image.width() as i64) as u32;
    let y1 = y1.clamp(0, image.height() as i64) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

impl Timeline {
    /// Draw the baseline and ticks into an in-memory image
    pub fn render_image(&self, config: &TimelineConfig) -> Result<RgbImage> {
        if config.width == 0 || config.height == 0 || config.margin.saturating_mul(2) >= config.width {
            return Err(TimelineError::InvalidDimensions {
                width: config.width,
                height: config.height,
            }
            .into());
        }

        let background = color(&config.background)?;
        let baseline = color(&config.baseline_color)?;
        let tick = color(&config.tick_color)?;

        let mut image = RgbImage::from_pixel(config.width, config.height, background);
        if self.is_empty() {
            return Ok(image);
        }

        let stroke = config.line_width.max(1) as i64;
        let before = stroke / 2;
        let y_base = (config.height / 2) as i64;
        let x0 = config.margin as i64;
        let x1 = (config.width - config.margin) as i64;

        fill_rect(&mut image, x0, y_base - before, x1, y_base - before + stroke, baseline);

        let tick_height = config.tick_height as i64;
        for x in self.tick_positions(config.width as f64, config.margin as f64) {
            let x = x.round() as i64;
            fill_rect(
                &mut image,
                x - before,
                y_base - tick_height,
                x - before + stroke,
                y_base + tick_height,
                tick,
            );
        }

        Ok(image)
    }

    /// Render the timeline to an image file; the format follows the extension
    pub fn render_png<P: AsRef<Path>>(&self, path: P, config: &TimelineConfig) -> Result<()> {
        let path = path.as_ref();
        let image = self.render_image(config)?;
        image.save(path).map_err(|e| TimelineError::RenderFailed {
            reason: format!("{}: {}", path.display(), e),
        })?;

        tracing::debug!("Wrote timeline image to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MomentsError;
    use tempfile::tempdir;

    fn config() -> TimelineConfig {
        TimelineConfig {
            width: 340,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2f72ff"), Some(Rgb([0x2f, 0x72, 0xff])));
        assert_eq!(parse_hex_color("#FFFFFF"), Some(Rgb([255, 255, 255])));
        assert_eq!(parse_hex_color("2f72ff"), None);
        assert_eq!(parse_hex_color("#2f72f"), None);
        assert_eq!(parse_hex_color("#zz0000"), None);
    }

    #[test]
    fn test_baseline_and_ticks_drawn() {
        let mut timeline = Timeline::new();
        timeline.set(vec![5.0], 10.0);

        let image = timeline.render_image(&config()).unwrap();
        assert_eq!(image.dimensions(), (340, 120));

        // Background in the corner, baseline left of the tick, tick above the baseline
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(40, 60), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(170, 45), Rgb([0x2f, 0x72, 0xff]));
        // Nothing drawn inside the margin
        assert_eq!(*image.get_pixel(5, 60), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_empty_timeline_is_background_only() {
        let mut timeline = Timeline::new();
        timeline.set(vec![], 5.0);

        let image = timeline.render_image(&TimelineConfig::default()).unwrap();
        assert_eq!(image.dimensions(), (800, 120));
        assert_eq!(*image.get_pixel(400, 60), Rgb([255, 255, 255]));
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_invalid_dimensions() {
        let bad = TimelineConfig {
            width: 30,
            margin: 20,
            ..Default::default()
        };
        let result = Timeline::new().render_image(&bad);
        assert!(matches!(
            result,
            Err(MomentsError::Timeline(TimelineError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_render_png_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timeline.png");

        let mut timeline = Timeline::new();
        timeline.set(vec![1.0, 2.0], 3.0);
        timeline.render_png(&path, &config()).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (340, 120));
    }
}
