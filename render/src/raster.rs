//! Painting a [`Layout`] onto a pixel canvas.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::layout::{Color, Element, FontWeight, ImageSlot, Layout, Rect, TextAlign, TextStyle};

/// Images available to fill [`Element::Image`] slots.
#[derive(Debug, Clone, Copy)]
pub struct SlotImages<'a> {
    pub logo: &'a DynamicImage,
    pub signature: &'a DynamicImage,
    pub code: Option<&'a DynamicImage>,
}

impl<'a> SlotImages<'a> {
    fn get(&self, slot: ImageSlot) -> Option<&'a DynamicImage> {
        match slot {
            ImageSlot::Logo => Some(self.logo),
            ImageSlot::Signature => Some(self.signature),
            ImageSlot::Code => self.code,
        }
    }
}

/// Paint every element of `layout`, in order, onto a fresh canvas.
pub fn paint(layout: &Layout, images: SlotImages<'_>, typeface: &FontArc) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, Rgba([0, 0, 0, 0]));

    for element in &layout.elements {
        match element {
            Element::Fill { rect, color } => fill_rect(&mut canvas, *rect, *color),
            Element::Stroke { rect, width, color } => {
                stroke_rect(&mut canvas, *rect, *width, *color)
            }
            Element::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => fill_rect(
                &mut canvas,
                Rect::new(*x1, y - width / 2.0, x2 - x1, *width),
                *color,
            ),
            Element::Text {
                text,
                x,
                baseline,
                style,
            } => draw_text(&mut canvas, typeface, text, *x, *baseline, style),
            Element::Image { slot, rect } => {
                if let Some(image) = images.get(*slot) {
                    draw_image(&mut canvas, image, *rect, *slot);
                }
            }
        }
    }

    canvas
}

/// Pixel bounds of `rect`, clipped to the canvas.
fn pixel_bounds(canvas: &RgbaImage, rect: Rect) -> (u32, u32, u32, u32) {
    let clamp_x = |v: f32| v.round().clamp(0.0, canvas.width() as f32) as u32;
    let clamp_y = |v: f32| v.round().clamp(0.0, canvas.height() as f32) as u32;
    (
        clamp_x(rect.x),
        clamp_y(rect.y),
        clamp_x(rect.x + rect.width),
        clamp_y(rect.y + rect.height),
    )
}

fn blend(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let alpha = (f32::from(color.0[3]) / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let dst_alpha = f32::from(pixel.0[3]) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for c in 0..3 {
        let src = f32::from(color.0[c]) * alpha;
        let dst = f32::from(pixel.0[c]) * dst_alpha * (1.0 - alpha);
        pixel.0[c] = ((src + dst) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    pixel.0[3] = (out_alpha * 255.0).round() as u8;
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Color) {
    let (x0, y0, x1, y1) = pixel_bounds(canvas, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            blend(canvas.get_pixel_mut(x, y), color, 1.0);
        }
    }
}

fn stroke_rect(canvas: &mut RgbaImage, rect: Rect, width: f32, color: Color) {
    let half = width / 2.0;
    let Rect {
        x,
        y,
        width: w,
        height: h,
    } = rect;

    // Horizontal edges span the corners, vertical edges stop short of them
    // so no pixel is blended twice.
    fill_rect(canvas, Rect::new(x - half, y - half, w + width, width), color);
    fill_rect(canvas, Rect::new(x - half, y + h - half, w + width, width), color);
    fill_rect(canvas, Rect::new(x - half, y + half, width, h - width), color);
    fill_rect(canvas, Rect::new(x + w - half, y + half, width, h - width), color);
}

fn text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    x: f32,
    baseline: f32,
    style: &TextStyle,
) {
    let scale = PxScale::from(style.size);
    let start = match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - text_width(font, scale, text) / 2.0,
    };

    // A single face is used for every weight, bold is drawn with a one pixel
    // horizontal overstrike.
    let passes: &[f32] = match style.weight {
        FontWeight::Regular => &[0.0],
        FontWeight::Bold => &[0.0, 1.0],
    };

    let scaled = font.as_scaled(scale);
    for offset in passes {
        let mut caret = start + offset;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                let inside = (0..i64::from(canvas.width())).contains(&px)
                    && (0..i64::from(canvas.height())).contains(&py);
                if !inside {
                    return;
                }
                blend(canvas.get_pixel_mut(px as u32, py as u32), style.color, coverage);
            });
        }
    }
}

fn draw_image(canvas: &mut RgbaImage, image: &DynamicImage, rect: Rect, slot: ImageSlot) {
    let width = rect.width.round().max(1.0) as u32;
    let height = rect.height.round().max(1.0) as u32;

    // Codes must stay crisp to remain scannable.
    let filter = match slot {
        ImageSlot::Code => imageops::FilterType::Nearest,
        ImageSlot::Logo | ImageSlot::Signature => imageops::FilterType::Triangle,
    };

    let resized = imageops::resize(&image.to_rgba8(), width, height, filter);
    imageops::overlay(canvas, &resized, rect.x.round() as i64, rect.y.round() as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn stroke_is_centered_on_the_edge() {
        let mut canvas = blank(100, 100);
        stroke_rect(&mut canvas, Rect::new(20.0, 20.0, 60.0, 60.0), 2.0, Color::ACCENT);

        let accent = Rgba(Color::ACCENT.0);
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(*canvas.get_pixel(19, 50), accent);
        assert_eq!(*canvas.get_pixel(20, 50), accent);
        assert_eq!(*canvas.get_pixel(21, 50), white);
        assert_eq!(*canvas.get_pixel(50, 80), accent);
        assert_eq!(*canvas.get_pixel(50, 50), white);
        assert_eq!(*canvas.get_pixel(19, 19), accent);
    }

    #[test]
    fn fill_is_clipped_to_canvas() {
        let mut canvas = blank(10, 10);
        fill_rect(&mut canvas, Rect::new(-5.0, -5.0, 50.0, 50.0), Color::BODY);
        assert!(canvas.pixels().all(|p| *p == Rgba(Color::BODY.0)));
    }

    #[test]
    fn blend_respects_coverage() {
        let mut pixel = Rgba([255, 255, 255, 255]);
        blend(&mut pixel, Color::rgb(0, 0, 0), 0.5);
        assert_eq!(pixel, Rgba([128, 128, 128, 255]));

        let mut untouched = Rgba([255, 255, 255, 255]);
        blend(&mut untouched, Color::rgb(0, 0, 0), 0.0);
        assert_eq!(untouched, Rgba([255, 255, 255, 255]));
    }

    fn dejavu() -> FontArc {
        FontArc::try_from_slice(include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/DejaVuSans.ttf"
        )))
        .unwrap()
    }

    fn style(weight: FontWeight, align: TextAlign) -> TextStyle {
        TextStyle {
            size: 24.0,
            weight,
            color: Color::rgb(0, 0, 0),
            align,
        }
    }

    /// Bounding box (x0, y0, x1, y1) of every non-white pixel, if any.
    fn ink(canvas: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255, 255])
            .fold(None, |acc, (x, y, _)| match acc {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    #[test]
    fn text_sits_on_its_baseline() {
        let mut canvas = blank(200, 60);
        let font = dejavu();
        let style = style(FontWeight::Regular, TextAlign::Left);
        draw_text(&mut canvas, &font, "Asha", 10.0, 40.0, &style);

        let (x0, y0, _, y1) = ink(&canvas).expect("glyphs were painted");
        assert!(x0 >= 9, "ink starts left of the anchor at {x0}");
        assert!(y1 <= 41, "ink runs below the baseline to {y1}");
        assert!(y0 >= 40 - 24, "ink rises above the em box to {y0}");
    }

    #[test]
    fn centered_text_straddles_its_anchor() {
        let mut canvas = blank(200, 60);
        let font = dejavu();
        let style = style(FontWeight::Regular, TextAlign::Center);
        draw_text(&mut canvas, &font, "Rao", 100.0, 40.0, &style);

        let (x0, _, x1, _) = ink(&canvas).expect("glyphs were painted");
        assert!(x0 < 100 && x1 > 100);
        let middle = (x0 + x1) as f32 / 2.0;
        assert!((middle - 100.0).abs() <= 3.0, "centered on {middle}");
    }

    #[test]
    fn bold_overstrike_adds_ink() {
        let font = dejavu();
        let dark = |weight| {
            let mut canvas = blank(200, 60);
            let style = style(weight, TextAlign::Left);
            draw_text(&mut canvas, &font, "Intern", 10.0, 40.0, &style);
            canvas.pixels().filter(|p| p.0[0] < 128).count()
        };
        assert!(dark(FontWeight::Bold) > dark(FontWeight::Regular));
    }

    #[test]
    fn text_is_clipped_to_canvas() {
        let mut canvas = blank(20, 20);
        let font = dejavu();
        let style = style(FontWeight::Bold, TextAlign::Left);
        draw_text(&mut canvas, &font, "Vouch", -8.0, 10.0, &style);
        assert!(ink(&canvas).is_some());
    }

    #[test]
    fn images_are_scaled_into_their_rect() {
        let mut canvas = blank(50, 50);
        let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255])));
        draw_image(&mut canvas, &red, Rect::new(10.0, 10.0, 20.0, 10.0), ImageSlot::Logo);

        assert_eq!(*canvas.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(29, 19), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(30, 19), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(29, 20), Rgba([255, 255, 255, 255]));
    }
}
