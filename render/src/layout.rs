//! Certificate layout.
//!
//! Every coordinate below is part of the certificate's visual contract:
//! changing one changes how every previously issued certificate re-renders.

use vouch_common::views::Certificate;

use crate::{assets::AssetKind, error::RenderError};

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

const BORDER_INSET: f32 = 20.0;
const BORDER_WIDTH: f32 = 2.0;
const ACCENT_SIZE: f32 = 100.0;

const LOGO_X: f32 = 50.0;
const LOGO_Y: f32 = 40.0;
const LOGO_WIDTH: u32 = 120;

const CENTER_X: f32 = CANVAS_WIDTH as f32 / 2.0;
const TITLE_BASELINE: f32 = 160.0;
const LEAD_IN_BASELINE: f32 = 200.0;
const NAME_BASELINE: f32 = 250.0;
const NAME_RULE_Y: f32 = 260.0;
const NAME_RULE_X1: f32 = 200.0;
const NAME_RULE_X2: f32 = 600.0;
const BODY_BASELINES: [f32; 2] = [310.0, 340.0];

const SIGNATURE_X: f32 = 100.0;
const SIGNATURE_BOTTOM: f32 = 460.0;
const SIGNATURE_WIDTH: u32 = 140;
const SIGNER_NAME_BASELINE: f32 = 480.0;
const SIGNER_TITLE_BASELINE: f32 = 500.0;

const CODE_X: f32 = 650.0;
const CODE_Y: f32 = 420.0;
const CODE_SIZE: f32 = 80.0;
const CODE_CAPTION_X: f32 = 690.0;
const CODE_CAPTION_BASELINE: f32 = 515.0;

pub const TITLE: &str = "Certificate of Completion";
pub const LEAD_IN: &str = "This certificate awarded to:";
pub const CODE_CAPTION: &str = "Verification ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xff])
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BORDER: Color = Color::rgb(0xe5, 0xe7, 0xeb);
    pub const ACCENT: Color = Color::rgb(0x10, 0xb9, 0x81);
    pub const HEADING: Color = Color::rgb(0x1f, 0x29, 0x37);
    pub const BODY: Color = Color::rgb(0x37, 0x41, 0x51);
    pub const RULE: Color = Color::rgb(0xd1, 0xd5, 0xdb);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `x` is the left edge of the text.
    Left,
    /// `x` is the horizontal center of the text.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    const fn new(size: f32, weight: FontWeight, color: Color, align: TextAlign) -> Self {
        Self {
            size,
            weight,
            color,
            align,
        }
    }
}

/// Which loaded image an [`Element::Image`] is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Logo,
    Signature,
    Code,
}

/// One drawing operation. Elements are painted in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Fill {
        rect: Rect,
        color: Color,
    },
    /// Rectangle outline centered on the edges of `rect`.
    Stroke {
        rect: Rect,
        width: f32,
        color: Color,
    },
    /// Horizontal line from `x1` to `x2` centered on `y`.
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        baseline: f32,
        style: TextStyle,
    },
    Image {
        slot: ImageSlot,
        rect: Rect,
    },
}

/// Intrinsic pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// The fully positioned content of one certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub elements: Vec<Element>,
}

impl Layout {
    /// All text on the certificate, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_rect(&self, slot: ImageSlot) -> Option<Rect> {
        self.elements.iter().find_map(|e| match e {
            Element::Image { slot: s, rect } if *s == slot => Some(*rect),
            _ => None,
        })
    }

    pub fn has_code(&self) -> bool {
        self.image_rect(ImageSlot::Code).is_some()
    }
}

/// Scale an image to `width`, keeping its aspect ratio.
fn fit_width(kind: AssetKind, dims: Dimensions, width: u32) -> Result<(f32, f32), RenderError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(RenderError::InvalidAsset {
            kind,
            reason: format!("image has no area ({}x{})", dims.width, dims.height),
        });
    }

    let height = (u64::from(width) * u64::from(dims.height) + u64::from(dims.width) / 2)
        / u64::from(dims.width);
    Ok((width as f32, height as f32))
}

fn text(text: impl Into<String>, x: f32, baseline: f32, style: TextStyle) -> Element {
    Element::Text {
        text: text.into(),
        x,
        baseline,
        style,
    }
}

/// Lay out `certificate`.
///
/// Only the intrinsic sizes of the logo and signature influence placement,
/// so the result can be computed and compared without any pixels.
pub fn compose(
    certificate: &Certificate,
    logo: Dimensions,
    signature: Dimensions,
    with_code: bool,
) -> Result<Layout, RenderError> {
    use FontWeight::{Bold, Regular};
    use TextAlign::{Center, Left};

    let (logo_w, logo_h) = fit_width(AssetKind::Logo, logo, LOGO_WIDTH)?;
    let (sig_w, sig_h) = fit_width(AssetKind::Signature, signature, SIGNATURE_WIDTH)?;

    let canvas_w = CANVAS_WIDTH as f32;
    let canvas_h = CANVAS_HEIGHT as f32;

    let mut elements = vec![
        Element::Fill {
            rect: Rect::new(0.0, 0.0, canvas_w, canvas_h),
            color: Color::WHITE,
        },
        Element::Stroke {
            rect: Rect::new(
                BORDER_INSET,
                BORDER_INSET,
                canvas_w - 2.0 * BORDER_INSET,
                canvas_h - 2.0 * BORDER_INSET,
            ),
            width: BORDER_WIDTH,
            color: Color::BORDER,
        },
        Element::Fill {
            rect: Rect::new(canvas_w - ACCENT_SIZE, 0.0, ACCENT_SIZE, ACCENT_SIZE),
            color: Color::ACCENT,
        },
        Element::Image {
            slot: ImageSlot::Logo,
            rect: Rect::new(LOGO_X, LOGO_Y, logo_w, logo_h),
        },
        text(
            TITLE,
            CENTER_X,
            TITLE_BASELINE,
            TextStyle::new(36.0, Bold, Color::HEADING, Center),
        ),
        text(
            LEAD_IN,
            CENTER_X,
            LEAD_IN_BASELINE,
            TextStyle::new(16.0, Regular, Color::HEADING, Center),
        ),
        text(
            certificate.intern_name.as_str(),
            CENTER_X,
            NAME_BASELINE,
            TextStyle::new(32.0, Bold, Color::HEADING, Center),
        ),
        Element::Rule {
            x1: NAME_RULE_X1,
            x2: NAME_RULE_X2,
            y: NAME_RULE_Y,
            width: 1.0,
            color: Color::RULE,
        },
    ];

    let body = TextStyle::new(16.0, Regular, Color::BODY, Center);
    for (line, baseline) in body_lines(certificate).into_iter().zip(BODY_BASELINES) {
        elements.push(text(line, CENTER_X, baseline, body));
    }

    elements.extend([
        Element::Image {
            slot: ImageSlot::Signature,
            rect: Rect::new(SIGNATURE_X, SIGNATURE_BOTTOM - sig_h, sig_w, sig_h),
        },
        text(
            certificate.issued_by.as_str(),
            SIGNATURE_X,
            SIGNER_NAME_BASELINE,
            TextStyle::new(18.0, Bold, Color::HEADING, Left),
        ),
        text(
            certificate.issued_by_title.as_str(),
            SIGNATURE_X,
            SIGNER_TITLE_BASELINE,
            TextStyle::new(14.0, Regular, Color::HEADING, Left),
        ),
    ]);

    if with_code {
        elements.extend([
            Element::Image {
                slot: ImageSlot::Code,
                rect: Rect::new(CODE_X, CODE_Y, CODE_SIZE, CODE_SIZE),
            },
            text(
                CODE_CAPTION,
                CODE_CAPTION_X,
                CODE_CAPTION_BASELINE,
                TextStyle::new(12.0, Regular, Color::HEADING, Center),
            ),
        ]);
    }

    Ok(Layout {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        elements,
    })
}

/// The two sentences describing the internship.
pub fn body_lines(certificate: &Certificate) -> [String; 2] {
    [
        format!(
            "successfully completed a {} {} Internship in {}",
            certificate.duration, certificate.mode, certificate.role
        ),
        format!(
            "from {} to {}, with satisfactory performance.",
            certificate.start_date, certificate.end_date
        ),
    ]
}
