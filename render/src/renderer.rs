use std::{io::Cursor, sync::Arc};

use ab_glyph::FontArc;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use tracing::{info, warn};
use vouch_common::views::Certificate;

use crate::{
    assets::{AssetKind, AssetSource},
    code::EncodedCode,
    error::RenderError,
    layout::{self, Dimensions, Layout},
    raster::{self, SlotImages},
};

/// A finished certificate: the layout it was painted from and the pixels.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    pub layout: Layout,
    pub image: RgbaImage,
}

impl RenderedCertificate {
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut png = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(RenderError::Export)?;
        Ok(png)
    }
}

/// Renders certificates against a fixed set of static assets.
#[derive(Debug, Clone)]
pub struct Renderer {
    assets: Arc<dyn AssetSource>,
}

impl Renderer {
    pub fn new(assets: Arc<dyn AssetSource>) -> Self {
        Self { assets }
    }

    /// Render `certificate`, with its verification code if one is given.
    ///
    /// The logo, signature and typeface are fetched concurrently with the
    /// decoding of the code. Painting only starts once all of them have
    /// settled, and a failure of any asset fails the whole render.
    /// A code that cannot be decoded is dropped and its region left blank.
    #[tracing::instrument(
        skip_all,
        fields(verification_id = %certificate.verification_id, with_code = code.is_some())
    )]
    pub async fn render(
        &self,
        certificate: &Certificate,
        code: Option<&EncodedCode>,
    ) -> Result<RenderedCertificate, RenderError> {
        let required = async {
            tokio::try_join!(
                self.load_image(AssetKind::Logo),
                self.load_image(AssetKind::Signature),
                self.load_typeface(),
            )
        };
        let optional = async { code.and_then(decode_code) };

        let (required, code_image) = tokio::join!(required, optional);
        let (logo, signature, typeface) = required?;

        let layout = layout::compose(
            certificate,
            dimensions(&logo),
            dimensions(&signature),
            code_image.is_some(),
        )?;

        let image = raster::paint(
            &layout,
            SlotImages {
                logo: &logo,
                signature: &signature,
                code: code_image.as_ref(),
            },
            &typeface,
        );

        info!(with_code = layout.has_code(), "Rendered certificate");
        Ok(RenderedCertificate { layout, image })
    }

    async fn load_bytes(&self, kind: AssetKind) -> Result<Option<Vec<u8>>, RenderError> {
        self.assets
            .load(kind)
            .await
            .map_err(|source| RenderError::AssetLoad { kind, source })
    }

    async fn load_image(&self, kind: AssetKind) -> Result<DynamicImage, RenderError> {
        let bytes = self
            .load_bytes(kind)
            .await?
            .ok_or(RenderError::MissingAsset(kind))?;

        image::load_from_memory(&bytes).map_err(|source| RenderError::AssetDecode { kind, source })
    }

    async fn load_typeface(&self) -> Result<FontArc, RenderError> {
        let bytes = self
            .load_bytes(AssetKind::Typeface)
            .await?
            .ok_or(RenderError::MissingAsset(AssetKind::Typeface))?;

        Ok(FontArc::try_from_vec(bytes)?)
    }
}

fn dimensions(image: &DynamicImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions { width, height }
}

fn decode_code(code: &EncodedCode) -> Option<DynamicImage> {
    match image::load_from_memory_with_format(&code.png, ImageFormat::Png) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(
                verification_id = %code.verification_id,
                "Verification code could not be decoded, rendering without it: {e}"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use image::{Rgba, RgbaImage};
    use ulid::Ulid;
    use vouch_common::{VerificationId, views::InternshipMode};

    use super::*;
    use crate::{
        assets::MemoryAssetSource,
        code::CodeEncoder,
        layout::{Color, Element, ImageSlot},
    };

    const LOGO_COLOR: [u8; 4] = [0x1f, 0x29, 0x37, 0xff];
    const SIGNATURE_COLOR: [u8; 4] = [0x25, 0x63, 0xeb, 0xff];

    fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let mut out = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba(color))
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    const DEJAVU_SANS: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSans.ttf"
    ));

    fn assets() -> MemoryAssetSource {
        MemoryAssetSource::new()
            .with(AssetKind::Logo, png(240, 80, LOGO_COLOR))
            .with(AssetKind::Signature, png(280, 70, SIGNATURE_COLOR))
            .with(AssetKind::Typeface, DEJAVU_SANS)
    }

    fn renderer(source: MemoryAssetSource) -> Renderer {
        Renderer::new(Arc::new(source))
    }

    fn asha() -> Certificate {
        Certificate {
            id: Ulid::nil(),
            verification_id: VerificationId::parse("0f8fad5b-d9cb-469f-a165-70867728950e")
                .unwrap(),
            intern_name: "Asha Rao".into(),
            role: "Backend Intern".into(),
            duration: "12-week".into(),
            mode: InternshipMode::Online,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            issued_by: "A Siddarth Reddy".into(),
            issued_by_title: "Chief Technology Officer".into(),
            company: "DNOT Technologies".into(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap(),
        }
    }

    fn code_for(cert: &Certificate) -> EncodedCode {
        CodeEncoder::new("https://certs.example.com")
            .encode(cert.verification_id)
            .unwrap()
    }

    fn region_is_white(image: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        (y0..y1).all(|y| (x0..x1).all(|x| image.get_pixel(x, y).0 == Color::WHITE.0))
    }

    #[tokio::test]
    async fn rendering_is_deterministic() {
        let cert = asha();
        let code = code_for(&cert);
        let renderer = renderer(assets());

        let first = renderer.render(&cert, Some(&code)).await.unwrap();
        let second = renderer.render(&cert, Some(&code)).await.unwrap();

        assert_eq!(first.layout, second.layout);
        assert_eq!(first.image.as_raw(), second.image.as_raw());
        assert_eq!(first.to_png().unwrap(), second.to_png().unwrap());
    }

    #[tokio::test]
    async fn canvas_carries_the_fixed_decoration() {
        let rendered = renderer(assets()).render(&asha(), None).await.unwrap();
        let image = &rendered.image;

        assert_eq!(image.dimensions(), (800, 600));
        assert_eq!(image.get_pixel(400, 590).0, Color::WHITE.0);
        assert_eq!(image.get_pixel(20, 300).0, Color::BORDER.0);
        assert_eq!(image.get_pixel(780, 300).0, Color::BORDER.0);
        assert_eq!(image.get_pixel(750, 50).0, Color::ACCENT.0);
        assert_eq!(image.get_pixel(60, 50).0, LOGO_COLOR);
        assert_eq!(image.get_pixel(110, 440).0, SIGNATURE_COLOR);
    }

    #[tokio::test]
    async fn code_region_is_blank_without_a_code() {
        let cert = asha();
        let code = code_for(&cert);
        let renderer = renderer(assets());

        let with = renderer.render(&cert, Some(&code)).await.unwrap();
        let without = renderer.render(&cert, None).await.unwrap();

        assert!(with.layout.has_code());
        assert!(!without.layout.has_code());
        assert!(region_is_white(&without.image, 650, 420, 730, 500));
        assert!(!region_is_white(&with.image, 650, 420, 730, 500));

        // Outside the code and its caption both renders are identical.
        for (x, y, a) in without.image.enumerate_pixels() {
            let in_code = (630..750).contains(&x) && (420..520).contains(&y);
            if !in_code {
                assert_eq!(a, with.image.get_pixel(x, y), "pixel ({x}, {y}) differs");
            }
        }

        let texts_with: Vec<&str> = with.layout.texts().collect();
        let texts_without: Vec<&str> = without.layout.texts().collect();
        assert_eq!(&texts_with[..texts_without.len()], &texts_without[..]);
        assert_eq!(texts_with.last(), Some(&"Verification ID"));
    }

    #[tokio::test]
    async fn undecodable_code_degrades_to_no_code() {
        let cert = asha();
        let mut code = code_for(&cert);
        code.png = b"not a png".to_vec();

        let rendered = renderer(assets()).render(&cert, Some(&code)).await.unwrap();
        assert!(!rendered.layout.has_code());
        assert!(region_is_white(&rendered.image, 650, 420, 730, 500));
    }

    #[tokio::test]
    async fn missing_logo_fails_the_render() {
        let source = MemoryAssetSource::new()
            .with(AssetKind::Signature, png(280, 70, SIGNATURE_COLOR))
            .with(AssetKind::Typeface, DEJAVU_SANS);
        let err = renderer(source).render(&asha(), None).await.unwrap_err();
        assert!(matches!(err, RenderError::MissingAsset(AssetKind::Logo)));
    }

    #[tokio::test]
    async fn missing_typeface_fails_the_render() {
        let source = MemoryAssetSource::new()
            .with(AssetKind::Logo, png(240, 80, LOGO_COLOR))
            .with(AssetKind::Signature, png(280, 70, SIGNATURE_COLOR));
        let err = renderer(source).render(&asha(), None).await.unwrap_err();
        assert!(matches!(err, RenderError::MissingAsset(AssetKind::Typeface)));
    }

    #[tokio::test]
    async fn text_is_painted_with_the_typeface() {
        let renderer = renderer(assets());
        let first = renderer.render(&asha(), None).await.unwrap();

        // Title, lead-in, name and both body lines all carry ink.
        for baseline in [160, 200, 250, 310, 340] {
            assert!(
                !region_is_white(&first.image, 150, baseline - 10, 650, baseline),
                "nothing painted above baseline {baseline}"
            );
        }
        // Signer name and title, left-aligned under the signature.
        assert!(!region_is_white(&first.image, 100, 465, 300, 500));

        let mut other = asha();
        other.intern_name = "Rohan Mehta".into();
        let second = renderer.render(&other, None).await.unwrap();

        let mut name_band_differs = false;
        for (x, y, a) in first.image.enumerate_pixels() {
            let b = second.image.get_pixel(x, y);
            if (210..255).contains(&y) {
                name_band_differs |= a != b;
            } else {
                assert_eq!(a, b, "pixel ({x}, {y}) differs outside the name band");
            }
        }
        assert!(name_band_differs);
    }

    #[tokio::test]
    async fn corrupt_signature_fails_the_render() {
        let source = assets().with(AssetKind::Signature, b"garbage".to_vec());
        let err = renderer(source).render(&asha(), None).await.unwrap_err();
        assert!(matches!(
            err,
            RenderError::AssetDecode {
                kind: AssetKind::Signature,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn configured_but_invalid_typeface_fails_the_render() {
        let source = assets().with(AssetKind::Typeface, b"not a font".to_vec());
        let err = renderer(source).render(&asha(), None).await.unwrap_err();
        assert!(matches!(err, RenderError::Typeface(_)));
    }

    #[tokio::test]
    async fn layout_places_images_from_intrinsic_sizes() {
        let rendered = renderer(assets()).render(&asha(), None).await.unwrap();
        let images: Vec<ImageSlot> = rendered
            .layout
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Image { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(images, vec![ImageSlot::Logo, ImageSlot::Signature]);
    }
}
