use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use vouch_common::{VerificationId, views::Certificate};
use vouch_db::storage::{CertificateStore, Storage};
use vouch_render::{CodeEncoder, FsAssetSource, RenderedCertificate, Renderer};

#[derive(Clone, Parser)]
pub struct RenderParams {
    pub verification_id: String,

    #[clap(long, env = "VOUCH_LOGO")]
    pub logo: PathBuf,

    #[clap(long, env = "VOUCH_SIGNATURE")]
    pub signature: PathBuf,

    /// TTF/OTF used for all text.
    #[clap(long, env = "VOUCH_FONT")]
    pub font: PathBuf,

    #[clap(short, long)]
    pub out: PathBuf,

    /// Leave the verification code region blank.
    #[clap(long, default_value_t = false)]
    pub no_code: bool,

    #[clap(
        long,
        env = "VOUCH_VERIFICATION_BASE_URL",
        default_value = "http://localhost:3000"
    )]
    pub base_url: String,
}

pub async fn render(stg: Arc<dyn Storage>, params: RenderParams) -> anyhow::Result<()> {
    let verification_id = VerificationId::parse(&params.verification_id)?;
    let cert: Certificate = CertificateStore::get_by_verification_id(&*stg, verification_id)
        .await?
        .with_context(|| format!("No certificate carries verification id {verification_id}"))?
        .into();

    render_to_file(&cert, &params).await?;
    println!("Wrote {}", params.out.display());
    Ok(())
}

async fn render_certificate(
    cert: &Certificate,
    params: &RenderParams,
) -> anyhow::Result<RenderedCertificate> {
    let renderer = Renderer::new(Arc::new(FsAssetSource {
        logo: params.logo.clone(),
        signature: params.signature.clone(),
        typeface: params.font.clone(),
    }));

    let code = if params.no_code {
        None
    } else {
        Some(CodeEncoder::new(&params.base_url).encode(cert.verification_id)?)
    };

    Ok(renderer.render(cert, code.as_ref()).await?)
}

async fn render_to_file(cert: &Certificate, params: &RenderParams) -> anyhow::Result<()> {
    let rendered = render_certificate(cert, params).await?;
    tokio::fs::write(&params.out, rendered.to_png()?)
        .await
        .with_context(|| format!("Failed to write {}", params.out.display()))?;

    Ok(())
}
