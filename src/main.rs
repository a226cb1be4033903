use clap::Parser;
use easel::api;
use easel::raster::SoftwareRaster;
use easel::workspace::Workspace;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "Single-image raster scratchpad served over HTTP")]
#[command(long_about = "\
Single-image raster scratchpad served over HTTP

Upload an image with POST /save, then edit it in place:

  /pencil_point  /pencil_line  /draw_square     draw in black
  /eraser_click  /eraser_line  /eraser_square   draw in white
  /cut_out                                      crop to cut_image.jpg
  /fillArea                                     flood-fill to filled_image.*
  /copyCutImage                                 overwrite active with the crop

The workspace directory holds the active image and everything derived from
it; each upload clears it. One image at a time, last writer wins.")]
#[command(version)]
struct Cli {
    /// Directory holding the active image and derived files
    #[arg(long, default_value = "workspace")]
    workspace: PathBuf,

    /// Socket address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("easel=info")),
        )
        .init();

    let workspace = Workspace::open(&cli.workspace)?;
    tracing::info!(dir = %cli.workspace.display(), "workspace ready");

    let app = api::router(workspace, SoftwareRaster::new());

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(addr = %cli.listen, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve when ctrl-c arrives, letting in-flight requests drain.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
    }
}
