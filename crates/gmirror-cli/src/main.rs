mod mirror;
mod summary;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = mirror::MirrorArgs::parse();
    mirror::run(args).await
}
