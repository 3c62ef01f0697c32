use clap::Parser;
use wx_processor::cli::{run, Cli};
use wx_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
