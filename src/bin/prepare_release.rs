use clap::Parser;

use release_tools::{Result, cli, command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::PrepareArgs::parse();

    cli::initialize_logger(args.debug)?;

    command::prepare::execute(&args).await?;

    Ok(())
}
