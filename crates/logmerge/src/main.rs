use clap::Parser;
use logmerge::runtime::{boot, cli::Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    boot::init_logging(cli.verbose);
    run::run(&cli)?;
    Ok(())
}
