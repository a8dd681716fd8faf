//! CLI entry point for the photomosaic renderer

use clap::Parser;
use photomosaic::io::cli::{Cli, RenderCommand};

fn main() -> photomosaic::Result<()> {
    let cli = Cli::parse();
    photomosaic::io::logging::init(cli.verbose);
    let mut command = RenderCommand::new(cli);
    command.run().map(|_| ())
}
