use anyhow::Result;
use clap::Parser;
use veyfi_cli::Opts;

fn main() -> Result<()> {
    veyfi_cli::entry(Opts::parse())
}
