//! See <https://github.com/matklad/cargo-xtask/>.

mod arch;
mod build;
mod clippy;
mod doc;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use xshell::Shell;

#[derive(Parser)]
enum Cli {
	Build(build::Build),
	Clippy(clippy::Clippy),
	Doc(doc::Doc),
}

impl Cli {
	fn run(self) -> Result<()> {
		match self {
			Self::Build(build) => build.run(),
			Self::Clippy(clippy) => clippy.run(),
			Self::Doc(doc) => doc.run(),
		}
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	cli.run()
}

pub fn sh() -> Result<Shell> {
	let sh = Shell::new()?;
	let project_root = Path::new(env!("CARGO_MANIFEST_DIR"))
		.parent()
		.context("xtask is not inside the workspace")?;
	sh.change_dir(project_root);
	Ok(sh)
}
