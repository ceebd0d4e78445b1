use anyhow::Result;
use clap::Args;
use xshell::cmd;

use crate::arch::Arch;

/// Run Clippy for all targets.
#[derive(Args)]
pub struct Clippy;

impl Clippy {
	pub fn run(self) -> Result<()> {
		let sh = crate::sh()?;

		for arch in Arch::all() {
			arch.install()?;

			let triple = arch.triple();
			cmd!(sh, "cargo clippy --package hermit-rtt --target={triple}").run()?;
			cmd!(sh, "cargo clippy --package hermit-rtt --target={triple}")
				.arg("--no-default-features")
				.run()?;
		}

		cmd!(sh, "cargo clippy --package hermit-rtt --all-targets").run()?;
		cmd!(sh, "cargo clippy --package xtask").run()?;

		Ok(())
	}
}
