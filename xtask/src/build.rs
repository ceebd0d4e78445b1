use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use xshell::cmd;

use crate::arch::Arch;

/// Build the library for an embedded target.
#[derive(Args)]
pub struct Build {
	/// Build for the architecture.
	#[arg(value_enum, long)]
	pub arch: Arch,

	/// Directory for all generated artifacts.
	#[arg(long)]
	pub target_dir: Option<PathBuf>,

	/// Do not activate the `default` feature.
	#[arg(long)]
	pub no_default_features: bool,

	/// Space or comma separated list of features to activate.
	#[arg(long)]
	pub features: Vec<String>,

	/// Build artifacts in release mode, with optimizations.
	#[arg(short, long)]
	pub release: bool,

	/// Build artifacts with the specified profile.
	#[arg(long)]
	pub profile: Option<String>,
}

impl Build {
	pub fn run(self) -> Result<()> {
		let sh = crate::sh()?;
		self.arch.install()?;

		eprintln!("Building hermit-rtt for {}", self.arch.triple());
		cmd!(sh, "cargo build --package hermit-rtt")
			.args(self.arch.cargo_args())
			.arg("--target-dir")
			.arg(self.target_dir())
			.args(self.no_default_features_args())
			.args(self.features_args())
			.args(self.profile_args())
			.run()?;

		Ok(())
	}

	fn no_default_features_args(&self) -> &[&str] {
		if self.no_default_features {
			&["--no-default-features"]
		} else {
			&[]
		}
	}

	fn features_args(&self) -> impl Iterator<Item = &str> {
		self.features
			.iter()
			.flat_map(|feature| ["--features", feature.as_str()])
	}

	fn profile_args(&self) -> [&str; 2] {
		["--profile", self.profile()]
	}

	fn profile(&self) -> &str {
		self.profile
			.as_deref()
			.unwrap_or(if self.release { "release" } else { "dev" })
	}

	fn target_dir(&self) -> &Path {
		self.target_dir
			.as_deref()
			.unwrap_or_else(|| Path::new("target"))
	}
}
