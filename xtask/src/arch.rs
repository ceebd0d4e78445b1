use anyhow::Result;
use clap::ValueEnum;
use xshell::cmd;

/// Target architecture.
///
/// Only architectures on which the console lock masks interrupts.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
#[value(rename_all = "snake_case")]
pub enum Arch {
	/// x86-64
	X86_64,
	/// AArch64
	Aarch64,
	/// 64-bit RISC-V
	Riscv64,
}

impl Arch {
	pub fn all() -> &'static [Self] {
		&[Self::X86_64, Self::Aarch64, Self::Riscv64]
	}

	pub fn install(&self) -> Result<()> {
		let sh = crate::sh()?;
		let triple = self.triple();
		cmd!(sh, "rustup target add {triple}").run()?;
		Ok(())
	}

	pub fn triple(&self) -> &'static str {
		match self {
			Self::X86_64 => "x86_64-unknown-none",
			Self::Aarch64 => "aarch64-unknown-none-softfloat",
			Self::Riscv64 => "riscv64gc-unknown-none-elf",
		}
	}

	pub fn cargo_args(&self) -> &'static [&'static str] {
		match self {
			Self::X86_64 => &["--target=x86_64-unknown-none"],
			Self::Aarch64 => &["--target=aarch64-unknown-none-softfloat"],
			Self::Riscv64 => &["--target=riscv64gc-unknown-none-elf"],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn targets_are_bare_metal_with_interrupt_masking() {
		for arch in Arch::all() {
			let triple = arch.triple();
			let (cpu, rest) = triple.split_once('-').unwrap();
			assert!(
				matches!(cpu, "x86_64" | "aarch64" | "riscv64gc"),
				"{triple}"
			);
			assert!(rest.contains("none"), "{triple}");
			assert!(arch.cargo_args()[0].ends_with(triple));
		}
	}
}
