//! Target side of the Real-Time Transfer (RTT) debug protocol.
//!
//! The crate exports a control block under the symbol `_SEGGER_RTT`. A debug
//! probe locates it by its signature and drains the single up channel while
//! the target keeps running. Writing never fails: when the buffer is full,
//! the writer waits until the host has read enough.
//!
//! ```no_run
//! rtt::init_default().unwrap();
//! rtt::rprintln!("Hello, {}!", "host");
//! ```
//!
//! # Features
#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]
#![no_std]

// The console lock only masks interrupts on these bare-metal architectures.
#[cfg(all(
	target_os = "none",
	not(any(
		target_arch = "aarch64",
		target_arch = "riscv64",
		target_arch = "x86_64"
	))
))]
compile_error!("hermit-rtt supports bare-metal aarch64, riscv64 and x86_64 only");

#[cfg(all(test, not(target_os = "none")))]
#[macro_use]
extern crate std;
#[macro_use]
extern crate log;

#[macro_use]
mod macros;

mod channel;
mod config;
pub mod console;
mod control_block;
mod error;
#[cfg(feature = "logger")]
pub mod logging;

pub use crate::channel::{Backoff, ChannelMode, Spin, UpChannel, Wait};
pub use crate::config::*;
pub use crate::console::{
	Writer, init, init_default, print, println, write_all, write_byte_n_times,
};
pub use crate::control_block::{
	CONTROL_BLOCK, ControlBlock, MAX_DOWN_CHANNELS, MAX_UP_CHANNELS, RttCell, SIGNATURE,
};
pub use crate::error::InitError;
