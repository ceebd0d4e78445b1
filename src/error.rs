//! Initialization errors.
//!
//! Writing never fails; only binding a buffer to the control block can.

use thiserror::Error;

use crate::config::MIN_BUFFER_SIZE;

/// The error type for binding a buffer to the up channel.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum InitError {
	/// The console already owns a bound up channel.
	#[error("RTT up channel is already initialized")]
	AlreadyInitialized,

	/// The buffer cannot hold a single byte next to the reserved slot.
	#[error(
		"RTT buffer of {size} bytes is too small, at least {min} bytes are required",
		min = MIN_BUFFER_SIZE
	)]
	BufferTooSmall {
		/// Length of the rejected buffer.
		size: usize,
	},
}
