//! Formatted output on top of an [`UpChannel`].
//!
//! [`Writer`] adapts a channel to [`core::fmt::Write`]. The free functions
//! in this module act on the process-wide console, which owns the channel
//! of [`CONTROL_BLOCK`] once [`init`] has run. Output produced before that
//! is discarded.

use core::fmt;

use hermit_sync::InterruptTicketMutex;
use take_static::take_static;

use crate::channel::{Spin, UpChannel, Wait};
use crate::config::{CHANNEL_NAME, DEFAULT_BUFFER_SIZE};
use crate::control_block::CONTROL_BLOCK;
use crate::error::InitError;

/// Formatting adapter for an up channel.
///
/// None of the operations can fail. A full buffer makes them wait for the
/// host instead.
pub struct Writer<'c, 'a, W: Wait = Spin> {
	channel: &'c mut UpChannel<'a, W>,
}

impl<'c, 'a, W: Wait> Writer<'c, 'a, W> {
	pub fn new(channel: &'c mut UpChannel<'a, W>) -> Self {
		Self { channel }
	}

	/// Renders `args` into the channel.
	///
	/// Errors reported by `Display` implementations end the rendering
	/// early and are otherwise ignored.
	pub fn print(&mut self, args: fmt::Arguments<'_>) {
		let _ = fmt::Write::write_fmt(self, args);
	}

	/// Renders `args` followed by a single `\n`.
	pub fn println(&mut self, args: fmt::Arguments<'_>) {
		self.print(args);
		self.write_all(b"\n");
	}

	/// Writes raw bytes.
	pub fn write_all(&mut self, bytes: &[u8]) {
		self.channel.write(bytes);
	}

	/// Writes `byte` `n` times.
	pub fn write_byte_n_times(&mut self, byte: u8, n: usize) {
		for _ in 0..n {
			self.write_all(&[byte]);
		}
	}
}

impl<W: Wait> fmt::Write for Writer<'_, '_, W> {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.write_all(s.as_bytes());
		Ok(())
	}
}

pub(crate) struct Console {
	channel: Option<UpChannel<'static>>,
}

impl Console {
	const fn empty() -> Self {
		Self { channel: None }
	}

	fn with_writer(&mut self, f: impl FnOnce(&mut Writer<'_, 'static>)) {
		if let Some(channel) = self.channel.as_mut() {
			f(&mut Writer::new(channel));
		}
	}
}

/// Interrupts stay masked while the console is locked.
pub(crate) static CONSOLE: InterruptTicketMutex<Console> = InterruptTicketMutex::new(Console::empty());

/// Binds `buffer` to the up channel and makes the control block visible to
/// the host.
///
/// Must run before the first output that should reach the host. Only the
/// first successful call has an effect.
pub fn init(buffer: &'static mut [u8]) -> Result<(), InitError> {
	let size = buffer.len();
	{
		let mut console = CONSOLE.lock();
		if console.channel.is_some() {
			return Err(InitError::AlreadyInitialized);
		}

		// SAFETY: the console is the only place that binds `CONTROL_BLOCK`,
		// and its lock is held while the channel slot is still empty.
		let channel = unsafe { UpChannel::bind(&CONTROL_BLOCK, CHANNEL_NAME, buffer)? };
		console.channel = Some(channel);
	}

	trace!("RTT up channel bound to a {size} byte buffer");
	Ok(())
}

/// Like [`init`], with a crate-owned buffer of [`DEFAULT_BUFFER_SIZE`] bytes.
pub fn init_default() -> Result<(), InitError> {
	take_static! {
		static BUFFER: [u8; DEFAULT_BUFFER_SIZE] = [0; DEFAULT_BUFFER_SIZE];
	}

	let buffer = BUFFER.take().ok_or(InitError::AlreadyInitialized)?;
	init(buffer)
}

/// Renders `args` to the console.
pub fn print(args: fmt::Arguments<'_>) {
	CONSOLE.lock().with_writer(|writer| writer.print(args));
}

/// Renders `args` and a newline to the console.
pub fn println(args: fmt::Arguments<'_>) {
	CONSOLE.lock().with_writer(|writer| writer.println(args));
}

/// Writes raw bytes to the console.
pub fn write_all(bytes: &[u8]) {
	CONSOLE.lock().with_writer(|writer| writer.write_all(bytes));
}

/// Writes `byte` `n` times to the console.
pub fn write_byte_n_times(byte: u8, n: usize) {
	CONSOLE
		.lock()
		.with_writer(|writer| writer.write_byte_n_times(byte, n));
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
	print(args);
}

#[doc(hidden)]
pub fn _println(args: fmt::Arguments<'_>) {
	println(args);
}
