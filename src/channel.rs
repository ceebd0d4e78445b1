//! Up channel: the single-producer side of the shared ring buffer.
//!
//! The host drains the buffer on its own schedule and only communicates
//! through `read_offset`. One byte of the buffer always stays unused, so
//! `write_offset == read_offset` unambiguously means the buffer is empty.

use core::convert::Infallible;
use core::ffi::CStr;
use core::hint;
use core::ptr::{self, NonNull};
use core::sync::atomic::{Ordering, fence};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use volatile::VolatilePtr;

use crate::config::MIN_BUFFER_SIZE;
use crate::control_block::{
	self, ChannelDesc, ChannelDescVolatileFieldAccess, ControlBlockVolatileFieldAccess, RttCell,
};
use crate::error::InitError;

const MODE_MASK: usize = 0b11;

/// Behavior of a channel whose buffer is full.
#[derive(TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(usize)]
pub enum ChannelMode {
	/// Drop the whole write. Not implemented.
	Skip = 0,
	/// Write what fits and drop the rest. Not implemented.
	Truncate = 1,
	/// Wait until the host has made room.
	Block = 2,
}

/// What a writer does while the buffer is full.
///
/// A strategy only decides how to pass the time. It never affects which
/// bytes end up in the buffer.
pub trait Wait {
	/// Called each time a write finds no free space.
	fn wait(&mut self);

	/// Called after bytes have been committed.
	fn reset(&mut self) {}
}

/// Busy-waits with [`core::hint::spin_loop`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Spin;

impl Wait for Spin {
	#[inline]
	fn wait(&mut self) {
		hint::spin_loop();
	}
}

/// Exponential backoff between polls.
#[derive(Default, Debug)]
pub struct Backoff(crossbeam_utils::Backoff);

impl Wait for Backoff {
	fn wait(&mut self) {
		self.0.snooze();
	}

	fn reset(&mut self) {
		self.0.reset();
	}
}

impl<F: FnMut()> Wait for F {
	fn wait(&mut self) {
		self();
	}
}

/// Exclusive producer handle of an up channel.
///
/// Writing takes `&mut self`. Callers that share one handle between
/// several execution contexts (threads, interrupt handlers) must serialize
/// the calls themselves, e.g. inside a critical section.
pub struct UpChannel<'a, W = Spin> {
	desc: VolatilePtr<'a, ChannelDesc>,
	buffer: NonNull<u8>,
	size: usize,
	wait: W,
}

// SAFETY: the handle is the only producer of its descriptor and buffer.
unsafe impl<W: Send> Send for UpChannel<'_, W> {}

impl<'a> UpChannel<'a> {
	/// Binds `buffer` to the up channel of `cell` and publishes the
	/// control block to the host.
	///
	/// # Safety
	///
	/// No other `UpChannel` bound to `cell` may be used while the returned
	/// handle is alive.
	pub unsafe fn bind(
		cell: &'a RttCell,
		name: &'static CStr,
		buffer: &'a mut [u8],
	) -> Result<Self, InitError> {
		let size = buffer.len();
		if size < MIN_BUFFER_SIZE {
			return Err(InitError::BufferTooSmall { size });
		}

		// SAFETY: `cell` lives for `'a` and is only accessed through volatile pointers.
		let block = unsafe { VolatilePtr::new(cell.as_ptr()) };
		let buffer = NonNull::from(buffer);
		control_block::publish(block, name, buffer);

		Ok(Self {
			desc: block.up(),
			buffer: buffer.cast(),
			size,
			wait: Spin,
		})
	}
}

impl<'a, W> UpChannel<'a, W> {
	/// Replaces the wait strategy.
	pub fn with_wait<V: Wait>(self, wait: V) -> UpChannel<'a, V> {
		UpChannel {
			desc: self.desc,
			buffer: self.buffer,
			size: self.size,
			wait,
		}
	}

	/// Mode currently stored in the descriptor, `None` for unknown values.
	pub fn mode(&self) -> Option<ChannelMode> {
		ChannelMode::try_from(self.desc.flags().read() & MODE_MASK).ok()
	}

	/// Number of bytes the buffer can hold at once.
	pub fn capacity(&self) -> usize {
		self.size - 1
	}

	/// Number of bytes written but not yet read by the host.
	///
	/// A `read_offset` outside the buffer is reduced modulo its size.
	pub fn pending(&self) -> usize {
		let write = self.desc.write_offset().read();
		let read = self.desc.read_offset().read() % self.size;
		(write + self.size - read) % self.size
	}
}

impl<W: Wait> UpChannel<'_, W> {
	/// Copies all of `bytes` into the ring buffer, in order.
	///
	/// Blocks through the wait strategy while the buffer is full. If the
	/// host stops reading, this never returns.
	pub fn write(&mut self, mut bytes: &[u8]) {
		while !bytes.is_empty() {
			let write = self.desc.write_offset().read();
			let read = self.desc.read_offset().read();

			let available = contiguous_space(read, write, self.size);
			if available == 0 {
				debug_assert_eq!(
					self.mode(),
					Some(ChannelMode::Block),
					"only blocking mode is implemented"
				);
				self.wait.wait();
				continue;
			}

			let count = bytes.len().min(available);
			// SAFETY: `write + count <= size`, and the host never touches
			// `write..write + count` before the new offset is published.
			unsafe {
				ptr::copy_nonoverlapping(bytes.as_ptr(), self.buffer.as_ptr().add(write), count);
			}
			fence(Ordering::Release);
			self.desc.write_offset().write((write + count) % self.size);

			self.wait.reset();
			bytes = &bytes[count..];
		}
	}
}

/// Length of the free run starting at `write` that does not cross `read`
/// and keeps one slot reserved.
///
/// The result never exceeds `size - write`, even for an out-of-range
/// `read` published by a misbehaving host.
fn contiguous_space(read: usize, write: usize, size: usize) -> usize {
	let available = if read > write {
		read - write - 1
	} else if read == 0 {
		size - write - 1
	} else {
		size - write
	};
	available.min(size - write)
}

impl<W> embedded_io::ErrorType for UpChannel<'_, W> {
	type Error = Infallible;
}

impl<W: Wait> embedded_io::Write for UpChannel<'_, W> {
	fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
		UpChannel::write(self, buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}
}
