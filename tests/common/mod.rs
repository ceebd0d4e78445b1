//! A simulated debug probe.
//!
//! The probe knows nothing about the crate's types. It finds the control
//! block by scanning memory for the signature and then works with raw byte
//! offsets, like a host tool attached over SWD or JTAG.

#![allow(dead_code)]

use std::ffi::{CStr, c_char};
use std::ptr;
use std::sync::atomic::{Ordering, fence};

use rtt::{RttCell, SIGNATURE};

const WORD: usize = size_of::<usize>();

pub const MAX_UP_CHANNELS: usize = 16;
pub const MAX_DOWN_CHANNELS: usize = 16 + WORD;
pub const UP: usize = 16 + 2 * WORD;
pub const NAME: usize = UP;
pub const BUFFER: usize = UP + WORD;
pub const SIZE: usize = UP + 2 * WORD;
pub const WRITE_OFFSET: usize = UP + 3 * WORD;
pub const READ_OFFSET: usize = UP + 4 * WORD;
pub const FLAGS: usize = UP + 5 * WORD;

pub struct Probe {
	block: *mut u8,
}

// SAFETY: the probe plays the host, which runs independently of the target.
unsafe impl Send for Probe {}

impl Probe {
	/// Searches `len` bytes starting at `start` for a control block.
	///
	/// # Safety
	///
	/// The region must be readable, and a block found in it must stay alive
	/// and writable at its read offset for as long as the probe is used.
	pub unsafe fn scan(start: *const u8, len: usize) -> Option<Self> {
		if len < SIGNATURE.len() {
			return None;
		}

		(0..=len - SIGNATURE.len())
			.step_by(WORD)
			.find(|&offset| {
				SIGNATURE.iter().enumerate().all(|(i, &expected)| {
					// SAFETY: `offset + i < len`.
					unsafe { ptr::read_volatile(start.add(offset + i)) == expected }
				})
			})
			.map(|offset| Self {
				// SAFETY: `offset < len`.
				block: unsafe { start.add(offset) }.cast_mut(),
			})
	}

	/// Attaches to the block inside `cell`, if it has been published.
	pub fn attach(cell: &RttCell) -> Option<Self> {
		let (start, len) = cell.as_bytes_ptr();
		// SAFETY: the pointer covers exactly the block, which tests keep alive.
		unsafe { Self::scan(start, len) }
	}

	/// Address of the block the probe found.
	pub fn address(&self) -> *const u8 {
		self.block.cast_const()
	}

	fn word(&self, offset: usize) -> usize {
		// SAFETY: `offset` is one of the word-aligned field offsets.
		unsafe { ptr::read_volatile(self.block.add(offset).cast::<usize>()) }
	}

	fn pointer(&self, offset: usize) -> *const u8 {
		// SAFETY: `offset` is one of the word-aligned field offsets.
		unsafe { ptr::read_volatile(self.block.add(offset).cast::<*const u8>()) }
	}

	pub fn max_up_channels(&self) -> usize {
		self.word(MAX_UP_CHANNELS)
	}

	pub fn max_down_channels(&self) -> usize {
		self.word(MAX_DOWN_CHANNELS)
	}

	pub fn name(&self) -> String {
		// SAFETY: the target stores a pointer to a NUL-terminated static string.
		let name = unsafe { CStr::from_ptr(self.pointer(NAME).cast::<c_char>()) };
		name.to_string_lossy().into_owned()
	}

	pub fn buffer(&self) -> *const u8 {
		self.pointer(BUFFER)
	}

	pub fn size(&self) -> usize {
		self.word(SIZE)
	}

	pub fn write_offset(&self) -> usize {
		self.word(WRITE_OFFSET)
	}

	pub fn read_offset(&self) -> usize {
		self.word(READ_OFFSET)
	}

	pub fn flags(&self) -> usize {
		self.word(FLAGS)
	}

	pub fn set_read_offset(&mut self, offset: usize) {
		// SAFETY: `READ_OFFSET` is word aligned and owned by the host.
		unsafe { ptr::write_volatile(self.block.add(READ_OFFSET).cast::<usize>(), offset) }
	}

	pub fn set_flags(&mut self, flags: usize) {
		// SAFETY: `FLAGS` is word aligned and lies inside the block.
		unsafe { ptr::write_volatile(self.block.add(FLAGS).cast::<usize>(), flags) }
	}

	/// Bytes written by the target and not yet consumed.
	pub fn pending(&self) -> usize {
		let size = self.size();
		(self.write_offset() + size - self.read_offset()) % size
	}

	/// Consumes up to `max` unread bytes, advancing the read offset.
	pub fn drain(&mut self, max: usize) -> Vec<u8> {
		let size = self.size();
		let write = self.write_offset();
		let mut read = self.read_offset();
		fence(Ordering::Acquire);

		let buffer = self.buffer();
		let mut bytes = Vec::new();
		while read != write && bytes.len() < max {
			// SAFETY: `read < size` and the buffer is `size` bytes long.
			bytes.push(unsafe { ptr::read_volatile(buffer.add(read)) });
			read = (read + 1) % size;
		}

		fence(Ordering::Release);
		self.set_read_offset(read);
		bytes
	}

	/// Consumes every unread byte.
	pub fn drain_all(&mut self) -> Vec<u8> {
		self.drain(usize::MAX)
	}
}
