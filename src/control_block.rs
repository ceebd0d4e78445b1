//! The RTT control block.
//!
//! A debug probe finds the control block by scanning target RAM for
//! [`SIGNATURE`] and then reads the channel descriptors that follow it.
//! The layout below is the wire format expected by host tools and must not
//! change:
//!
//! ```text
//! offset      field
//! 0           signature          [u8; 16]
//! 16          max_up_channels    usize
//! 16 + 1w     max_down_channels  usize
//! 16 + 2w     up.name            *const u8
//! 16 + 3w     up.buffer          *mut u8
//! 16 + 4w     up.size            usize
//! 16 + 5w     up.write_offset    usize
//! 16 + 6w     up.read_offset     usize
//! 16 + 7w     up.flags           usize
//! ```
//!
//! `w` is the size of a pointer on the target.

use core::cell::UnsafeCell;
use core::ffi::CStr;
use core::mem::offset_of;
use core::ptr::{self, NonNull};
use core::sync::atomic::{Ordering, fence};

use static_assertions::const_assert_eq;
use volatile::VolatilePtr;
use volatile::access::ReadOnly;
use volatile_macro::VolatileFieldAccess;

use crate::channel::ChannelMode;

/// Bytes a host searches for to locate the control block.
pub const SIGNATURE: [u8; 16] = *b"SEGGER RTT\0\0\0\0\0\0";

/// Number of target-to-host channels.
pub const MAX_UP_CHANNELS: usize = 1;

/// Number of host-to-target channels.
pub const MAX_DOWN_CHANNELS: usize = 0;

/// Descriptor of one ring buffer.
///
/// Only `write_offset` is ever written by the target after binding.
/// `read_offset` belongs to the host, so the volatile projection hands out
/// read-only access to it.
#[derive(VolatileFieldAccess, Clone, Copy, Debug)]
#[repr(C)]
pub struct ChannelDesc {
	#[access(ReadOnly)]
	name: *const u8,
	#[access(ReadOnly)]
	buffer: *mut u8,
	#[access(ReadOnly)]
	size: usize,
	write_offset: usize,
	#[access(ReadOnly)]
	read_offset: usize,
	#[access(ReadOnly)]
	flags: usize,
}

impl ChannelDesc {
	const fn unbound() -> Self {
		Self {
			name: ptr::null(),
			buffer: ptr::null_mut(),
			size: 0,
			write_offset: 0,
			read_offset: 0,
			flags: ChannelMode::Block as usize,
		}
	}
}

/// The structure exported to the host.
#[derive(VolatileFieldAccess, Debug)]
#[repr(C)]
pub struct ControlBlock {
	signature: [u8; 16],
	#[access(ReadOnly)]
	max_up_channels: usize,
	#[access(ReadOnly)]
	max_down_channels: usize,
	up: ChannelDesc,
}

const WORD: usize = size_of::<usize>();

const_assert_eq!(size_of::<ChannelDesc>(), 6 * WORD);
const_assert_eq!(offset_of!(ChannelDesc, name), 0);
const_assert_eq!(offset_of!(ChannelDesc, buffer), WORD);
const_assert_eq!(offset_of!(ChannelDesc, size), 2 * WORD);
const_assert_eq!(offset_of!(ChannelDesc, write_offset), 3 * WORD);
const_assert_eq!(offset_of!(ChannelDesc, read_offset), 4 * WORD);
const_assert_eq!(offset_of!(ChannelDesc, flags), 5 * WORD);

const_assert_eq!(offset_of!(ControlBlock, signature), 0);
const_assert_eq!(offset_of!(ControlBlock, max_up_channels), 16);
const_assert_eq!(offset_of!(ControlBlock, max_down_channels), 16 + WORD);
const_assert_eq!(offset_of!(ControlBlock, up), 16 + 2 * WORD);
const_assert_eq!(
	size_of::<ControlBlock>(),
	16 + 2 * WORD + (MAX_UP_CHANNELS + MAX_DOWN_CHANNELS) * size_of::<ChannelDesc>()
);

impl ControlBlock {
	/// Creates a control block without signature and with an unbound up channel.
	///
	/// A host ignores the block until [`UpChannel::bind`](crate::UpChannel::bind)
	/// publishes the signature.
	pub const fn new() -> Self {
		Self {
			signature: [0; 16],
			max_up_channels: MAX_UP_CHANNELS,
			max_down_channels: MAX_DOWN_CHANNELS,
			up: ChannelDesc::unbound(),
		}
	}
}

impl Default for ControlBlock {
	fn default() -> Self {
		Self::new()
	}
}

/// Points the up channel of `block` at `buffer` and publishes the signature.
///
/// The descriptor is fully written before the signature becomes visible, so
/// a host scanning memory never sees a half-initialized block.
pub(crate) fn publish(block: VolatilePtr<'_, ControlBlock>, name: &'static CStr, buffer: NonNull<[u8]>) {
	block.up().write(ChannelDesc {
		name: name.as_ptr().cast::<u8>(),
		buffer: buffer.cast::<u8>().as_ptr(),
		size: buffer.len(),
		write_offset: 0,
		read_offset: 0,
		flags: ChannelMode::Block.into(),
	});
	fence(Ordering::Release);
	block.signature().write(SIGNATURE);
}

/// Interior-mutable home of a [`ControlBlock`].
///
/// The host reads and writes the block behind the compiler's back, so it
/// is only ever accessed through volatile pointers obtained from
/// [`RttCell::as_ptr`].
#[repr(transparent)]
pub struct RttCell(UnsafeCell<ControlBlock>);

// SAFETY: all accesses go through volatile pointers, and the single-producer
// rule is upheld by `UpChannel::bind`.
unsafe impl Sync for RttCell {}

impl RttCell {
	/// Creates a cell holding an unsigned [`ControlBlock`].
	pub const fn new() -> Self {
		Self(UnsafeCell::new(ControlBlock::new()))
	}

	/// Pointer to the block. Every access through it must be volatile.
	pub fn as_ptr(&self) -> NonNull<ControlBlock> {
		// SAFETY: `UnsafeCell::get` never returns null.
		unsafe { NonNull::new_unchecked(self.0.get()) }
	}

	/// Returns `true` once the signature has been published.
	pub fn is_published(&self) -> bool {
		// SAFETY: the block lives as long as `self` and is only accessed
		// through volatile pointers.
		let block = unsafe { VolatilePtr::new(self.as_ptr()) };
		block.signature().read() == SIGNATURE
	}

	/// Address and length of the block, as seen by a memory scan.
	pub fn as_bytes_ptr(&self) -> (*const u8, usize) {
		(self.as_ptr().as_ptr().cast_const().cast::<u8>(), size_of::<ControlBlock>())
	}
}

impl Default for RttCell {
	fn default() -> Self {
		Self::new()
	}
}

/// The control block a debug probe looks for.
#[used]
#[unsafe(export_name = "_SEGGER_RTT")]
pub static CONTROL_BLOCK: RttCell = RttCell::new();
