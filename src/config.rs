use core::ffi::CStr;

/// Size of the buffer bound by [`init_default`](crate::init_default).
pub const DEFAULT_BUFFER_SIZE: usize = 0x400;

/// Label the host shows for the up channel.
pub const CHANNEL_NAME: &CStr = c"Terminal";

/// Smallest buffer that can hold one unread byte next to the reserved slot.
pub(crate) const MIN_BUFFER_SIZE: usize = 2;
