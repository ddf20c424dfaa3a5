//! Flat 16-bit address space, fixed vector locations and the traced bus.

/// Traced byte read/write accessors.
pub mod bus;

pub use bus::{pull_byte, push_byte, read_byte, write_byte};

/// Size in bytes of the flat address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Base address of the one-page hardware stack.
pub const STACK_PAGE: u16 = 0x0100;

/// Non-maskable interrupt vector. Named for completeness; the core never
/// injects through it.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset vector read by [`crate::MachineState::reset`].
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Maskable interrupt (and `BRK`) vector, the top two bytes of memory.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Allocates a zeroed 64 KiB backing store.
#[must_use]
pub fn new_address_space() -> Box<[u8]> {
    vec![0; ADDRESS_SPACE_BYTES].into_boxed_slice()
}

/// Reads a little-endian word directly from the backing store, wrapping at
/// the top of memory. No trace record is produced.
#[must_use]
pub fn read_u16_le(memory: &[u8], addr: u16) -> u16 {
    let lo = memory[usize::from(addr)];
    let hi = memory[usize::from(addr.wrapping_add(1))];
    u16::from_le_bytes([lo, hi])
}

/// Returns the absolute address addressed by stack pointer `sp`.
#[must_use]
pub const fn stack_address(sp: u8) -> u16 {
    STACK_PAGE | sp as u16
}
