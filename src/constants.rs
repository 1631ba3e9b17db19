//! Sizing constants for guest memory and the operand stack.

/// Total size of guest memory, in code words.
///
/// The lower half (`0 .. CODE_BASE`) is the data region; the upper half
/// (`CODE_BASE .. MEM_SIZE`) is the code region.
pub const MEM_SIZE: usize = 200;

/// Index at which the code region begins; also the initial value of `ip`.
pub const CODE_BASE: usize = MEM_SIZE / 2;

/// Capacity of the operand stack, in code words.
pub const STACK_CAP: usize = 16;
