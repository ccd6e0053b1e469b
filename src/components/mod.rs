pub mod clock;
pub mod memory;
