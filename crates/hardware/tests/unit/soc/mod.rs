



/// Flash and SRAM regions.
pub mod memory;
