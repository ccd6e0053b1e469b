pub mod byte_source;
pub mod demo_image;
pub mod file_memory;
pub mod windowed_device;
