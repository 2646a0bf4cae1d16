//! The I/O stages between the child's byte streams and the buses.

mod framer;
mod mirror;
mod tee;
mod writer;

pub use framer::frame_lines;
pub use mirror::mirror_stdin;
pub use tee::Tee;
pub use writer::write_input;
