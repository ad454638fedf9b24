//! Stream readers.

pub mod stream;

pub use stream::StreamReader;
