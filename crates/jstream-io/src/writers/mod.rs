//! Stream writers and text renderers.

pub mod jsonl;
pub mod stream;
pub mod table;

pub use jsonl::JsonlWriter;
pub use stream::{Mode, StreamWriter};
pub use table::{render_table, TableLayout};
