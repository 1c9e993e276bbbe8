//! YAML stream I/O: decoding source text into [`Node`](crate::node::Node)
//! trees, re-encoding processed trees back to YAML text, and the
//! document-by-document streaming façade the CLI and `!Include*` tags
//! both drive.

mod decoder;
mod encoder;
mod facade;

pub use decoder::{decode_str, DecodeError};
pub use encoder::encode_node;
pub use facade::{process_stream, render_stream};
