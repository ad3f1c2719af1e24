//! Textual external interfaces: parse-table export/import, token-stream
//! ingestion, and parse-tree export.

pub mod table_io;
pub mod token_stream_io;
pub mod tree_io;
