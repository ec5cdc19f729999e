pub mod process;
pub mod mark;
pub mod list;
pub mod ingest;
