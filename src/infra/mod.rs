// Infrastructure adapters implementing the application ports

pub mod in_memory;
pub mod json_file_sink;
pub mod json_file_source;

pub use in_memory::{InMemorySink, InMemorySource};
pub use json_file_sink::JsonFileSink;
pub use json_file_source::{read_report, JsonFileSource};
