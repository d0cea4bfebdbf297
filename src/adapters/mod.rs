// Adapters layer: concrete implementations of the domain ports.

pub mod flat_file;

pub use flat_file::FlatFileRepository;
