// Adapters layer: concrete implementations for external systems (CSV files, stdin/stdout).

pub mod csv_io;
