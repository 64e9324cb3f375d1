// Domain layer: record and key models plus the ports (traits) the core depends on.

pub mod model;
pub mod ports;
