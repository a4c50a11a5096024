// Domain layer: value types and ports. Pure data, no I/O.

pub mod model;
pub mod ports;
