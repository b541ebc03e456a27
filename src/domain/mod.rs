// Domain layer: deployment records and the ports the engine drives.

pub mod model;
pub mod ports;
