// Domain layer: card models and the ports the façade and binaries depend on.

pub mod model;
pub mod ports;
