// Domain layer: audit models and ports (interfaces).

pub mod model;
pub mod ports;
