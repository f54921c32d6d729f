// Domain layer: scheduling models and ports (interfaces).

pub mod model;
pub mod ports;
