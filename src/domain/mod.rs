// Domain layer: meeting prep models and ports (interfaces). No transport details here.

pub mod model;
pub mod ports;
