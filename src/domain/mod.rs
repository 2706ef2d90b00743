// Domain layer: core models, business rules and ports (interfaces).

pub mod model;
pub mod ports;
pub mod rules;
