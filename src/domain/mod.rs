// Domain layer: core models and ports (interfaces) for the payroll admin console.

pub mod model;
pub mod ports;
