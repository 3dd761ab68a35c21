// Domain layer: core models and ports (interfaces). No I/O beyond what the
// port signatures promise.

pub mod model;
pub mod ports;
