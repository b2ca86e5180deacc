// Domain layer: core models and ports (interfaces). No dependencies on
// the concrete spreadsheet libraries; those live under adapters.

pub mod model;
pub mod ports;
