// Domain layer: feature table, request/response models and the model port.

pub mod model;
pub mod ports;
