// Domain layer: records, view models and the ports the core drives.

pub mod model;
pub mod ports;
pub mod view;
