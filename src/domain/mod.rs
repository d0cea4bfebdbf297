// Domain layer: models and ports. Nothing here touches the filesystem or the console.

pub mod model;
pub mod ports;
