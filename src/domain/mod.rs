// Domain layer: wire models, editable forms and the ports the core depends on.

pub mod forms;
pub mod model;
pub mod ports;
