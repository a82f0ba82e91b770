// Application layer: wires config, session and managers into CLI commands.

pub mod commands;
