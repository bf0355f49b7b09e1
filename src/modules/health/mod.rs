// Health module: liveness and readiness probes

pub mod controllers;
pub mod services;
