// API route handlers, one module per resource.

pub mod forecast;
pub mod history;
pub mod predict;
pub mod privacy;
pub mod stats;
