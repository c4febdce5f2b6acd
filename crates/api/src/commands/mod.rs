//! Commands - host UI to monitor bridge

mod monitoring;

pub use monitoring::*;
