pub mod common;
pub mod config;
pub mod observability;

// Domain data shapes shared across layers
pub mod domain;

// Application boundaries and infrastructure adapters
pub mod app;
pub mod infra;
pub mod storage;

// The three backend components
pub mod calculations;
pub mod email;
pub mod jobs;
