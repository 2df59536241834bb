#![doc = include_str!("../README.md")]

/// Handles all app configuration.
pub mod config;

/// Driver location types and validation of incoming updates.
pub mod domain;

/// Error types and their conversion into HTTP responses.
pub mod error;

/// Builds the MongoDB filter, update and option documents for each store operation.
pub mod query;

/// Defines the handlers for all API routes.
pub mod routes;

/// Persistence of driver locations, abstracted over MongoDB and an in-memory map.
pub mod store;

/// Handles the server startup, such as route configuration and middleware.
pub mod startup;

/// Handles logs and tracing.
pub mod telemetry;
