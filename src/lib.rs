//! Declarative API gateway synthesis and the Lambda bridge that serves it.
//!
//! One [`models::api::ApiSchema`] drives both halves: [`synth`] renders it
//! into an inline gateway definition with integrations, CORS and a user
//! pool authorizer, and [`router`] plus [`handler`] serve the same routes
//! from a single shared function at run time.

pub mod api;
pub mod bridge;
pub mod endpoints;
pub mod handler;
pub mod models;
pub mod router;
pub mod spec;
pub mod synth;
