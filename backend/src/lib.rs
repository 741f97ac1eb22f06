//! Pokédex collection backend.
//!
//! An authenticated REST service letting registered users curate favorites
//! and a bounded battle team of creatures sourced from an external catalog.
//! Layout is hexagonal: `domain` holds entities, ports, and services;
//! `inbound::http` adapts Actix requests onto the driving ports;
//! `outbound` implements the driven ports (catalog HTTP client, Diesel
//! persistence, credential and token primitives); `server` wires it all.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
