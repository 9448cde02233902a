//! gatehouse web server.
//!
//! An OIDC login gateway: visitors authenticate with an external identity
//! provider, their identity is kept in a signed session cookie, and `/`
//! routes them to a protected or a public page accordingly.

#![allow(non_snake_case)]

pub mod app;
pub mod auth;
pub mod config;
pub mod pages;
