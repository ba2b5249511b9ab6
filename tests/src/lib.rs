//! Test doubles shared by the integration suites.

pub mod mock;
