//! Outbound services.
//!
//! Services talk to external systems and hand raw results back to the flow.

pub mod verification_service;
