//! Request/response types exchanged with editor clients.
//!
//! Requests are internally tagged on `type` with camelCase names and fields,
//! matching the editor's JSON protocol.

pub mod info;
pub mod mutations;
