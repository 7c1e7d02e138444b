//! Caller identity.
//!
//! Authentication happens upstream; requests reach this service with the
//! authenticated user's uuid in the `x-user-uuid` header.

pub(crate) mod middleware;
