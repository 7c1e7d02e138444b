//! Users

use crate::uuids::TypedUuid;

/// Marker for identities issued by the upstream authentication layer.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
