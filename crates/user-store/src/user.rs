use chrono::{DateTime, Utc};
use common::{LaunchId, UserId};

/// A user record together with the launches it has booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// The identity the user was created from (an email address).
    pub username: String,
    /// Booked launches in booking order.
    pub trips: Vec<LaunchId>,
    pub created_at: DateTime<Utc>,
}
