//! Booking and cancellation of trips.
//!
//! A booking request covers several launches. Each launch is attempted on
//! its own and its outcome recorded; a failure never aborts the remaining
//! launches. The per-launch outcomes are then folded into a single
//! [`TripUpdateResponse`].

use launch_catalog::Launch;
use user_store::{LaunchId, User};

use crate::datasources::{LaunchDataSource, UserDataSource};
use crate::error::{DomainError, Result};

pub const BOOKED_MESSAGE: &str = "trips booked successfully";
pub const CANCELLED_MESSAGE: &str = "trip cancelled";
pub const CANCEL_FAILED_MESSAGE: &str = "failed to cancel trip";

/// Result of a booking or cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripUpdateResponse {
    pub success: bool,
    pub message: Option<String>,
    /// Launches the operation actually changed.
    pub launches: Vec<Launch>,
}

/// What happened to one requested launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked(Launch),
    AlreadyBooked,
    NotFound,
    Failed(String),
}

impl BookingOutcome {
    fn label(&self) -> &'static str {
        match self {
            BookingOutcome::Booked(_) => "booked",
            BookingOutcome::AlreadyBooked => "already_booked",
            BookingOutcome::NotFound => "not_found",
            BookingOutcome::Failed(_) => "failed",
        }
    }

    fn reason(&self) -> &str {
        match self {
            BookingOutcome::Booked(_) => "booked",
            BookingOutcome::AlreadyBooked => "already booked",
            BookingOutcome::NotFound => "launch not found",
            BookingOutcome::Failed(err) => err,
        }
    }
}

/// Books and cancels trips for the request's user.
pub struct BookingTransactionHandler<'a> {
    launches: &'a LaunchDataSource,
    users: &'a UserDataSource,
}

impl<'a> BookingTransactionHandler<'a> {
    pub fn new(launches: &'a LaunchDataSource, users: &'a UserDataSource) -> Self {
        Self { launches, users }
    }

    fn require_user(&self) -> Result<&'a User> {
        self.users
            .current_user()
            .ok_or(DomainError::AuthorizationRequired)
    }

    /// Books every launch in `launch_ids` for the current user.
    ///
    /// `success` is true only if every launch was newly booked. `launches`
    /// holds just the launches that were booked by this call.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AuthorizationRequired`] for anonymous
    /// requests. Backend failures on individual launches are reported in
    /// the response, not as errors.
    #[tracing::instrument(skip(self), fields(count = launch_ids.len()))]
    pub async fn book_trips(&self, launch_ids: &[String]) -> Result<TripUpdateResponse> {
        let user = self.require_user()?;

        let mut outcomes = Vec::with_capacity(launch_ids.len());
        for raw_id in launch_ids {
            let outcome = self.book_one(user, raw_id).await;
            metrics::counter!("gateway_trip_bookings_total", "outcome" => outcome.label())
                .increment(1);
            outcomes.push((raw_id.as_str(), outcome));
        }

        let response = summarize(outcomes);
        tracing::info!(
            user_id = %user.id,
            success = response.success,
            booked = response.launches.len(),
            "trips booked"
        );
        Ok(response)
    }

    async fn book_one(&self, user: &User, raw_id: &str) -> BookingOutcome {
        let Ok(launch_id) = raw_id.parse::<LaunchId>() else {
            return BookingOutcome::NotFound;
        };

        let launch = match self.launches.get_launch_by_id(launch_id).await {
            Ok(Some(launch)) => launch,
            Ok(None) => return BookingOutcome::NotFound,
            Err(err) => return BookingOutcome::Failed(err.to_string()),
        };

        match self.users.book_trip(user.id, launch_id).await {
            Ok(true) => BookingOutcome::Booked(launch),
            Ok(false) => BookingOutcome::AlreadyBooked,
            Err(err) => {
                tracing::warn!(%launch_id, error = %err, "booking failed");
                BookingOutcome::Failed(err.to_string())
            }
        }
    }

    /// Cancels the current user's trip on `launch_id`.
    ///
    /// Cancelling a trip the user does not hold is reported with
    /// `success = false`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AuthorizationRequired`] for anonymous
    /// requests.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_trip(&self, launch_id: &str) -> Result<TripUpdateResponse> {
        let user = self.require_user()?;

        let Ok(id) = launch_id.parse::<LaunchId>() else {
            metrics::counter!("gateway_trip_cancellations_total", "outcome" => "absent")
                .increment(1);
            return Ok(cancel_failed(CANCEL_FAILED_MESSAGE.to_string()));
        };

        match self.users.cancel_trip(user.id, id).await {
            Ok(true) => {}
            Ok(false) => {
                metrics::counter!("gateway_trip_cancellations_total", "outcome" => "absent")
                    .increment(1);
                return Ok(cancel_failed(CANCEL_FAILED_MESSAGE.to_string()));
            }
            Err(err) => {
                metrics::counter!("gateway_trip_cancellations_total", "outcome" => "failed")
                    .increment(1);
                tracing::warn!(launch_id = %id, error = %err, "cancellation failed");
                return Ok(cancel_failed(format!("{CANCEL_FAILED_MESSAGE}: {err}")));
            }
        }

        metrics::counter!("gateway_trip_cancellations_total", "outcome" => "cancelled")
            .increment(1);
        let launches = match self.launches.get_launch_by_id(id).await {
            Ok(launch) => launch.into_iter().collect(),
            Err(err) => {
                tracing::warn!(launch_id = %id, error = %err, "could not load cancelled launch");
                Vec::new()
            }
        };

        Ok(TripUpdateResponse {
            success: true,
            message: Some(CANCELLED_MESSAGE.to_string()),
            launches,
        })
    }
}

fn cancel_failed(message: String) -> TripUpdateResponse {
    TripUpdateResponse {
        success: false,
        message: Some(message),
        launches: Vec::new(),
    }
}

/// Folds per-launch outcomes into one response.
pub fn summarize<'i>(
    outcomes: impl IntoIterator<Item = (&'i str, BookingOutcome)>,
) -> TripUpdateResponse {
    let mut launches = Vec::new();
    let mut failures = Vec::new();

    for (raw_id, outcome) in outcomes {
        match outcome {
            BookingOutcome::Booked(launch) => launches.push(launch),
            failed => failures.push(format!("{raw_id} ({})", failed.reason())),
        }
    }

    let success = failures.is_empty();
    let message = if success {
        BOOKED_MESSAGE.to_string()
    } else {
        format!(
            "the following launches couldn't be booked: {}",
            failures.join(", ")
        )
    };

    TripUpdateResponse {
        success,
        message: Some(message),
        launches,
    }
}
