//! Hotel capability and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HotelError;
use crate::services::{CallLog, ServiceCall};

/// Kind of room requested from the hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
}

/// Trait for hotel room reservations.
#[async_trait]
pub trait HotelService: Send + Sync {
    /// Reserves a room of `room_type` from `arrival` to `departure` and
    /// returns the hotel's booking reference.
    async fn reserve_room(
        &self,
        room_type: RoomType,
        arrival: NaiveDate,
        departure: NaiveDate,
    ) -> Result<String, HotelError>;
}

#[derive(Debug, Default)]
struct InMemoryHotelState {
    /// Every room held, as (reference, room type, arrival, departure).
    bookings: Vec<(String, RoomType, NaiveDate, NaiveDate)>,
    next_id: u32,
    reference: Option<String>,
    failure: Option<HotelError>,
}

/// In-memory hotel for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHotelService {
    state: Arc<RwLock<InMemoryHotelState>>,
    calls: CallLog,
}

impl InMemoryHotelService {
    /// Creates a new in-memory hotel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls into the given log instead of a private one.
    pub fn with_call_log(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }

    /// Answers every reservation with this reference.
    pub fn respond_with(&self, reference: impl Into<String>) {
        self.write().reference = Some(reference.into());
    }

    /// Fails every reservation with this error until cleared.
    pub fn fail_with(&self, error: HotelError) {
        self.write().failure = Some(error);
    }

    /// Stops injecting failures.
    pub fn clear_failure(&self) {
        self.write().failure = None;
    }

    /// Returns the number of rooms held.
    pub fn booking_count(&self) -> usize {
        self.read().bookings.len()
    }

    /// Returns the room type and dates of every booking answered with
    /// `reference`, oldest first.
    pub fn bookings(&self, reference: &str) -> Vec<(RoomType, NaiveDate, NaiveDate)> {
        self.read()
            .bookings
            .iter()
            .filter(|(r, _, _, _)| r == reference)
            .map(|(_, room_type, arrival, departure)| (*room_type, *arrival, *departure))
            .collect()
    }

    /// Returns the call log this hotel writes to.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryHotelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryHotelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HotelService for InMemoryHotelService {
    async fn reserve_room(
        &self,
        room_type: RoomType,
        arrival: NaiveDate,
        departure: NaiveDate,
    ) -> Result<String, HotelError> {
        self.calls.record(ServiceCall::ReserveRoom {
            room_type,
            arrival,
            departure,
        });

        let mut state = self.write();

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        if arrival >= departure {
            return Err(HotelError::InvalidDates);
        }

        state.next_id += 1;
        let reference = state
            .reference
            .clone()
            .unwrap_or_else(|| format!("ROOM-{:04}", state.next_id));
        state
            .bookings
            .push((reference.clone(), room_type, arrival, departure));

        Ok(reference)
    }
}
