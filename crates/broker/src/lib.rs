//! Adventure booking for a travel broker.
//!
//! An adventure is booked by three remote calls made in order:
//! 1. Charge the client's account through the bank
//! 2. Reserve a single room at the hotel
//! 3. Reserve the activity for all participants
//!
//! The first failure stops the process and is returned to the caller. Steps
//! that already committed are kept as they are; their confirmations stay on
//! the adventure so the caller can see how much of the booking went through.

pub mod adventure;
pub mod broker;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod services;
pub mod state;

pub use adventure::{Adventure, AdventureId, AdventureRequest};
pub use broker::Broker;
pub use coordinator::AdventureCoordinator;
pub use error::{ActivityError, AdventureError, BankError, BrokerError, HotelError, Result};
pub use events::AdventureEvent;
pub use services::{
    ActivityService, BankService, CallLog, HotelService, InMemoryActivityService,
    InMemoryBankService, InMemoryHotelService, RoomType, ServiceCall,
};
pub use state::{AdventureState, Step};
