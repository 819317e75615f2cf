//! Integration tests for the adventure booking process.

use broker::{
    ActivityError, AdventureCoordinator, AdventureError, AdventureId, AdventureRequest,
    AdventureState, BankError, Broker, BrokerError, CallLog, HotelError,
    InMemoryActivityService, InMemoryBankService, InMemoryHotelService, RoomType, ServiceCall,
    Step,
};
use chrono::NaiveDate;

const PAYMENT_CONFIRMATION: &str = "paymentConfirmation";
const HOTEL_REFERENCE: &str = "hotelReference";
const ACTIVITY_REFERENCE: &str = "activityReference";
const IBAN: &str = "BK01987654321";

type TestCoordinator =
    AdventureCoordinator<InMemoryBankService, InMemoryHotelService, InMemoryActivityService>;

struct TestHarness {
    coordinator: TestCoordinator,
    broker: Broker,
    bank: InMemoryBankService,
    hotel: InMemoryHotelService,
    activity: InMemoryActivityService,
    calls: CallLog,
}

impl TestHarness {
    fn new() -> Self {
        let calls = CallLog::new();
        let bank = InMemoryBankService::new().with_call_log(calls.clone());
        let hotel = InMemoryHotelService::new().with_call_log(calls.clone());
        let activity = InMemoryActivityService::new().with_call_log(calls.clone());

        bank.respond_with(PAYMENT_CONFIRMATION);
        hotel.respond_with(HOTEL_REFERENCE);
        activity.respond_with(ACTIVITY_REFERENCE);

        let coordinator = AdventureCoordinator::new(bank.clone(), hotel.clone(), activity.clone());
        let broker = Broker::new("BR98", "Travel Light").unwrap();

        Self {
            coordinator,
            broker,
            bank,
            hotel,
            activity,
            calls,
        }
    }

    async fn create_adventure(&self) -> AdventureId {
        self.broker
            .create_adventure(AdventureRequest::new(begin(), end(), 20, IBAN, 300))
            .await
            .unwrap()
    }
}

fn begin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 12, 19).unwrap()
}

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 12, 21).unwrap()
}

fn payment_call() -> ServiceCall {
    ServiceCall::ProcessPayment {
        iban: IBAN.to_string(),
        amount: 300,
    }
}

fn room_call() -> ServiceCall {
    ServiceCall::ReserveRoom {
        room_type: RoomType::Single,
        arrival: begin(),
        departure: end(),
    }
}

fn activity_call() -> ServiceCall {
    ServiceCall::ReserveActivity {
        begin: begin(),
        end: end(),
        participants: 20,
    }
}

#[tokio::test]
async fn test_process_with_no_failures() {
    let h = TestHarness::new();
    let id = h.create_adventure().await;

    h.coordinator.process(&h.broker, id).await.unwrap();

    let adventure = h.broker.adventure(id).await.unwrap();
    assert_eq!(adventure.bank_payment(), Some(PAYMENT_CONFIRMATION));
    assert_eq!(adventure.room_booking(), Some(HOTEL_REFERENCE));
    assert_eq!(adventure.activity_booking(), Some(ACTIVITY_REFERENCE));
    assert_eq!(adventure.state(), AdventureState::ActivityDone);

    // Called once each, in order, with the adventure's parameters
    assert_eq!(
        h.calls.calls(),
        vec![payment_call(), room_call(), activity_call()]
    );
}

#[tokio::test]
async fn test_process_with_bank_failure() {
    let h = TestHarness::new();
    h.bank.fail_with(BankError::InsufficientFunds);
    let id = h.create_adventure().await;

    let err = h.coordinator.process(&h.broker, id).await.unwrap_err();
    assert!(matches!(err, BrokerError::Bank(BankError::InsufficientFunds)));

    let adventure = h.broker.adventure(id).await.unwrap();
    assert!(adventure.bank_payment().is_none());
    assert!(adventure.room_booking().is_none());
    assert!(adventure.activity_booking().is_none());
    assert_eq!(adventure.state(), AdventureState::Failed(Step::Payment));

    // Neither the hotel nor the activity provider was contacted
    assert_eq!(h.calls.calls(), vec![payment_call()]);
}

#[tokio::test]
async fn test_process_with_hotel_failure() {
    let h = TestHarness::new();
    h.hotel.fail_with(HotelError::NoVacancy);
    let id = h.create_adventure().await;

    let err = h.coordinator.process(&h.broker, id).await.unwrap_err();
    assert!(matches!(err, BrokerError::Hotel(HotelError::NoVacancy)));

    let adventure = h.broker.adventure(id).await.unwrap();
    assert_eq!(adventure.bank_payment(), Some(PAYMENT_CONFIRMATION));
    assert!(adventure.room_booking().is_none());
    assert!(adventure.activity_booking().is_none());
    assert_eq!(adventure.state(), AdventureState::Failed(Step::Room));

    assert_eq!(h.calls.calls(), vec![payment_call(), room_call()]);
    assert_eq!(h.calls.count(Step::Activity), 0);
}

#[tokio::test]
async fn test_process_with_activity_failure() {
    let h = TestHarness::new();
    h.activity.fail_with(ActivityError::NoAvailability);
    let id = h.create_adventure().await;

    let err = h.coordinator.process(&h.broker, id).await.unwrap_err();
    assert!(matches!(
        err,
        BrokerError::Activity(ActivityError::NoAvailability)
    ));

    let adventure = h.broker.adventure(id).await.unwrap();
    assert_eq!(adventure.bank_payment(), Some(PAYMENT_CONFIRMATION));
    assert_eq!(adventure.room_booking(), Some(HOTEL_REFERENCE));
    assert!(adventure.activity_booking().is_none());
    assert_eq!(adventure.state(), AdventureState::Failed(Step::Activity));
    assert_eq!(adventure.completed_steps(), vec![Step::Payment, Step::Room]);

    assert_eq!(
        h.calls.steps(),
        vec![Step::Payment, Step::Room, Step::Activity]
    );
}

#[tokio::test]
async fn test_failure_does_not_undo_committed_steps() {
    let h = TestHarness::new();
    h.activity.fail_with(ActivityError::Unavailable("timeout".into()));
    let id = h.create_adventure().await;

    let err = h.coordinator.process(&h.broker, id).await.unwrap_err();
    assert_eq!(err.to_string(), "Activity provider unavailable: timeout");

    // The payment and the room stay committed on the remote systems
    assert_eq!(
        h.bank.payments(PAYMENT_CONFIRMATION),
        vec![(IBAN.to_string(), 300)]
    );
    assert_eq!(
        h.hotel.bookings(HOTEL_REFERENCE),
        vec![(RoomType::Single, begin(), end())]
    );
    assert_eq!(h.activity.booking_count(), 0);
}

#[tokio::test]
async fn test_inverted_dates_are_rejected_before_any_call() {
    let h = TestHarness::new();

    let result = h
        .broker
        .create_adventure(AdventureRequest::new(end(), begin(), 20, IBAN, 300))
        .await;

    assert!(matches!(result, Err(BrokerError::Adventure(_))));
    assert_eq!(h.broker.adventure_count().await, 0);
    assert!(h.calls.is_empty());
}

#[tokio::test]
async fn test_clearing_the_broker_isolates_runs() {
    let h = TestHarness::new();

    h.hotel.fail_with(HotelError::InvalidDates);
    let first = h.create_adventure().await;
    assert!(h.coordinator.process(&h.broker, first).await.is_err());

    h.broker.clear_adventures().await;
    h.hotel.clear_failure();
    h.calls.clear();
    assert!(h.broker.adventure(first).await.is_none());

    let second = h.create_adventure().await;
    h.coordinator.process(&h.broker, second).await.unwrap();

    let adventures = h.broker.adventures().await;
    assert_eq!(adventures.len(), 1);
    assert_eq!(adventures[0].id(), second);
    assert_eq!(adventures[0].room_booking(), Some(HOTEL_REFERENCE));
    assert_eq!(
        h.calls.calls(),
        vec![payment_call(), room_call(), activity_call()]
    );
}

#[tokio::test]
async fn test_runs_on_one_broker_are_independent() {
    let h = TestHarness::new();
    let first = h.create_adventure().await;
    let second = h.create_adventure().await;

    h.coordinator.process(&h.broker, first).await.unwrap();
    h.bank.fail_with(BankError::Unavailable("maintenance".into()));
    assert!(h.coordinator.process(&h.broker, second).await.is_err());

    let first = h.broker.adventure(first).await.unwrap();
    let second = h.broker.adventure(second).await.unwrap();
    assert_eq!(first.state(), AdventureState::ActivityDone);
    assert_eq!(second.state(), AdventureState::Failed(Step::Payment));
    assert!(second.bank_payment().is_none());
}

#[tokio::test]
async fn test_concurrent_process_of_one_adventure_runs_once() {
    let h = TestHarness::new();
    let id = h.create_adventure().await;

    let (first, second) = tokio::join!(
        h.coordinator.process(&h.broker, id),
        h.coordinator.process(&h.broker, id)
    );

    let rejected = match (first, second) {
        (Ok(()), Err(err)) | (Err(err), Ok(())) => err,
        other => panic!("expected exactly one successful run, got {other:?}"),
    };
    assert!(matches!(
        rejected,
        BrokerError::Adventure(AdventureError::AlreadyProcessed(_))
    ));

    assert_eq!(h.bank.calls().count(Step::Payment), 1);
    assert_eq!(
        h.calls.calls(),
        vec![payment_call(), room_call(), activity_call()]
    );
    assert_eq!(h.bank.payment_count(), 1);

    let adventure = h.broker.adventure(id).await.unwrap();
    assert_eq!(adventure.state(), AdventureState::ActivityDone);
    assert_eq!(adventure.history().len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_loses_nothing() {
    let broker = Broker::new("BR98", "Travel Light").unwrap();

    let mut handles = Vec::new();
    for _ in 0..32 {
        let broker = broker.clone();
        handles.push(tokio::spawn(async move {
            broker
                .create_adventure(AdventureRequest::new(begin(), end(), 2, IBAN, 100))
                .await
                .unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }

    assert_eq!(broker.adventure_count().await, 32);
    for id in ids {
        assert!(broker.adventure(id).await.is_some());
    }
}
