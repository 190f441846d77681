//! Integration tests for the Store runtime: effect execution, action
//! feedback, subscription cancellation, and graceful shutdown.

use std::time::Duration;

use vowsuite_core::effect::{Effect, SubscriptionId};
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::{Store, StoreError};

#[derive(Clone, Debug, Default)]
struct TickerState {
    ticks: u32,
    echoes: Vec<String>,
    watching: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum TickerAction {
    Tick,
    Echo(String),
    EchoArrived(String),
    StartTicking,
    StopTicking,
    TickDelivered,
}

#[derive(Clone)]
struct TickerEnvironment;

#[derive(Clone)]
struct TickerReducer;

const TICK_STREAM: &str = "ticker";

impl Reducer for TickerReducer {
    type State = TickerState;
    type Action = TickerAction;
    type Environment = TickerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TickerAction::Tick => {
                state.ticks += 1;
                smallvec![Effect::None]
            },
            TickerAction::Echo(text) => {
                // Round-trip through an async effect.
                smallvec![Effect::Future(Box::pin(async move {
                    Some(TickerAction::EchoArrived(text))
                }))]
            },
            TickerAction::EchoArrived(text) => {
                state.echoes.push(text);
                smallvec![Effect::None]
            },
            TickerAction::StartTicking => {
                state.watching = true;
                let stream = Box::pin(async_stream::stream! {
                    loop {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        yield TickerAction::TickDelivered;
                    }
                });
                smallvec![Effect::Stream {
                    id: SubscriptionId::new(TICK_STREAM),
                    stream,
                }]
            },
            TickerAction::StopTicking => {
                state.watching = false;
                smallvec![Effect::Cancel(SubscriptionId::new(TICK_STREAM))]
            },
            TickerAction::TickDelivered => {
                state.ticks += 1;
                smallvec![Effect::None]
            },
        }
    }
}

fn make_store() -> Store<TickerState, TickerAction, TickerEnvironment, TickerReducer> {
    Store::new(TickerState::default(), TickerReducer, TickerEnvironment)
}

#[tokio::test]
async fn send_mutates_state_synchronously() {
    let store = make_store();

    store.send(TickerAction::Tick).await.unwrap();
    store.send(TickerAction::Tick).await.unwrap();

    assert_eq!(store.state(|s| s.ticks).await, 2);
}

#[tokio::test]
async fn future_effect_feeds_action_back() {
    let store = make_store();

    let handle = store
        .send(TickerAction::Echo("hello".to_string()))
        .await
        .unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();

    // The feedback action ran through the reducer again.
    let echoes = store.state(|s| s.echoes.clone()).await;
    assert_eq!(echoes, vec!["hello".to_string()]);
}

#[tokio::test]
async fn send_and_wait_for_returns_matching_action() {
    let store = make_store();

    let result = store
        .send_and_wait_for(
            TickerAction::Echo("ping".to_string()),
            |a| matches!(a, TickerAction::EchoArrived(_)),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TickerAction::EchoArrived("ping".to_string()));
}

#[tokio::test]
async fn send_and_wait_for_times_out_without_match() {
    let store = make_store();

    let result = store
        .send_and_wait_for(
            TickerAction::Tick,
            |a| matches!(a, TickerAction::EchoArrived(_)),
            Duration::from_millis(50),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn stream_effect_delivers_until_cancelled() {
    let store = make_store();

    store.send(TickerAction::StartTicking).await.unwrap();

    // Let a few ticks arrive.
    tokio::time::sleep(Duration::from_millis(60)).await;
    let ticks_while_watching = store.state(|s| s.ticks).await;
    assert!(ticks_while_watching >= 2, "expected ticks, got {ticks_while_watching}");

    store.send(TickerAction::StopTicking).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let ticks_at_cancel = store.state(|s| s.ticks).await;

    // No further deliveries after cancellation.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(store.state(|s| s.ticks).await, ticks_at_cancel);
}

#[tokio::test]
async fn restarting_a_stream_replaces_the_previous_one() {
    let store = make_store();

    store.send(TickerAction::StartTicking).await.unwrap();
    store.send(TickerAction::StartTicking).await.unwrap();

    tokio::time::sleep(Duration::from_millis(55)).await;

    // A replaced subscription must not double-deliver: roughly one tick
    // per 10ms, far fewer than two concurrent streams would produce.
    let ticks = store.state(|s| s.ticks).await;
    assert!(ticks <= 8, "replaced stream still delivering: {ticks} ticks");
}

#[tokio::test]
async fn cancel_for_unknown_subscription_is_a_no_op() {
    let store = make_store();

    // Never started ticking; cancel must not fail.
    store.send(TickerAction::StopTicking).await.unwrap();
    assert!(!store.state(|s| s.watching).await);
}

#[tokio::test]
async fn shutdown_rejects_new_actions() {
    let store = make_store();

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(TickerAction::Tick).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}

#[tokio::test]
async fn shutdown_aborts_live_subscriptions() {
    let store = make_store();

    store.send(TickerAction::StartTicking).await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;

    // A live infinite stream must not block shutdown.
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let ticks_at_shutdown = store.state(|s| s.ticks).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.state(|s| s.ticks).await, ticks_at_shutdown);
}

#[tokio::test]
async fn delay_effect_dispatches_after_the_duration() {
    #[derive(Clone)]
    struct DelayReducer;

    #[derive(Clone, Debug)]
    enum DelayAction {
        Schedule,
        Fire,
    }

    impl Reducer for DelayReducer {
        type State = bool;
        type Action = DelayAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                DelayAction::Schedule => smallvec![Effect::Delay {
                    duration: Duration::from_millis(30),
                    action: Box::new(DelayAction::Fire),
                }],
                DelayAction::Fire => {
                    *state = true;
                    smallvec![Effect::None]
                },
            }
        }
    }

    let store = Store::new(false, DelayReducer, ());
    store.send(DelayAction::Schedule).await.unwrap();

    assert!(!store.state(|fired| *fired).await);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(store.state(|fired| *fired).await);
}

#[tokio::test]
async fn action_observers_see_effect_produced_actions() {
    let store = make_store();
    let mut observer = store.subscribe_actions();

    store
        .send(TickerAction::Echo("observed".to_string()))
        .await
        .unwrap();

    let seen = tokio::time::timeout(Duration::from_secs(1), observer.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, TickerAction::EchoArrived("observed".to_string()));
}

#[tokio::test]
async fn sequential_effects_run_in_order() {
    #[derive(Clone)]
    struct SeqReducer;

    impl Reducer for SeqReducer {
        type State = Vec<&'static str>;
        type Action = SeqAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SeqAction::Go => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async {
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Some(SeqAction::Mark("slow"))
                    })),
                    Effect::Future(Box::pin(async { Some(SeqAction::Mark("fast")) })),
                ])],
                SeqAction::Mark(label) => {
                    state.push(label);
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[derive(Clone, Debug)]
    enum SeqAction {
        Go,
        Mark(&'static str),
    }

    let store = Store::new(Vec::new(), SeqReducer, ());
    store.send(SeqAction::Go).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let order = store.state(Clone::clone).await;
    assert_eq!(order, vec!["slow", "fast"]);
}
