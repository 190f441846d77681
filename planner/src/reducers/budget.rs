//! Budget reducer.
//!
//! Budgets are a one-shot read: fetch every document in the `budget`
//! collection, parse, and keep. There is no live watch; the list is
//! refreshed by fetching again.

use vowsuite_core::effect::Effect;
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::retry::retry_with_policy;

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{BudgetRecord, PlannerState};

/// Budget reducer.
#[derive(Clone, Debug, Default)]
pub struct BudgetReducer;

impl BudgetReducer {
    /// Create a new budget reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for BudgetReducer {
    type State = PlannerState;
    type Action = PlannerAction;
    type Environment = PlannerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PlannerAction::FetchBudgets => {
                let store = env.store.clone();
                let collection = env.collections.budgets.clone();
                let retry = env.retry.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match retry_with_policy(&retry, "fetch_budgets", || {
                        let store = store.clone();
                        let collection = collection.clone();
                        async move { store.find(collection, vec![]).await }
                    })
                    .await
                    {
                        Ok(documents) => {
                            let budgets = documents
                                .into_iter()
                                .filter_map(|document| {
                                    match serde_json::from_value::<BudgetRecord>(document.data) {
                                        Ok(budget) => Some(budget),
                                        Err(error) => {
                                            tracing::warn!(
                                                document = %document.id,
                                                %error,
                                                "Skipping malformed budget document"
                                            );
                                            None
                                        },
                                    }
                                })
                                .collect();
                            Some(PlannerAction::BudgetsLoaded { budgets })
                        },
                        Err(error) => Some(PlannerAction::BudgetsLoadFailed {
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            PlannerAction::BudgetsLoaded { budgets } => {
                state.budgets.entries = budgets;
                state.budgets.loaded = true;
                state.budgets.last_error = None;
                smallvec![Effect::None]
            },

            PlannerAction::BudgetsLoadFailed { reason } => {
                tracing::error!(%reason, "Budget fetch failed");
                state.budgets.last_error = Some(reason);
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::test_environment;
    use vowsuite_testing::{ReducerTest, assertions};

    #[test]
    fn fetch_starts_the_query() {
        ReducerTest::new(BudgetReducer::new())
            .with_env(test_environment())
            .given_state(PlannerState::default())
            .when_action(PlannerAction::FetchBudgets)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn loaded_budgets_replace_entries_and_clear_errors() {
        let mut state = PlannerState::default();
        state.budgets.last_error = Some("old failure".to_string());

        ReducerTest::new(BudgetReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PlannerAction::BudgetsLoaded {
                budgets: vec![BudgetRecord {
                    description: "Flowers".to_string(),
                    amount: 450.0,
                }],
            })
            .then_state(|state| {
                assert!(state.budgets.loaded);
                assert_eq!(state.budgets.entries.len(), 1);
                assert!(state.budgets.last_error.is_none());
            })
            .run();
    }

    #[test]
    fn failed_fetch_surfaces_the_reason() {
        ReducerTest::new(BudgetReducer::new())
            .with_env(test_environment())
            .given_state(PlannerState::default())
            .when_action(PlannerAction::BudgetsLoadFailed {
                reason: "store offline".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.budgets.last_error.as_deref(), Some("store offline"));
                assert!(!state.budgets.loaded);
            })
            .run();
    }
}
