//! Interactive session state
//!
//! Holds everything that lives only as long as one interactive session:
//! per-month budgets, the detected city, the cached quote, and the month
//! currently being viewed. Nothing here is persisted.

use std::collections::HashMap;

use log::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::feeds::{city_or_fallback, quote_or_fallback, CityLocator, QuoteSource};
use crate::models::{Budget, Money, MonthKey};

/// Session-scoped context passed to the interaction loop
#[derive(Debug, Clone, Default)]
pub struct Session {
    default_budget: Budget,
    budgets: HashMap<MonthKey, Budget>,
    selected_month: Option<MonthKey>,
    detected_city: Option<String>,
    quote: Option<String>,
}

impl Session {
    /// Start a session whose months default to `default_budget`
    pub fn new(default_budget: Budget) -> Self {
        Self {
            default_budget,
            ..Self::default()
        }
    }

    /// Budget for a month, creating it with the default on first access
    pub fn budget_for(&mut self, month: MonthKey) -> Budget {
        let default = self.default_budget;
        *self.budgets.entry(month).or_insert_with(|| {
            debug!("Initialized budget for {} at {}", month, default);
            default
        })
    }

    /// Set a month's budget; amounts below the minimum are rejected
    pub fn set_budget(&mut self, month: MonthKey, amount: Money) -> LedgerResult<Budget> {
        let budget = Budget::new(amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.budgets.insert(month, budget);
        Ok(budget)
    }

    /// The month currently selected for viewing
    pub fn selected_month(&self) -> Option<MonthKey> {
        self.selected_month
    }

    pub fn select_month(&mut self, month: MonthKey) {
        self.selected_month = Some(month);
    }

    /// Keep the selection if it is still available, else pick the most recent month
    ///
    /// Returns the resulting selection, or `None` if there are no months.
    pub fn reconcile_selection(&mut self, available: &[MonthKey]) -> Option<MonthKey> {
        let keep = self
            .selected_month
            .filter(|selected| available.contains(selected));
        self.selected_month = keep.or_else(|| available.iter().max().copied());
        self.selected_month
    }

    /// City detected once per session
    pub fn detected_city(&mut self, locator: &dyn CityLocator) -> &str {
        self.detected_city
            .get_or_insert_with(|| city_or_fallback(locator))
            .as_str()
    }

    /// Quote fetched once per session
    pub fn quote(&mut self, source: &dyn QuoteSource) -> &str {
        self.quote
            .get_or_insert_with(|| quote_or_fallback(source))
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{ConfiguredCity, FeedError, Offline, Quote, FALLBACK_QUOTE};
    use std::cell::Cell;

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    struct CountingLocator {
        calls: Cell<u32>,
    }

    impl CityLocator for CountingLocator {
        fn locate(&self) -> Result<String, FeedError> {
            self.calls.set(self.calls.get() + 1);
            Ok("Nairobi".into())
        }
    }

    #[test]
    fn test_budget_defaults_lazily() {
        let mut session = Session::default();
        let march = month(2024, 3);

        assert_eq!(session.budget_for(march), Budget::DEFAULT);
        session.set_budget(month(2024, 4), Money::from_cents(500)).unwrap();
        assert_eq!(session.budget_for(march), Budget::DEFAULT);
    }

    #[test]
    fn test_custom_default_budget() {
        let default = Budget::new(Money::from_dollars_cents(300, 0)).unwrap();
        let mut session = Session::new(default);
        assert_eq!(session.budget_for(month(2024, 1)), default);
    }

    #[test]
    fn test_set_budget_persists_for_session() {
        let mut session = Session::default();
        let march = month(2024, 3);

        session.set_budget(march, Money::from_cents(2000)).unwrap();

        assert_eq!(session.budget_for(march).amount(), Money::from_cents(2000));
        assert_eq!(session.budget_for(month(2024, 4)), Budget::DEFAULT);
    }

    #[test]
    fn test_set_budget_rejects_below_minimum() {
        let mut session = Session::default();
        let march = month(2024, 3);
        session.set_budget(march, Money::from_cents(5000)).unwrap();

        let err = session.set_budget(march, Money::from_cents(50)).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(session.budget_for(march).amount(), Money::from_cents(5000));
    }

    #[test]
    fn test_reconcile_selection() {
        let mut session = Session::default();
        let jan = month(2024, 1);
        let feb = month(2024, 2);

        assert_eq!(session.reconcile_selection(&[]), None);
        assert_eq!(session.reconcile_selection(&[jan, feb]), Some(feb));

        session.select_month(jan);
        assert_eq!(session.reconcile_selection(&[feb, jan]), Some(jan));

        // Selected month vanished after an edit
        assert_eq!(session.reconcile_selection(&[feb]), Some(feb));
    }

    #[test]
    fn test_city_detected_once() {
        let locator = CountingLocator { calls: Cell::new(0) };
        let mut session = Session::default();

        assert_eq!(session.detected_city(&locator), "Nairobi");
        assert_eq!(session.detected_city(&locator), "Nairobi");
        assert_eq!(locator.calls.get(), 1);
    }

    #[test]
    fn test_city_and_quote_fall_back() {
        let mut session = Session::default();
        assert_eq!(session.detected_city(&ConfiguredCity::default()), "New York");
        assert_eq!(session.quote(&Offline), FALLBACK_QUOTE);
    }

    #[test]
    fn test_quote_cached() {
        struct Once(Cell<bool>);
        impl QuoteSource for Once {
            fn random(&self) -> Result<Quote, FeedError> {
                if self.0.replace(true) {
                    return Err(FeedError::Network("second call".into()));
                }
                Ok(Quote {
                    text: "Start where you are.".into(),
                    author: "Arthur Ashe".into(),
                })
            }
        }

        let source = Once(Cell::new(false));
        let mut session = Session::default();
        let first = session.quote(&source).to_string();
        assert_eq!(session.quote(&source), first);
        assert_eq!(first, "\"Start where you are.\" - Arthur Ashe");
    }
}
