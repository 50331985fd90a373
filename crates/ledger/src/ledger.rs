use std::collections::HashSet;

use larder_core::{DomainError, DomainResult, RecordId};

use crate::record::ConsumptionRecord;

/// Append-only, insertion-ordered collection of consumption records.
///
/// Records are ordered by insertion, not by `consumed_date`: two records may
/// share a timestamp. There is no delete and no in-place edit; callers only
/// ever get shared references back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<ConsumptionRecord>,
    ids: HashSet<RecordId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a ledger from a persisted history, in the given order.
    pub fn from_records(
        records: impl IntoIterator<Item = ConsumptionRecord>,
    ) -> DomainResult<Self> {
        let mut ledger = Self::new();
        for record in records {
            ledger.append(record)?;
        }
        Ok(ledger)
    }

    /// Append a record after checking its invariants.
    ///
    /// Returns a reference to the stored record.
    pub fn append(&mut self, record: ConsumptionRecord) -> DomainResult<&ConsumptionRecord> {
        record.validate()?;
        if self.ids.contains(&record.id) {
            return Err(DomainError::invalid_record(format!(
                "record {} already appended",
                record.id
            )));
        }

        tracing::debug!(
            record_id = %record.id,
            name = %record.name,
            consumed = %record.consumed_amount,
            wasted = %record.wasted_amount,
            "ledger append"
        );

        self.ids.insert(record.id);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Every record, in insertion order.
    pub fn read_all(&self) -> &[ConsumptionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsumptionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&ConsumptionRecord> {
        self.records.iter().find(|r| &r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use larder_core::Money;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn record(name: &str, consumed: i64, wasted: i64) -> ConsumptionRecord {
        ConsumptionRecord::new(
            None,
            name,
            "🥕",
            Money::from_cents(consumed),
            Money::from_cents(wasted),
            test_time(),
            1.0,
            if consumed + wasted == 0 {
                100.0
            } else {
                consumed as f64 * 100.0 / (consumed + wasted) as f64
            },
        )
    }

    #[test]
    fn append_preserves_insertion_order_for_equal_timestamps() {
        let mut ledger = Ledger::new();
        ledger.append(record("first", 100, 0)).unwrap();
        ledger.append(record("second", 0, 100)).unwrap();
        ledger.append(record("third", 50, 50)).unwrap();

        let names: Vec<_> = ledger.read_all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn duplicate_record_id_is_rejected() {
        let mut ledger = Ledger::new();
        let r = record("Bread", 100, 0);
        ledger.append(r.clone()).unwrap();

        let err = ledger.append(r).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn invalid_record_is_not_appended() {
        let mut ledger = Ledger::new();
        let mut r = record("Eggs", 100, 100);
        r.total_cost = Money::from_cents(1);

        assert!(ledger.append(r).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn from_records_rehydrates_in_order() {
        let a = record("a", 1, 0);
        let b = record("b", 0, 1);
        let ledger = Ledger::from_records(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(ledger.read_all(), &[a.clone(), b]);
        assert_eq!(ledger.get(&a.id), Some(&a));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: across any sequence of appended records, the summed shares
        /// equal the summed totals and earlier records never change.
        #[test]
        fn shares_sum_to_totals_and_history_is_stable(
            amounts in prop::collection::vec((0i64..100_000i64, 0i64..100_000i64), 1..20)
        ) {
            let mut ledger = Ledger::new();
            let mut snapshots: Vec<ConsumptionRecord> = Vec::new();

            for (i, (consumed, wasted)) in amounts.into_iter().enumerate() {
                let stored = ledger.append(record(&format!("item-{i}"), consumed, wasted)).unwrap().clone();
                snapshots.push(stored);
                prop_assert_eq!(ledger.read_all(), snapshots.as_slice());
            }

            let shares: Money = ledger.iter().map(|r| r.consumed_amount + r.wasted_amount).sum();
            let totals: Money = ledger.iter().map(|r| r.total_cost).sum();
            prop_assert_eq!(shares, totals);
        }
    }
}
