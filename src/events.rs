//! In-memory event abstraction consumed by the discretization pipeline
//!
//! An [`Event`] corresponds to a uniquely identified observation: an outcome
//! label plus an ordered list of (feature name, weight) pairs. Events marked
//! as test are rewritten by the discretizer but never contribute to split
//! searches. How events are loaded from disk is the caller's concern.

use std::collections::BTreeSet;

/// Reserved substring separating a feature's base name from its generated
/// categorical bucket suffix. Features whose name already contains this
/// marker are nominal and are never discretized.
pub const NOMINAL_MARKER: &str = ":::";

/// A single (outcome label, numeric value) observation for one feature.
///
/// A feature's training data is a sequence of these, sorted ascending by
/// value; ties in value may appear in any stable order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    /// Outcome label of the event this value was taken from
    pub outcome: String,
    /// The feature's numeric weight in that event
    pub value: f64,
}

impl LabeledValue {
    pub fn new(outcome: impl Into<String>, value: f64) -> Self {
        Self {
            outcome: outcome.into(),
            value,
        }
    }
}

/// Sort a sequence of labeled values ascending by value, breaking ties by
/// outcome label so the order is deterministic.
pub fn sort_labeled_values(values: &mut [LabeledValue]) {
    values.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.outcome.cmp(&b.outcome))
    });
}

/// A single labeled observation with an ordered feature/weight list.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    identifier: String,
    outcome: String,
    features: Vec<String>,
    weights: Vec<f64>,
    test: bool,
}

impl Event {
    /// Create an event with no features. `test` events are excluded from
    /// split searches but still rewritten during discretization.
    pub fn new(identifier: impl Into<String>, outcome: impl Into<String>, test: bool) -> Self {
        Self {
            identifier: identifier.into(),
            outcome: outcome.into(),
            features: Vec::new(),
            weights: Vec::new(),
            test,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    pub fn is_test(&self) -> bool {
        self.test
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Append a feature with weight 1 (the fixed weight of categorical
    /// bucket features).
    pub fn add_feature(&mut self, name: impl Into<String>) {
        self.add_weighted_feature(name, 1.0);
    }

    /// Append a feature with an explicit weight.
    pub fn add_weighted_feature(&mut self, name: impl Into<String>, weight: f64) {
        self.features.push(name.into());
        self.weights.push(weight);
    }

    /// Index of an exact feature-name match, if present.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f == name)
    }

    /// Like [`Event::feature_index`], but a base name also matches its
    /// nominal bucket form (looking up `"f1"` finds `"f1:::c2"`).
    pub fn lookup_feature(&self, name: &str) -> Option<usize> {
        self.feature_index(name).or_else(|| {
            self.features
                .iter()
                .position(|f| f.len() > name.len() && f.starts_with(name) && f[name.len()..].starts_with(NOMINAL_MARKER))
        })
    }

    /// Remove the feature/weight pair at `index`, shifting later entries.
    pub fn remove_feature(&mut self, index: usize) -> (String, f64) {
        let name = self.features.remove(index);
        let weight = self.weights.remove(index);
        (name, weight)
    }

    /// Replace all weights at once (the feature list is unchanged).
    /// The new list must have one weight per feature.
    pub fn set_weights(&mut self, weights: Vec<f64>) {
        debug_assert_eq!(weights.len(), self.features.len());
        self.weights = weights;
    }
}

/// An ordered collection of events.
///
/// Feature-name and outcome sets are derived on demand rather than cached,
/// since discretization rewrites feature lists in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Event> {
        self.events.iter_mut()
    }

    /// All distinct feature names across all events, sorted.
    pub fn feature_names(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .flat_map(|e| e.features.iter().cloned())
            .collect()
    }

    /// All distinct outcome labels across all events, sorted.
    pub fn outcomes(&self) -> BTreeSet<String> {
        self.events.iter().map(|e| e.outcome.clone()).collect()
    }

    /// Feature names eligible for discretization (no nominal marker).
    pub fn numeric_feature_names(&self) -> BTreeSet<String> {
        self.events
            .iter()
            .flat_map(|e| e.features.iter())
            .filter(|f| !f.contains(NOMINAL_MARKER))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_feature_defaults_weight_to_one() {
        let mut event = Event::new("e1", "A", false);
        event.add_feature("f1:::c0");
        assert_eq!(event.features(), ["f1:::c0"]);
        assert_eq!(event.weights(), [1.0]);
    }

    #[test]
    fn test_feature_index_is_exact() {
        let mut event = Event::new("e1", "A", false);
        event.add_weighted_feature("f1:::c2", 1.0);
        event.add_weighted_feature("f2", 3.5);

        assert_eq!(event.feature_index("f2"), Some(1));
        assert_eq!(event.feature_index("f1"), None);
    }

    #[test]
    fn test_lookup_feature_matches_nominal_base_name() {
        let mut event = Event::new("e1", "A", false);
        event.add_weighted_feature("f10", 2.0);
        event.add_weighted_feature("f1:::c2", 1.0);

        // "f10" must not shadow the base-name lookup for "f1"
        assert_eq!(event.lookup_feature("f1"), Some(1));
        assert_eq!(event.lookup_feature("f10"), Some(0));
        assert_eq!(event.lookup_feature("f3"), None);
    }

    #[test]
    fn test_remove_feature_shifts_entries() {
        let mut event = Event::new("e1", "A", false);
        event.add_weighted_feature("f1", 1.0);
        event.add_weighted_feature("f2", 2.0);
        event.add_weighted_feature("f3", 3.0);

        let (name, weight) = event.remove_feature(1);
        assert_eq!(name, "f2");
        assert_eq!(weight, 2.0);
        assert_eq!(event.features(), ["f1", "f3"]);
        assert_eq!(event.weights(), [1.0, 3.0]);
    }

    #[test]
    fn test_store_derives_feature_and_outcome_sets() {
        let mut store = EventStore::new();
        let mut e1 = Event::new("e1", "A", false);
        e1.add_weighted_feature("f1", 1.0);
        e1.add_weighted_feature("color:::red", 1.0);
        let mut e2 = Event::new("e2", "B", true);
        e2.add_weighted_feature("f2", 2.0);
        store.push(e1);
        store.push(e2);

        let features: Vec<String> = store.feature_names().into_iter().collect();
        assert_eq!(features, ["color:::red", "f1", "f2"]);
        let numeric: Vec<String> = store.numeric_feature_names().into_iter().collect();
        assert_eq!(numeric, ["f1", "f2"]);
        let outcomes: Vec<String> = store.outcomes().into_iter().collect();
        assert_eq!(outcomes, ["A", "B"]);
    }

    #[test]
    fn test_sort_labeled_values_is_deterministic() {
        let mut values = vec![
            LabeledValue::new("B", 2.0),
            LabeledValue::new("A", 2.0),
            LabeledValue::new("A", 1.0),
        ];
        sort_labeled_values(&mut values);
        assert_eq!(values[0], LabeledValue::new("A", 1.0));
        assert_eq!(values[1], LabeledValue::new("A", 2.0));
        assert_eq!(values[2], LabeledValue::new("B", 2.0));
    }
}
