use serde::{Deserialize, Serialize};

use crate::core::hit::{HitCollection, HitRecord};

/// Default maximum e-value for a hit to be kept
pub const DEFAULT_MAX_EVALUE: f64 = 1e-5;

/// Default minimum number of identical positions for a hit to be kept
pub const DEFAULT_MIN_IDENTITY: u32 = 30;

/// Quality thresholds applied to raw hits before ortholog matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitFilter {
    /// Hits with a larger e-value are dropped
    pub max_evalue: f64,

    /// Hits with fewer identical positions are dropped
    pub min_identity: u32,
}

impl Default for HitFilter {
    fn default() -> Self {
        Self {
            max_evalue: DEFAULT_MAX_EVALUE,
            min_identity: DEFAULT_MIN_IDENTITY,
        }
    }
}

impl HitFilter {
    /// Both thresholds are inclusive
    #[must_use]
    pub fn accepts(&self, hit: &HitRecord) -> bool {
        hit.e_value <= self.max_evalue && hit.identity >= self.min_identity
    }

    /// Keep the accepted hits, preserving order and source
    #[must_use]
    pub fn apply(&self, collection: &HitCollection) -> HitCollection {
        HitCollection {
            source: collection.source.clone(),
            hits: collection
                .iter()
                .filter(|h| self.accepts(h))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, e_value: f64, identity: u32) -> HitRecord {
        HitRecord::new(id, "Homo sapiens", "MKV")
            .with_e_value(e_value)
            .with_identity(identity)
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let filter = HitFilter {
            max_evalue: 1e-5,
            min_identity: 30,
        };

        assert!(filter.accepts(&hit("a", 1e-5, 30)));
        assert!(!filter.accepts(&hit("b", 2e-5, 30)));
        assert!(!filter.accepts(&hit("c", 1e-5, 29)));
    }

    #[test]
    fn test_apply_preserves_order() {
        let collection = HitCollection::new(vec![
            hit("a", 1e-50, 90),
            hit("b", 1.0, 90),
            hit("c", 1e-20, 10),
            hit("d", 1e-10, 45),
        ])
        .with_source("blast1.out.blast");

        let kept = HitFilter::default().apply(&collection);
        let ids: Vec<&str> = kept.iter().map(|h| h.identifier.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(kept.source.as_deref(), Some("blast1.out.blast"));
    }
}
