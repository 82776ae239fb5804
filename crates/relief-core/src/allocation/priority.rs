//! Incident priority scoring.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Incident, IncidentKind};

/// Ordered weight table; inference walks it front to back
pub const PRIORITY_WEIGHTS: [(IncidentKind, f64); 5] = [
    (IncidentKind::Earthquake, 1.5),
    (IncidentKind::Fire, 1.3),
    (IncidentKind::Flood, 1.2),
    (IncidentKind::Landslide, 1.1),
    (IncidentKind::Storm, 1.0),
];

/// Weight used when no table entry matches.
///
/// Unrecognised incidents are labelled [`FALLBACK_KIND`] but keep this
/// weight; they do not take Flood's 1.2.
pub const FALLBACK_WEIGHT: f64 = 1.0;

/// Label reported when no table entry matches
pub const FALLBACK_KIND: IncidentKind = IncidentKind::Flood;

/// How an incident's disaster type was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSource {
    /// Supplied by the caller
    Explicit,
    /// Matched against the label or name
    Inferred,
    /// Nothing matched
    Fallback,
}

/// Priority of one incident
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncidentPriority {
    /// `floor(affected × weight)`
    pub score: u64,
    /// Disaster type used for the weight
    pub kind: IncidentKind,
    /// Weight applied
    pub weight: f64,
    /// Where `kind` came from
    pub source: KindSource,
}

/// Computes incident priority scores
pub struct PriorityCalculator;

impl PriorityCalculator {
    /// Weight for a known kind
    pub fn weight(kind: IncidentKind) -> f64 {
        PRIORITY_WEIGHTS
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(FALLBACK_WEIGHT, |(_, w)| *w)
    }

    /// First table entry whose label occurs in `text`, case-insensitively
    pub fn infer(text: &str) -> Option<IncidentKind> {
        let text = text.to_lowercase();
        PRIORITY_WEIGHTS
            .iter()
            .map(|(kind, _)| *kind)
            .find(|kind| text.contains(&kind.label().to_lowercase()))
    }

    /// Score an incident
    pub fn assess(incident: &Incident) -> IncidentPriority {
        let (kind, weight, source) = match incident.kind {
            Some(kind) => (kind, Self::weight(kind), KindSource::Explicit),
            None => match Self::infer(incident.inference_text()) {
                Some(kind) => (kind, Self::weight(kind), KindSource::Inferred),
                None => {
                    warn!(
                        incident = %incident.name,
                        "No disaster type recognised, falling back to {FALLBACK_KIND} with weight {FALLBACK_WEIGHT}"
                    );
                    (FALLBACK_KIND, FALLBACK_WEIGHT, KindSource::Fallback)
                }
            },
        };
        let score = (incident.affected_population.get() as f64 * weight).floor() as u64;
        IncidentPriority {
            score,
            kind,
            weight,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceNeeds;

    fn incident(name: &str, people: u64) -> Incident {
        Incident::new(name, "Somewhere", people, ResourceNeeds::default())
    }

    #[test]
    fn test_inference_first_match_wins() {
        assert_eq!(PriorityCalculator::infer("Chamoli EARTHQUAKE"), Some(IncidentKind::Earthquake));
        assert_eq!(PriorityCalculator::infer("Flash Flood"), Some(IncidentKind::Flood));
        // earthquake precedes flood in the table
        assert_eq!(
            PriorityCalculator::infer("Flood after earthquake"),
            Some(IncidentKind::Earthquake)
        );
        assert_eq!(PriorityCalculator::infer("Avalanche"), None);
    }

    #[test]
    fn test_scores() {
        let p = PriorityCalculator::assess(&incident("Dehradun Flood", 10_000));
        assert_eq!((p.score, p.kind, p.source), (12_000, IncidentKind::Flood, KindSource::Inferred));

        let p = PriorityCalculator::assess(&incident("Quake", 1000).with_kind(IncidentKind::Earthquake));
        assert_eq!((p.score, p.source), (1500, KindSource::Explicit));

        let p = PriorityCalculator::assess(&incident("Uttarkashi Avalanche", 1001));
        assert_eq!((p.score, p.kind, p.source), (1001, IncidentKind::Flood, KindSource::Fallback));
    }

    #[test]
    fn test_fallback_weight_is_neutral() {
        let p = PriorityCalculator::assess(&incident("Kedarnath Cloudburst", 5_000));
        assert_eq!(p.source, KindSource::Fallback);
        assert_eq!(p.kind, FALLBACK_KIND);
        assert_eq!(p.weight, 1.0);
        assert_eq!(p.score, 5_000);
        assert!(p.weight < PriorityCalculator::weight(IncidentKind::Flood));
    }

    #[test]
    fn test_label_used_before_name() {
        let p = PriorityCalculator::assess(&incident("Site 7", 100).with_label("forest fire"));
        assert_eq!(p.kind, IncidentKind::Fire);
        assert_eq!(p.score, 130);
    }
}
