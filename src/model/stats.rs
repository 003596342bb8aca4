use serde::{Deserialize, Serialize};

/// Site-wide figures shown on the landing page.
///
/// `turnout2020`, `youthInvolvement` and `totalBallots` are static: they come
/// from the data file or the defaults below and are never recomputed. The two
/// voter counters are refreshed by the registry as voters register and are
/// approved. Fields missing from a persisted document keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateStats {
    #[serde(rename = "turnout2020")]
    pub turnout_2020: f64,
    pub youth_involvement: f64,
    pub total_ballots: u64,
    pub registered_voters: usize,
    pub active_voters: usize,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            turnout_2020: 66.8,
            youth_involvement: 50.0,
            total_ballots: 159,
            registered_voters: 0,
            active_voters: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let stats: AggregateStats =
            serde_json::from_str(r#"{"totalBallots": 200, "registeredVoters": 4}"#).unwrap();
        assert_eq!(stats.total_ballots, 200);
        assert_eq!(stats.registered_voters, 4);
        assert_eq!(stats.turnout_2020, 66.8);
        assert_eq!(stats.youth_involvement, 50.0);
        assert_eq!(stats.active_voters, 0);
    }
}
