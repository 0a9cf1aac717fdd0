//! Static grounding knowledge supplied to the routing prompt

use serde::{Deserialize, Serialize};

const DEFAULT_SOP: &str = "\
Standard Operating Procedures for Malaysian Flood Mitigation (summary):
1) Monitor official weather and agency updates; follow evacuation orders immediately.
2) Prioritise evacuation of vulnerable persons: elderly, bedridden, infants, pregnant women, and persons with disabilities (OKU).
3) Pets: declare animals at registration; some PPS allow pets in designated areas. Bring carriers and food.
4) Bring essential documents (ICs), medications, minimal bedding, drinking water, and basic food; label items with the head of family name.
5) Hygiene: bring face masks, soap, hand sanitizer, and keep distance where possible.
6) Sanitation: use provided toilets; report sanitary issues to the PPS officer.
7) Electrical safety: avoid floodwaters; generators must run outdoors with ventilation.
8) Medical emergencies: inform PPS medical teams immediately; register special needs on arrival for priority assistance.
9) Registration: register at the PPS counter, obtain the family token/QR, follow volunteer instructions.
10) Communication: keep phones charged, use designated family contact points, and do not re-enter flooded areas until declared safe.";

const DEFAULT_SHELTERS: &str = "\
PPS_KNOWLEDGE (active relief centres):
- PPS North (Sekolah) | 1.0 km | features: 2nd floor classrooms only, no lift, limited parking | constraints: cannot accommodate bedridden patients (stairs)
- PPS Central (Dewan) | 2.0 km | features: ground floor access, ample parking | constraints: strict 'No Animals' policy
- PPS South (Kolej) | 4.0 km | features: OKU toilets, designated outdoor pet area, ground floor halls | constraints: none relevant to standard needs";

/// Knowledge text injected into the routing column's prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Value written to the row's `action` column
    pub action: String,
    /// Standard operating procedure summary
    pub sop: String,
    /// Relief centre listing the router chooses from
    pub shelters: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            action: "find_safe_shelter".to_string(),
            sop: DEFAULT_SOP.to_string(),
            shelters: DEFAULT_SHELTERS.to_string(),
        }
    }
}
