use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Map;

use super::{
    check::{Breakdown, Recommendation},
    MediaResponse,
};
use crate::core::object::{serialize_tagged, DispatchTable, UnknownObject};

pub const WITH_YOTI_ACCOUNT: &str = "WITH_YOTI_ACCOUNT";
pub const WITH_CUSTOM_ACCOUNT: &str = "WITH_CUSTOM_ACCOUNT";

pub const PROFILE_SOURCES: &str = "PROFILE";
pub const TYPE_LIST_SOURCES: &str = "TYPE_LIST";

pub const EXACT_MATCHING: &str = "EXACT";
pub const FUZZY_MATCHING: &str = "FUZZY";

/// Report of a watchlist check; `C` is the search configuration echoed back by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistReport<C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default)]
    pub breakdown: Vec<Breakdown>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub watchlist_summary: Option<WatchlistSummary<C>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistSummary<C> {
    #[serde(default)]
    pub total_hits: u32,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub search_config: Option<C>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_results: Option<RawResults>,
    #[serde(default)]
    pub associated_country_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResults {
    pub media: MediaResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistScreeningSearchConfig {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Settings shared by both advanced CA account types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedCaSearchSettings {
    #[serde(default)]
    pub remove_deceased: bool,
    #[serde(default)]
    pub share_url: bool,
    pub sources: CaSources,
    pub matching_strategy: CaMatchingStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAccountSearchSettings {
    #[serde(flatten)]
    pub settings: AdvancedCaSearchSettings,
    pub api_key: String,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ref: Option<String>,
}

/// Search configuration of a `WATCHLIST_ADVANCED_CA` check.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchlistAdvancedCaSearchConfig {
    WithYotiAccount(AdvancedCaSearchSettings),
    WithCustomAccount(CustomAccountSearchSettings),
    Unknown(UnknownObject),
}

impl WatchlistAdvancedCaSearchConfig {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (WITH_YOTI_ACCOUNT, |json| {
                serde_json::from_value(json).map(Self::WithYotiAccount)
            }),
            (WITH_CUSTOM_ACCOUNT, |json| {
                serde_json::from_value(json).map(Self::WithCustomAccount)
            }),
        ],
    };

    pub fn config_type(&self) -> &str {
        match self {
            Self::WithYotiAccount(_) => WITH_YOTI_ACCOUNT,
            Self::WithCustomAccount(_) => WITH_CUSTOM_ACCOUNT,
            Self::Unknown(unknown) => unknown.tag(),
        }
    }

    /// Settings common to both account types.
    pub fn settings(&self) -> Option<&AdvancedCaSearchSettings> {
        match self {
            Self::WithYotiAccount(settings) => Some(settings),
            Self::WithCustomAccount(custom) => Some(&custom.settings),
            Self::Unknown(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for WatchlistAdvancedCaSearchConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for WatchlistAdvancedCaSearchConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.config_type();
        match self {
            Self::WithYotiAccount(s) => serialize_tagged(serializer, Self::TAG, tag, s),
            Self::WithCustomAccount(s) => serialize_tagged(serializer, Self::TAG, tag, s),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeListSources {
    #[serde(default)]
    pub types: Vec<String>,
}

/// Which watchlists an advanced CA search covers.
#[derive(Debug, Clone, PartialEq)]
pub enum CaSources {
    /// The lists configured on the search profile.
    Profile,
    TypeList(TypeListSources),
    Unknown(UnknownObject),
}

impl CaSources {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (PROFILE_SOURCES, |_| Ok(Self::Profile)),
            (TYPE_LIST_SOURCES, |json| {
                serde_json::from_value(json).map(Self::TypeList)
            }),
        ],
    };
}

impl<'de> Deserialize<'de> for CaSources {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for CaSources {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Profile => serialize_tagged(serializer, Self::TAG, PROFILE_SOURCES, &Map::new()),
            Self::TypeList(t) => serialize_tagged(serializer, Self::TAG, TYPE_LIST_SOURCES, t),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactMatching {
    #[serde(default = "exact_match_default")]
    pub exact_match: bool,
}

fn exact_match_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatching {
    pub fuzziness: f64,
}

/// How names are matched against watchlist entries.
#[derive(Debug, Clone, PartialEq)]
pub enum CaMatchingStrategy {
    Exact(ExactMatching),
    Fuzzy(FuzzyMatching),
    Unknown(UnknownObject),
}

impl CaMatchingStrategy {
    pub const TAG: &'static str = "type";

    pub const DISPATCH: DispatchTable<Self> = DispatchTable {
        tag_field: Self::TAG,
        entries: &[
            (EXACT_MATCHING, |json| {
                serde_json::from_value(json).map(Self::Exact)
            }),
            (FUZZY_MATCHING, |json| {
                serde_json::from_value(json).map(Self::Fuzzy)
            }),
        ],
    };
}

impl<'de> Deserialize<'de> for CaMatchingStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::DISPATCH.deserialize(deserializer, Self::Unknown)
    }
}

impl Serialize for CaMatchingStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Exact(e) => serialize_tagged(serializer, Self::TAG, EXACT_MATCHING, e),
            Self::Fuzzy(f) => serialize_tagged(serializer, Self::TAG, FUZZY_MATCHING, f),
            Self::Unknown(unknown) => unknown.serialize(serializer),
        }
    }
}
