pub mod batch;
pub mod cli;
pub mod engine;
pub mod model;
pub mod rules;
pub mod storage;

pub mod prelude {
    pub use crate::engine::{
        EngineError, GenotypeMatcher, RuleRegistry, RuleSetVersion, SharedRegistry, describe,
        describe_resolution, interpret, resolve,
    };
    pub use crate::model::locale::{KeyedText, Locale, LocalizedText};
    pub use crate::model::result::{
        InterpretationRequest, InterpretationResult, MarkerValues, Resolution,
    };
    pub use crate::model::table::{GenotypeRule, HlaStatus, Marker, MatchKey, RuleTable};
    pub use crate::rules::loader::RuleLoadError;
    pub use crate::storage::record::{
        CallerIds, ResultStatus, StorageRecord, from_storage_record, to_storage_payload,
    };
}
