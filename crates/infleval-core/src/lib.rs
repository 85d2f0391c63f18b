//! Domain types and pure view logic for influencer evaluation reports.
//!
//! Everything here is synchronous and side-effect free apart from reading
//! configuration from the environment: sorting a fetched report, shaping the
//! radar chart of the top record, and serializing the sorted view to CSV.

pub mod app_config;
pub mod brief;
pub mod config;
pub mod error;
pub mod export;
pub mod influencer;
pub mod radar;
pub mod report;

pub use app_config::{AppConfig, Environment};
pub use brief::{Brief, BriefInput, KpiWeights};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, ExportError};
pub use export::{export_csv, CsvExport, CSV_HEADER};
pub use influencer::{parse_handles, Influencer, InfluencerInput, DEFAULT_PLATFORM};
pub use radar::{radar_points, RadarAxis, RadarInput, RadarPoint, RADAR_DOMAIN_MAX};
pub use report::{sort_report, BriefId, ScoredInfluencer, SortKey};
