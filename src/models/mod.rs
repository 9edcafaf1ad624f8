pub mod identity;
pub mod record;
pub mod table;

pub use identity::{normalize, profile_link};
pub use record::{
    parse_metric, parse_publication_date, Candidate, HistoricalMetric, ReviewStatus, RosterRecord,
};
pub use table::{make_unique_headers, RawTable, SchemaBinding};
