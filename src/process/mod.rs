pub mod ingest;
pub mod provision;
pub mod reconcile;
pub mod split;

pub use ingest::{IngestStats, Ingestor};
pub use provision::Provisioning;
pub use reconcile::{reconcile, Row, RowPolicy, Verdict};
pub use split::LineSplitter;
