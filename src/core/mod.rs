pub mod cleaner;
pub mod etl;
pub mod exporter;
pub mod fetcher;
pub mod html_table;
pub mod merger;
pub mod pipeline;
pub mod projector;
pub mod table_set;

pub use crate::domain::model::{MergedTable, RawTable, Table, TableSet, TransformResult, Value};
pub use crate::domain::ports::{
    ExportedArtifacts, FetchError, FetchOutcome, Pipeline, Publisher, SourceSpec, Storage, TableSource,
};
pub use crate::utils::error::Result;
