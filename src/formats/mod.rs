//! File format adapters
//!
//! The methylation input adapter, the coordinate-sorted BED output
//! accumulator, and the header.schema sidecar.

pub mod bed;
pub mod methylation;
pub mod schema;

pub use bed::{chrom_sort_key, ConvertedRow, SortedBedWriter, OUTPUT_FIELD_COUNT, OUTPUT_SUFFIX};
pub use methylation::{
    convert_file, ConversionStats, DropReason, ProbeParseError, ProbeRecordView,
};
pub use schema::{dump_schema, schema_xml, SCHEMA_FIELDS, SCHEMA_FILENAME};
