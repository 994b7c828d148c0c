//! header.schema sidecar
//!
//! The converted BED files carry no header line; the field layout is
//! declared once per output batch in a `header.schema` XML document
//! (GMQL schema dialect, 1-based coordinates). The content is a fixed
//! contract: field names, order, and primitive types never vary with
//! the row content.

use crate::core::error::ConvertError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the schema sidecar file
pub const SCHEMA_FILENAME: &str = "header.schema";

/// The 18 output fields with their schema types, in emission order
pub const SCHEMA_FIELDS: [(&str, &str); 18] = [
    ("chrom", "STRING"),
    ("start", "LONG"),
    ("end", "LONG"),
    ("strand", "CHAR"),
    ("composite_element_ref", "STRING"),
    ("beta_value", "DOUBLE"),
    ("gene_symbol", "STRING"),
    ("entrez_gene_id", "STRING"),
    ("gene_type", "STRING"),
    ("ensembl_transcript_id", "STRING"),
    ("position_to_tss", "STRING"),
    ("all_gene_symbols", "STRING"),
    ("all_entrez_gene_ids", "STRING"),
    ("all_gene_types", "STRING"),
    ("all_ensembl_transcript_ids", "STRING"),
    ("all_positions_to_tss", "STRING"),
    ("cgi_coordinate", "STRING"),
    ("feature_type", "STRING"),
];

/// Render the schema document
pub fn schema_xml() -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<gmqlSchemaCollection xmlns=\"http://genomic.elet.polimi.it/entities\" name=\"GLOBAL_SCHEMAS\">\n",
    );
    xml.push_str("\t<gmqlSchema type=\"tab\" coordinate_system=\"1-based\">\n");
    for (name, field_type) in SCHEMA_FIELDS {
        xml.push_str(&format!(
            "\t\t<field type=\"{}\">{}</field>\n",
            field_type, name
        ));
    }
    xml.push_str("\t</gmqlSchema>\n");
    xml.push_str("</gmqlSchemaCollection>");
    xml
}

/// Write `header.schema` into the conversion output directory
pub fn dump_schema(convert_dir: &Path) -> Result<PathBuf, ConvertError> {
    let path = convert_dir.join(SCHEMA_FILENAME);
    let mut file = File::create(&path).map_err(|e| ConvertError::OutputWrite {
        path: path.clone(),
        source: e,
    })?;
    file.write_all(schema_xml().as_bytes())
        .map_err(|e| ConvertError::OutputWrite {
            path: path.clone(),
            source: e,
        })?;
    Ok(path)
}
