use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns;

/// Creates a Field with a human-readable description attached as metadata
fn field_with_description(name: &str, data_type: DataType, nullable: bool, description: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("description".to_string(), description.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

/// Creates the Arrow schema of the normalized peptide table.
///
/// One row per (canonical peptide, protein, sample, condition).
///
/// # Example
///
/// ```
/// use pepnorm::schema::create_peptide_schema;
///
/// let schema = create_peptide_schema();
/// assert_eq!(schema.fields().len(), 5);
/// ```
pub fn create_peptide_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(field_with_description(
        columns::PEPTIDE_CANONICAL,
        DataType::Utf8,
        false,
        "peptide sequence without modifications",
    ));
    builder.push(field_with_description(
        columns::PROTEIN_NAME,
        DataType::Utf8,
        false,
        "protein accession(s), semicolon separated",
    ));
    builder.push(field_with_description(
        columns::SAMPLE_ID,
        DataType::Utf8,
        false,
        "SDRF source name",
    ));
    builder.push(field_with_description(
        columns::NORM_INTENSITY,
        DataType::Float64,
        false,
        "normalized peptide intensity",
    ));
    builder.push(field_with_description(
        columns::OUTPUT_CONDITION,
        DataType::Utf8,
        false,
        "experimental condition",
    ));

    builder.finish()
}

/// Creates the peptide schema wrapped in an Arc (for record batch construction)
pub fn create_peptide_schema_arc() -> Arc<Schema> {
    Arc::new(create_peptide_schema())
}
