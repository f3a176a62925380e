use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, ListArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use super::SourceError;

fn cast_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<Option<ArrayRef>, SourceError> {
    match batch.column_by_name(name) {
        Some(column) => Ok(Some(cast(column, to)?)),
        None => Ok(None),
    }
}

/// Get an optional column by name, cast to Utf8.
pub(super) fn get_optional_string_column(
    batch: &RecordBatch,
    name: &str,
) -> Result<Option<StringArray>, SourceError> {
    cast_column(batch, name, &DataType::Utf8)?
        .map(|array| {
            array
                .as_any()
                .downcast_ref::<StringArray>()
                .cloned()
                .ok_or_else(|| SourceError::InvalidFormat(format!("{} is not Utf8", name)))
        })
        .transpose()
}

/// Get a required column by name, cast to Utf8.
pub(super) fn get_string_column(batch: &RecordBatch, name: &str) -> Result<StringArray, SourceError> {
    get_optional_string_column(batch, name)?
        .ok_or_else(|| SourceError::ColumnNotFound(name.to_string()))
}

/// Get an optional column by name, cast to Float64.
pub(super) fn get_optional_float64_column(
    batch: &RecordBatch,
    name: &str,
) -> Result<Option<Float64Array>, SourceError> {
    cast_column(batch, name, &DataType::Float64)?
        .map(|array| {
            array
                .as_any()
                .downcast_ref::<Float64Array>()
                .cloned()
                .ok_or_else(|| SourceError::InvalidFormat(format!("{} is not Float64", name)))
        })
        .transpose()
}

/// Get a required column by name, cast to Float64.
pub(super) fn get_float64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array, SourceError> {
    get_optional_float64_column(batch, name)?
        .ok_or_else(|| SourceError::ColumnNotFound(name.to_string()))
}

/// Get a required column by name, cast to Int64.
pub(super) fn get_int64_column(batch: &RecordBatch, name: &str) -> Result<Int64Array, SourceError> {
    cast_column(batch, name, &DataType::Int64)?
        .ok_or_else(|| SourceError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<Int64Array>()
        .cloned()
        .ok_or_else(|| SourceError::InvalidFormat(format!("{} is not Int64", name)))
}

/// Get a column of accession lists, joined with `;` per row.
///
/// Plain string columns are passed through unchanged.
pub(super) fn get_joined_list_column(batch: &RecordBatch, name: &str) -> Result<Vec<String>, SourceError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| SourceError::ColumnNotFound(name.to_string()))?;

    match column.data_type() {
        DataType::List(_) => {
            let list = column
                .as_any()
                .downcast_ref::<ListArray>()
                .ok_or_else(|| SourceError::InvalidFormat(format!("{} is not List", name)))?;
            let values = cast(list.values(), &DataType::Utf8)?;
            let values = values
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| SourceError::InvalidFormat(format!("{} items are not Utf8", name)))?;
            let offsets = list.value_offsets();

            Ok((0..list.len())
                .map(|idx| {
                    if list.is_null(idx) {
                        return String::new();
                    }
                    let start = offsets[idx] as usize;
                    let end = offsets[idx + 1] as usize;
                    (start..end)
                        .filter(|&i| !values.is_null(i))
                        .map(|i| values.value(i))
                        .collect::<Vec<_>>()
                        .join(";")
                })
                .collect())
        }
        _ => {
            let strings = get_string_column(batch, name)?;
            Ok((0..strings.len())
                .map(|idx| optional_string(Some(&strings), idx).unwrap_or_default())
                .collect())
        }
    }
}

/// Read an optional string value from a nullable array.
pub(super) fn optional_string(array: Option<&StringArray>, idx: usize) -> Option<String> {
    array.and_then(|arr| {
        if arr.is_null(idx) {
            None
        } else {
            Some(arr.value(idx).to_string())
        }
    })
}

/// Read an optional f64 value from a nullable array.
pub(super) fn optional_f64(array: Option<&Float64Array>, idx: usize) -> Option<f64> {
    array.and_then(|arr| if arr.is_null(idx) { None } else { Some(arr.value(idx)) })
}
