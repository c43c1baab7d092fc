//! Row-wise cell extraction helpers shared by the pipeline stages.

use polars::prelude::*;

/// Materialize a column as owned optional strings, one per row.
pub(crate) fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let val = column.get(i)?;
        if val.is_null() {
            values.push(None);
        } else {
            values.push(Some(val.to_string().trim_matches('"').to_string()));
        }
    }
    Ok(values)
}

/// Materialize a column as optional floats, casting if needed.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().collect())
}
