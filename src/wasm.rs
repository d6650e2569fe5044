use crate::config::FormatOptions;
use crate::format_sql;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn format_sql_wasm(
    input: &str,
    uppercase: bool,
    max_subselect_length: usize,
    functions_csv: &str,
) -> String {
    let options = FormatOptions {
        uppercase,
        ..FormatOptions::default()
    }
    .with_max_subselect_length(max_subselect_length)
    .with_function_names(functions_csv.split(','));

    format_sql(input, &options)
}
