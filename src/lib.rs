pub mod config;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod token;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::FormatOptions;
pub use error::{FormatError, FormatFailure};

/// Formats one SQL statement.
///
/// `db_function_names` are written in upper case wherever they appear as identifiers.
/// On failure the returned [`FormatFailure`] carries `sql` unchanged.
pub fn format_statement(
    sql: &str,
    max_subselect_length: usize,
    db_function_names: &[&str],
) -> Result<String, FormatFailure> {
    let options = FormatOptions::default()
        .with_max_subselect_length(max_subselect_length)
        .with_function_names(db_function_names);
    try_format_sql(sql, &options)
}

pub fn try_format_sql(input: &str, options: &FormatOptions) -> Result<String, FormatFailure> {
    let tokens = lexer::tokenize(input);
    formatter::format_tokens(&tokens, input, options)
        .map_err(|error| FormatFailure::new(error, input))
}

/// Like [`try_format_sql`], but returns the input unchanged when it cannot be formatted.
pub fn format_sql(input: &str, options: &FormatOptions) -> String {
    match try_format_sql(input, options) {
        Ok(formatted) => formatted,
        Err(failure) => {
            tracing::debug!(error = %failure.error, "returning statement unformatted");
            failure.into_original()
        }
    }
}
