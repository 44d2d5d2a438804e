use crate::cli::error::CliError;
use crate::cli::utils::*;

#[test]
fn test_truncate_with_ellipsis_short_string() {
    let result = truncate_with_ellipsis("hello", 10);
    assert_eq!(result, "hello");
}

#[test]
fn test_truncate_with_ellipsis_exact_length() {
    let result = truncate_with_ellipsis("hello", 5);
    assert_eq!(result, "hello");
}

#[test]
fn test_truncate_with_ellipsis_long_description() {
    let result = truncate_with_ellipsis("Search eBay listings by keyword", 12);
    assert_eq!(result, "Search eB...");
}

#[test]
fn test_truncate_with_ellipsis_unicode() {
    let result = truncate_with_ellipsis("Größe 42 €", 10);
    assert_eq!(result, "Größe 42 €");

    let result2 = truncate_with_ellipsis("Größe 42 €", 7);
    assert_eq!(result2, "Größ...");
}

#[test]
fn test_or_dash() {
    assert_eq!(or_dash(None), "-");
    assert_eq!(or_dash(Some("")), "-");
    assert_eq!(or_dash(Some("seller_1")), "seller_1");
}

#[test]
fn test_output_format_parse() {
    assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
    assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
    assert!(matches!(
        OutputFormat::parse("yaml"),
        Err(CliError::InvalidFormat { format }) if format == "yaml"
    ));
}

#[test]
fn test_apply_table_style() {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(["Tool", "Description"]);
    builder.push_record(["test_auth", "Check the stored token"]);

    let mut table = builder.build();
    apply_table_style(&mut table);

    let output = table.to_string();
    // Rounded style uses ╭─╮│╰─╯ characters
    assert!(output.contains("╭"), "Table should use rounded style");
}
