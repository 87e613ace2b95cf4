//! Customizing parsing and stringifying with the options builders.
//!
//! Run with: cargo run --example custom_options

use qs_value::{
    parse_with_options, qs, stringify_with_options, ArrayFormat, Charset, Delimiter, Filter,
    Format, ParseOptions, StringifyOptions,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Semicolon or comma separated input
    println!("Pattern delimiter:");
    let options = ParseOptions::new().with_delimiter(Delimiter::pattern("[;,]")?);
    println!("{:?}\n", parse_with_options("a=b;c=d,e=f", &options));

    // Dot notation and a leading question mark
    println!("Dots and query prefix:");
    let options = ParseOptions::new()
        .with_allow_dots(true)
        .with_ignore_query_prefix(true);
    println!("{:?}\n", parse_with_options("?a.b.c=d", &options));

    // Bare keys become null instead of empty strings
    println!("Strict null handling:");
    let options = ParseOptions::new().with_strict_null_handling(true);
    println!("{:?}\n", parse_with_options("a&b=", &options));

    // Legacy forms that announce their charset
    println!("Charset sentinel:");
    let options = ParseOptions::new()
        .with_charset(Charset::Iso88591)
        .with_charset_sentinel(true);
    println!("{:?}\n", parse_with_options("utf8=%E2%9C%93&a=%C3%B8", &options));

    let value = qs!({ "a": { "b": ["c", "d"] }, "e": "f g", "z": null });

    // Array formats
    for format in ["indices", "brackets", "repeat"] {
        let options = StringifyOptions::new()
            .with_encode(false)
            .with_array_format(format.parse::<ArrayFormat>()?);
        println!("{}: {}", format, stringify_with_options(&value, &options));
    }
    println!();

    // Form encoding, sorted keys and skipped nulls
    println!("RFC 1738, sorted, skip nulls:");
    let options = StringifyOptions::new()
        .with_format(Format::Rfc1738)
        .with_sort(|a, b| b.cmp(a))
        .with_skip_nulls(true);
    println!("{}\n", stringify_with_options(&value, &options));

    // Only the listed keys are written
    println!("Key filter:");
    let options = StringifyOptions::new()
        .with_encode_values_only(true)
        .with_filter(Filter::keys(["a", "b", "0"]));
    println!("{}\n", stringify_with_options(&value, &options));

    // Non-Latin-1 text becomes numeric entities
    println!("ISO-8859-1 with sentinel:");
    let options = StringifyOptions::new()
        .with_charset(Charset::Iso88591)
        .with_charset_sentinel(true)
        .with_add_query_prefix(true);
    println!(
        "{}",
        stringify_with_options(&qs!({ "name": "\u{e6}\u{263A}" }), &options)
    );

    Ok(())
}
