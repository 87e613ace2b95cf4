//! Parsing and stringifying query strings with default options.
//!
//! Run with: cargo run --example basic

use qs_value::{parse, qs, stringify, Value};

fn main() {
    // Flat pairs, repeated keys and percent escapes
    let flat = parse("name=Alice%20Johnson&role=admin&role=owner");
    println!("Flat: {:?}\n", flat);

    // Bracket notation builds nested mappings
    let nested = parse("user[name]=tj&user[address][city]=london");
    println!("Nested: {:?}\n", nested);

    // Bracket and index notation build sequences
    let sequences = parse("tags[]=rust&tags[]=web&ids[1]=b&ids[0]=a");
    println!("Sequences: {:?}\n", sequences);

    // Indices over the array limit fall back to mapping keys
    let sparse = parse("a[100]=b");
    println!("Over the limit: {:?}\n", sparse);

    // Reserved keys never reach the result
    let guarded = parse("__proto__[admin]=true&safe=1");
    println!("Guarded: {:?}\n", guarded);

    // Build a tree and write it back out
    let value = qs!({
        "user": { "name": "tj", "tags": ["a", "b"] },
        "page": 2,
        "empty": null
    });
    let query = stringify(&value);
    println!("Stringified: {}", query);

    let parsed = Value::Mapping(parse(&query));
    println!("Parsed back: {:?}", parsed);
}
