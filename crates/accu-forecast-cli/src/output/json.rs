use serde_json::Value;

/// Pretty-print a forecast or merge result as JSON to stdout. The
/// records keep their Decimal string form; nothing is rounded here.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
