#![no_main]

use coded_errors::format::{sprintf, Arg};
use libfuzzer_sys::fuzz_target;

// First line is the template; the rest feed one argument each.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut lines = input.lines();
    let template = lines.next().unwrap_or_default();

    let args: Vec<Arg<'_>> = lines
        .map(|line| {
            if let Ok(n) = line.parse::<i64>() {
                Arg::from(n)
            } else if let Ok(f) = line.parse::<f64>() {
                Arg::from(f)
            } else if let Ok(b) = line.parse::<bool>() {
                Arg::from(b)
            } else {
                Arg::from(line)
            }
        })
        .collect();

    let out = sprintf(template, &args);
    assert!(std::str::from_utf8(out.as_bytes()).is_ok());
});
