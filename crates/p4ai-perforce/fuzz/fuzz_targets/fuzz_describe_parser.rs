#![no_main]

use libfuzzer_sys::fuzz_target;
use p4ai_perforce::{DiffVariant, parse_diff_dump, parse_summary};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut record = parse_summary(&text, 1);
    parse_diff_dump(&text, &mut record, DiffVariant::Short);

    let mut paths: Vec<&str> = record.files.iter().map(|f| f.depot_path.as_str()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), record.files.len());
});
