#![no_main]

//! Fuzz target for webhook response decoding
//!
//! Arbitrary response bodies must decode to an error or a response, and
//! merging whatever decodes must keep the score in range.

use libfuzzer_sys::fuzz_target;
use p4ai_review::webhook::decode_response;
use p4ai_review::{DescriptionResponse, ReviewMerger, ReviewResponse};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let _ = decode_response::<DescriptionResponse>(body.clone());

    if let Ok(response) = decode_response::<ReviewResponse>(body) {
        let merged = ReviewMerger::default().merge(std::slice::from_ref(&response));
        assert!(merged.overall_score <= 100);
        assert_eq!(merged.statistics.total() as usize, merged.comments.len());
    }
});
