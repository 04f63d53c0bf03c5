// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Change form editing for `p4 change -o` / `p4 change -i`

/// Replace the `Description:` field of a change form
///
/// Every line of `description` is written tab-indented under the field, the
/// old indented lines are dropped, and the other fields are kept as they
/// were. Returns `None` when the form has no `Description:` field.
#[must_use]
pub fn replace_description(form: &str, description: &str) -> Option<String> {
    let mut out: Vec<String> = Vec::new();
    let mut in_description = false;
    let mut replaced = false;

    for line in form.lines() {
        if in_description {
            if line.starts_with('\t') || line.trim().is_empty() {
                continue;
            }
            in_description = false;
            out.push(String::new());
        }

        if !replaced && line.starts_with("Description:") {
            out.push("Description:".to_string());
            out.extend(description.lines().map(|l| format!("\t{l}")));
            in_description = true;
            replaced = true;
            continue;
        }

        out.push(line.to_string());
    }

    if !replaced {
        return None;
    }

    let mut form = out.join("\n");
    form.push('\n');
    Some(form)
}
