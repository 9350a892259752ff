// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Argument checks shared by the `with_*` mutators.
//!
//! Each helper returns the kind-prefixed, field-named message the builder
//! stores as its sticky error.

use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;

pub fn empty_field(kind: &str, field: &str) -> String {
    format!("{} '{}' cannot be empty", kind, field)
}

pub fn non_empty(kind: &str, field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(empty_field(kind, field));
    }

    Ok(())
}

pub fn non_empty_map<V>(
    kind: &str,
    field: &str,
    map: &std::collections::BTreeMap<String, V>,
) -> Result<(), String> {
    if map.is_empty() {
        return Err(empty_field(kind, field));
    }

    if map.keys().any(|k| k.is_empty()) {
        return Err(format!("{} '{}' cannot contain an empty key", kind, field));
    }

    Ok(())
}

pub fn non_empty_list<T: AsRef<str>>(kind: &str, field: &str, values: &[T]) -> Result<(), String> {
    if values.is_empty() {
        return Err(empty_field(kind, field));
    }

    if values.iter().any(|v| v.as_ref().is_empty()) {
        return Err(format!("{} '{}' cannot contain an empty entry", kind, field));
    }

    Ok(())
}

pub fn in_range<T>(kind: &str, field: &str, value: T, min: T, max: T) -> Result<(), String>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(format!(
            "{} '{}' must be between {} and {}, got {}",
            kind, field, min, max, value
        ));
    }

    Ok(())
}

pub fn one_of(kind: &str, field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if !allowed.contains(&value) {
        return Err(format!(
            "{} '{}' must be one of {:?}, got '{}'",
            kind, field, allowed, value
        ));
    }

    Ok(())
}

fn uuid_regex() -> &'static Regex {
    static UUID: OnceLock<Regex> = OnceLock::new();
    UUID.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("static UUID pattern")
    })
}

pub fn uuid(kind: &str, field: &str, value: &str) -> Result<(), String> {
    if !uuid_regex().is_match(value) {
        return Err(format!("{} '{}' must be a valid UUID", kind, field));
    }

    Ok(())
}

/// Accepts a percentage in `1%..=100%`.
pub fn percentage(kind: &str, field: &str, value: &str) -> Result<(), String> {
    let digits = value.strip_suffix('%').ok_or_else(|| {
        format!("{} '{}' must be a percentage, got '{}'", kind, field, value)
    })?;

    let parsed: u32 = digits.parse().map_err(|_| {
        format!(
            "{} '{}' failed to parse percentage '{}'",
            kind, field, value
        )
    })?;

    if !(1..=100).contains(&parsed) {
        return Err(format!(
            "{} '{}' percentage must be between 1 and 100, got '{}'",
            kind, field, value
        ));
    }

    Ok(())
}
