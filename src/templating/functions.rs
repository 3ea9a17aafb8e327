//! Tera filter implementations for the curated template function set.

use super::case;
use std::collections::HashMap;
use tera::{Result as TeraResult, Value, try_get_value};

fn arg_str(args: &HashMap<String, Value>, name: &str, filter: &str) -> TeraResult<String> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| tera::Error::msg(format!("filter `{filter}` needs a string `{name}` argument")))
}

pub fn contains(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("contains", "value", String, value);
    let needle = arg_str(args, "substr", "contains")?;
    Ok(Value::Bool(s.contains(&needle)))
}

pub fn replace(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("replace", "value", String, value);
    let from = arg_str(args, "from", "replace")?;
    let to = arg_str(args, "to", "replace")?;
    Ok(Value::String(s.replacen(&from, &to, 1)))
}

pub fn replace_all(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("replaceAll", "value", String, value);
    let from = arg_str(args, "from", "replaceAll")?;
    let to = arg_str(args, "to", "replaceAll")?;
    Ok(Value::String(s.replace(&from, &to)))
}

pub fn split(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("split", "value", String, value);
    let sep = arg_str(args, "sep", "split")?;
    let parts: Vec<Value> = s.split(&sep).map(|p| Value::String(p.to_string())).collect();
    Ok(Value::Array(parts))
}

pub fn to_lower(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toLower", "value", String, value);
    Ok(Value::String(s.to_lowercase()))
}

pub fn to_upper(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toUpper", "value", String, value);
    Ok(Value::String(s.to_uppercase()))
}

pub fn trim_prefix(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("trimPrefix", "value", String, value);
    let prefix = arg_str(args, "prefix", "trimPrefix")?;
    Ok(Value::String(s.strip_prefix(prefix.as_str()).unwrap_or(&s).to_string()))
}

pub fn trim_suffix(value: &Value, args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("trimSuffix", "value", String, value);
    let suffix = arg_str(args, "suffix", "trimSuffix")?;
    Ok(Value::String(s.strip_suffix(suffix.as_str()).unwrap_or(&s).to_string()))
}

pub fn trim_space(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("trimSpace", "value", String, value);
    Ok(Value::String(s.trim().to_string()))
}

pub fn sort_strings(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let arr = try_get_value!("sortStrings", "value", Vec<String>, value);
    let mut sorted = arr;
    sorted.sort();
    Ok(Value::Array(sorted.into_iter().map(Value::String).collect()))
}

pub fn to_snake_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toSnakeCase", "value", String, value);
    Ok(Value::String(case::to_snake_case(&s)))
}

pub fn to_lower_snake_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toLowerSnakeCase", "value", String, value);
    Ok(Value::String(case::to_lower_snake_case(&s)))
}

pub fn to_upper_snake_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toUpperSnakeCase", "value", String, value);
    Ok(Value::String(case::to_upper_snake_case(&s)))
}

pub fn to_hyphen_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toHyphenCase", "value", String, value);
    Ok(Value::String(case::to_hyphen_case(&s)))
}

pub fn to_lower_hyphen_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toLowerHyphenCase", "value", String, value);
    Ok(Value::String(case::to_lower_hyphen_case(&s)))
}

pub fn to_upper_hyphen_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let s = try_get_value!("toUpperHyphenCase", "value", String, value);
    Ok(Value::String(case::to_upper_hyphen_case(&s)))
}
