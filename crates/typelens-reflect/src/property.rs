//! Accessor-name conventions.
//!
//! `getName`, `isActive` and `setName` name the properties `name`, `active`
//! and `name`. A name whose second character is uppercase keeps its first
//! character as is, so `getURL` names `URL`.

/// Property name for an accessor method, `None` if `name` has no accessor
/// prefix.
pub fn method_to_property(name: &str) -> Option<String> {
    let rest = name
        .strip_prefix("is")
        .or_else(|| name.strip_prefix("get"))
        .or_else(|| name.strip_prefix("set"))?;

    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return Some(String::new());
    };
    match chars.next() {
        Some(second) if second.is_uppercase() => Some(rest.to_string()),
        _ => Some(first.to_lowercase().chain(rest[first.len_utf8()..].chars()).collect()),
    }
}

pub fn is_property(name: &str) -> bool {
    is_getter(name) || is_setter(name)
}

pub fn is_getter(name: &str) -> bool {
    (name.starts_with("get") && name.len() > 3) || (name.starts_with("is") && name.len() > 2)
}

pub fn is_setter(name: &str) -> bool {
    name.starts_with("set") && name.len() > 3
}

/// Names that never become properties.
pub(crate) fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with('$') || name == "serialVersionUID" || name == "class")
}
