#[must_use]
pub(super) fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First non-empty value among `names`, in priority order.
#[must_use]
pub(super) fn read_first_non_empty_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| read_non_empty_env(name))
}
