use proc_macro2::TokenStream;

#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}

/// Splits `a::b::Name` into `(Some("a::b"), "Name")`.
pub(crate) fn split_type_path(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once("::") {
        Some((module, name)) => (Some(module), name),
        None => (None, path),
    }
}

#[cfg(test)]
mod tests {
    use super::split_type_path;

    #[test]
    fn splits_last_segment() {
        assert_eq!(split_type_path("a::b::Name"), (Some("a::b"), "Name"));
        assert_eq!(split_type_path("Name"), (None, "Name"));
    }
}
