use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref UUID: Regex = Regex::new(
        r"^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$"
    )
    .unwrap();
}

/// Normalize a URL path into a reusable template.
///
/// Path segments made entirely of ASCII digits become `{integer}`, canonical
/// 8-4-4-4-12 UUIDs become `{uuid}`, every other segment (including empty
/// segments from leading, trailing, or doubled slashes) is kept verbatim.
/// The function is total and idempotent: an already-extracted template is a
/// fixed point.
///
/// ```
/// use relog_core::pattern::extract;
///
/// assert_eq!(
///     extract("/pharmacy/request/3191/reject"),
///     "/pharmacy/request/{integer}/reject"
/// );
/// ```
pub fn extract(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .map(|seg| {
            if INTEGER.is_match(seg) {
                "{integer}"
            } else if UUID.is_match(seg) {
                "{uuid}"
            } else {
                seg
            }
        })
        .collect();
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_integer_segment() {
        assert_eq!(
            extract("/pharmacy/request/3191/reject"),
            "/pharmacy/request/{integer}/reject"
        );
    }

    #[test]
    fn test_extract_uuid_segment() {
        assert_eq!(
            extract("/pharmacy/user/ded4c637-8fed-4ac2-9215-4b41294febef/requestsandorders"),
            "/pharmacy/user/{uuid}/requestsandorders"
        );
    }

    #[test]
    fn test_extract_uuid_case_insensitive() {
        assert_eq!(
            extract("/user/DED4C637-8FED-4AC2-9215-4B41294FEBEF"),
            "/user/{uuid}"
        );
    }

    #[test]
    fn test_extract_leaves_plain_segments_alone() {
        assert_eq!(extract("/pharmacy/requests"), "/pharmacy/requests");
    }

    #[test]
    fn test_extract_preserves_empty_segments() {
        assert_eq!(extract(""), "");
        assert_eq!(extract("/"), "/");
        assert_eq!(extract("//a//1/"), "//a//{integer}/");
    }

    #[test]
    fn test_extract_non_canonical_uuid_kept_verbatim() {
        // Missing hyphens or wrong group lengths are not collapsed.
        assert_eq!(
            extract("/user/ded4c6378fed4ac292154b41294febef"),
            "/user/ded4c6378fed4ac292154b41294febef"
        );
        assert_eq!(extract("/user/ded4-c637"), "/user/ded4-c637");
    }

    #[test]
    fn test_extract_mixed_alphanumeric_not_integer() {
        assert_eq!(extract("/v1/things"), "/v1/things");
    }

    #[test]
    fn test_extract_unicode_digits_not_collapsed() {
        // Only ASCII digits qualify as {integer}.
        assert_eq!(extract("/a/١٢٣"), "/a/١٢٣");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let paths = [
            "/pharmacy/request/3191/reject",
            "/pharmacy/user/ded4c637-8fed-4ac2-9215-4b41294febef/requestsandorders",
            "//a//1/",
            "/",
            "",
            "/plain/path",
        ];
        for path in paths {
            let once = extract(path);
            assert_eq!(extract(&once), once, "extract not idempotent for {path:?}");
        }
    }
}
