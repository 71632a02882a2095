//! Property tests for path classification and import references.

use proptest::prelude::*;
use std::path::{Path, PathBuf};

use weft::paths::{is_top_level, normalize_lexically, strip_anchor};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a path is top-level iff it sits exactly one level below the root.
    #[test]
    fn property_top_level_iff_depth_one(
        segments in proptest::collection::vec(segment(), 1..=4),
    ) {
        let root = Path::new("/repo/.github/workflows");
        let path = segments.iter().fold(root.to_path_buf(), |p, s| p.join(s));

        prop_assert_eq!(is_top_level(root, &path), segments.len() == 1);
    }

    /// PROPERTY: stripping an anchor never leaves a `#` and keeps the file part intact.
    #[test]
    fn property_strip_anchor(
        file in segment(),
        anchor in proptest::option::of("[A-Za-z0-9 #_-]{0,16}"),
    ) {
        let reference = match &anchor {
            Some(a) => format!("{}.md#{}", file, a),
            None => format!("{}.md", file),
        };

        prop_assert_eq!(strip_anchor(&reference), format!("{}.md", file));
    }

    /// PROPERTY: `dir/..` pairs cancel out under lexical normalization.
    #[test]
    fn property_normalize_cancels_parent_dirs(
        base in proptest::collection::vec(segment(), 1..=3),
        detour in segment(),
        file in segment(),
    ) {
        let base: PathBuf = std::iter::once("/".to_string()).chain(base).collect();
        let path = base.join(&detour).join("..").join(&file);

        prop_assert_eq!(normalize_lexically(&path), base.join(&file));
    }

    /// PROPERTY: `strip_anchor` never panics.
    #[test]
    fn property_strip_anchor_never_panics(s in "(?s).{0,128}") {
        let _ = strip_anchor(&s);
    }
}
