use convert_case::{Case, Casing};

const COMPONENT_ROOTS: [&str; 8] = [
    "button", "input", "card", "alert", "checkbox", "toggle", "tabs", "modal",
];

/// Top-level partition of the token set. Every path lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Primitive,
    Semantic,
    Component,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Primitive, Bucket::Semantic, Bucket::Component];

    /// Classifies a dotted token path. The primitive test is a raw string
    /// prefix (`letter` also matches `letterSpacing.x` or `lettersomething`);
    /// the component test looks at the whole first segment.
    pub fn of(path: &str) -> Bucket {
        if path.starts_with("color.") || path.starts_with("font.") || path.starts_with("letter") {
            return Bucket::Primitive;
        }
        let root = path.split('.').next().unwrap_or_default();
        if COMPONENT_ROOTS.contains(&root) {
            Bucket::Component
        } else {
            Bucket::Semantic
        }
    }

    /// Name of the token set in the interchange document.
    pub fn set_name(self) -> &'static str {
        match self {
            Bucket::Primitive => "primitives",
            Bucket::Semantic => "semantic",
            Bucket::Component => "components",
        }
    }

    pub fn collection_name(self) -> String {
        self.set_name().to_case(Case::Title)
    }

    /// Mode names for the variables collection; the first one is the initial mode.
    pub fn modes(self) -> &'static [&'static str] {
        match self {
            Bucket::Semantic => &["dark", "light"],
            Bucket::Primitive | Bucket::Component => &["default"],
        }
    }

    /// Path as it appears inside this bucket's set. Semantic tokens drop a
    /// leading `semantic.` namespace segment.
    pub fn relative_path(self, path: &str) -> &str {
        match self {
            Bucket::Semantic => path.strip_prefix("semantic.").unwrap_or(path),
            Bucket::Primitive | Bucket::Component => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("color.neutral.50", Bucket::Primitive)]
    #[case("font.family.body", Bucket::Primitive)]
    #[case("letterSpacing.tight", Bucket::Primitive)]
    #[case("lettersomething.x", Bucket::Primitive)]
    #[case("colors.brand", Bucket::Semantic)]
    #[case("color", Bucket::Semantic)]
    #[case("button.primary.background", Bucket::Component)]
    #[case("modal", Bucket::Component)]
    #[case("tabs.active.border", Bucket::Component)]
    #[case("buttons.primary", Bucket::Semantic)]
    #[case("semantic.surface.accent", Bucket::Semantic)]
    #[case("surface.card.button", Bucket::Semantic)]
    fn classifies_paths(#[case] path: &str, #[case] expected: Bucket) {
        assert_eq!(Bucket::of(path), expected);
    }

    #[test]
    fn names_and_modes() {
        assert_eq!(Bucket::Primitive.collection_name(), "Primitives");
        assert_eq!(Bucket::Component.set_name(), "components");
        assert_eq!(Bucket::Semantic.modes(), &["dark", "light"]);
        assert_eq!(Bucket::Component.modes(), &["default"]);
    }

    #[test]
    fn relative_path_strips_semantic_namespace_only() {
        assert_eq!(
            Bucket::Semantic.relative_path("semantic.surface.accent"),
            "surface.accent"
        );
        assert_eq!(Bucket::Semantic.relative_path("surface.accent"), "surface.accent");
        assert_eq!(Bucket::Primitive.relative_path("color.a"), "color.a");
    }

    proptest! {
        #[test]
        fn every_path_has_exactly_one_bucket(path in "[a-z]{0,8}(\\.[a-z0-9]{1,6}){0,3}") {
            let hits = Bucket::ALL
                .iter()
                .filter(|bucket| **bucket == Bucket::of(&path))
                .count();
            prop_assert_eq!(hits, 1);
        }

        #[test]
        fn component_roots_win_over_semantic(root in prop::sample::select(COMPONENT_ROOTS.to_vec()), rest in "[a-z]{1,6}") {
            let path = format!("{root}.{rest}");
            prop_assert_eq!(Bucket::of(&path), Bucket::Component);
        }
    }
}
