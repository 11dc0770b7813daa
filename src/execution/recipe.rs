//! Per-language execution recipes.

use crate::language::Language;

/// What a compile step leaves behind for the run step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `<Stem>.class` next to the source, run with `java -cp <dir> <Stem>`.
    JvmClass,
    /// A native executable at a temporary path.
    NativeExecutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// Run the configured interpreter directly against the file.
    Interpret,
    /// Compile first, then run the artifact.
    CompileThenRun {
        compiler: &'static str,
        artifact: Artifact,
    },
}

const RECIPES: &[(Language, Recipe)] = &[
    (Language::Python, Recipe::Interpret),
    (
        Language::Java,
        Recipe::CompileThenRun { compiler: "javac", artifact: Artifact::JvmClass },
    ),
    (
        Language::C,
        Recipe::CompileThenRun { compiler: "gcc", artifact: Artifact::NativeExecutable },
    ),
    (
        Language::Cpp,
        Recipe::CompileThenRun { compiler: "g++", artifact: Artifact::NativeExecutable },
    ),
];

impl Recipe {
    /// `None` means the language cannot be run.
    pub fn for_language(language: Language) -> Option<Self> {
        RECIPES
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, recipe)| *recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_table() {
        assert_eq!(Recipe::for_language(Language::Python), Some(Recipe::Interpret));
        assert_eq!(
            Recipe::for_language(Language::Java),
            Some(Recipe::CompileThenRun { compiler: "javac", artifact: Artifact::JvmClass })
        );
        assert_eq!(
            Recipe::for_language(Language::C),
            Some(Recipe::CompileThenRun { compiler: "gcc", artifact: Artifact::NativeExecutable })
        );
        assert_eq!(
            Recipe::for_language(Language::Cpp),
            Some(Recipe::CompileThenRun { compiler: "g++", artifact: Artifact::NativeExecutable })
        );
    }

    #[test]
    fn test_unrunnable_languages_have_no_recipe() {
        assert_eq!(Recipe::for_language(Language::JavaScript), None);
        assert_eq!(Recipe::for_language(Language::Unknown), None);
    }
}
