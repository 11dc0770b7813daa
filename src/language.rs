//! Language detection from file extensions.

use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Java,
    Cpp,
    C,
    JavaScript,
    Unknown,
}

impl Language {
    /// Exact, case-sensitive match on the extension. Never fails.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("py") => Self::Python,
            Some("java") => Self::Java,
            Some("cpp") => Self::Cpp,
            Some("c") => Self::C,
            Some("js") => Self::JavaScript,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::JavaScript => "JavaScript",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A source file together with its detected language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    path: PathBuf,
    language: Language,
}

impl FileReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self { path, language }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        let cases = [
            ("hello.py", Language::Python, "Python"),
            ("Main.java", Language::Java, "Java"),
            ("a/b/prog.cpp", Language::Cpp, "C++"),
            ("prog.c", Language::C, "C"),
            ("app.js", Language::JavaScript, "JavaScript"),
        ];
        for (file, lang, label) in cases {
            assert_eq!(Language::from_path(Path::new(file)), lang, "{file}");
            assert_eq!(lang.to_string(), label);
        }
    }

    #[test]
    fn test_unknown_extensions() {
        for file in ["notes.txt", "Makefile", "script.PY", "prog.C", "x.cc", ".py"] {
            assert_eq!(Language::from_path(Path::new(file)), Language::Unknown, "{file}");
        }
        assert_eq!(Language::Unknown.label(), "Unknown");
    }

    #[test]
    fn test_detection_is_repeatable() {
        let a = FileReference::new("foo.py");
        let b = FileReference::new("foo.py");
        assert_eq!(a, b);
        assert_eq!(a.language(), Language::Python);
        assert_eq!(a.path(), Path::new("foo.py"));
    }
}
