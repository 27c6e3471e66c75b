// src/utils/lang.rs

//! Judge language names → file extension and line comment.

/// File extension (with dot) for a judge language name.
pub fn extension(lang: &str) -> &'static str {
    match lang {
        "cpp" => ".cpp",
        "java" => ".java",
        "python" | "python3" | "pythondata" => ".py",
        "c" => ".c",
        "csharp" | "c#" => ".cs",
        "javascript" => ".js",
        "typescript" => ".ts",
        "ruby" => ".rb",
        "swift" => ".swift",
        "golang" => ".go",
        "scala" => ".scala",
        "kotlin" => ".kt",
        "rust" => ".rs",
        "php" => ".php",
        "racket" => ".rkt",
        "erlang" => ".erl",
        "elixir" => ".ex",
        "dart" => ".dart",
        "mysql" | "mssql" | "oraclesql" | "postgresql" => ".sql",
        "bash" => ".sh",
        _ => ".txt",
    }
}

/// Line comment prefix for a judge language name.
pub fn comment(lang: &str) -> &'static str {
    match lang {
        "python" | "python3" | "pythondata" | "ruby" | "elixir" | "bash" => "#",
        "racket" => ";",
        "erlang" => "%",
        "mysql" | "mssql" | "oraclesql" | "postgresql" => "--",
        _ => "//",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert_eq!(extension("rust"), ".rs");
        assert_eq!(extension("python3"), ".py");
        assert_eq!(comment("python3"), "#");
        assert_eq!(comment("cpp"), "//");
        assert_eq!(comment("mysql"), "--");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert_eq!(extension("brainfuck"), ".txt");
        assert_eq!(comment("brainfuck"), "//");
    }
}
