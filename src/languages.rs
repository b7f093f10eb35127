//! Supported languages and the toolchains used to build and run them

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

/// A language the executor knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Java,
    Cpp,
    JavaScript,
    Python,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Java,
        Language::Cpp,
        Language::JavaScript,
        Language::Python,
    ];

    /// Identifier used on the wire and in `languages.toml`
    pub fn id(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
            Language::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.id() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Programs used to compile and run one language
#[derive(Debug, Clone, PartialEq)]
pub struct Toolchain {
    /// Compiler program (compiled languages only)
    pub compiler: Option<String>,
    /// Interpreter or VM. Absent when the compiled artifact runs on its own.
    pub runtime: Option<String>,
    /// Extra flags placed before the source file on the compile line
    pub compile_args: Vec<String>,
}

/// Raw TOML configuration for a language
#[derive(Debug, Deserialize)]
struct RawToolchain {
    compiler: Option<String>,
    runtime: Option<String>,
    #[serde(default)]
    compile_args: Vec<String>,
}

/// Toolchains for every supported language
#[derive(Debug, Clone)]
pub struct LanguageTable {
    toolchains: HashMap<Language, Toolchain>,
}

impl LanguageTable {
    /// Parse a `languages.toml` document
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let raw_configs: HashMap<String, RawToolchain> =
            toml::from_str(content).context("Failed to parse language table")?;

        let mut toolchains = HashMap::new();
        for (name, raw) in raw_configs {
            let language: Language = name
                .parse()
                .with_context(|| format!("Unknown section [{}] in language table", name))?;
            toolchains.insert(
                language,
                Toolchain {
                    compiler: raw.compiler,
                    runtime: raw.runtime,
                    compile_args: raw.compile_args,
                },
            );
        }

        let table = Self { toolchains };
        table.validate()?;
        Ok(table)
    }

    /// The table shipped with the binary
    pub fn embedded() -> anyhow::Result<Self> {
        Self::parse(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/files/languages.toml"
        )))
    }

    fn validate(&self) -> anyhow::Result<()> {
        for language in Language::ALL {
            let toolchain = self
                .toolchains
                .get(&language)
                .with_context(|| format!("Missing [{}] in language table", language.id()))?;

            let (needs_compiler, needs_runtime) = match language {
                Language::Java => (true, true),
                Language::Cpp => (true, false),
                Language::JavaScript | Language::Python => (false, true),
            };
            if needs_compiler && toolchain.compiler.is_none() {
                anyhow::bail!("[{}] requires a compiler", language.id());
            }
            if needs_runtime && toolchain.runtime.is_none() {
                anyhow::bail!("[{}] requires a runtime", language.id());
            }
        }
        Ok(())
    }

    pub fn toolchain(&self, language: Language) -> &Toolchain {
        // validate() guarantees an entry for every variant
        &self.toolchains[&language]
    }
}

/// Load the language table, preferring a file path over the embedded copy
pub fn load_languages(path: Option<&str>) -> anyhow::Result<LanguageTable> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read language table {}", path))?;
            LanguageTable::parse(&content)
        }
        None => LanguageTable::embedded(),
    }
}
