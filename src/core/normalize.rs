//! Normalization pass — ordered rewrite rules, configuration, and loading.
//!
//! The pipeline is a fixed sequence of pattern/replace passes, not a grammar
//! parser: it optimizes for fast, good-enough cleanup of generated prose.
//! Rule order is part of the contract — each rule operates on the previous
//! rule's output.

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("rule {0} has an empty word list")]
    EmptyWordList(&'static str),
    #[error("regex build error: {0}")]
    Regex(#[from] regex::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A rewrite rule as configuration data.
///
/// Rule sets are stored as an ordered RON list of these; see
/// `ruleset_data/standard.ron` for the built-in pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleConfig {
    /// Collapse whitespace runs to a single space, line-internally, and trim
    /// line edges. Paragraph breaks (newlines) are preserved.
    CollapseWhitespace,
    /// Standalone lowercase "i" → "I".
    CapitalizePronounI,
    /// Informal contractions missing their apostrophe, matched
    /// case-insensitively at word boundaries: (informal, corrected) pairs.
    RepairContractions(Vec<(String, String)>),
    /// "its" followed by one of the trigger words → "it's". Best-effort
    /// heuristic; may mis-correct legitimate possessives.
    DisambiguateIts(Vec<String>),
    /// A line ending in a lowercase letter gets a period before the newline.
    TerminateParagraphs,
    /// Upper-case the first letter of the text and of each sentence.
    CapitalizeSentences,
}

impl RuleConfig {
    /// Short identifier for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CollapseWhitespace => "collapse_whitespace",
            Self::CapitalizePronounI => "capitalize_pronoun_i",
            Self::RepairContractions(_) => "repair_contractions",
            Self::DisambiguateIts(_) => "disambiguate_its",
            Self::TerminateParagraphs => "terminate_paragraphs",
            Self::CapitalizeSentences => "capitalize_sentences",
        }
    }

    /// The standard pipeline, in contract order.
    pub fn standard_pipeline() -> Vec<RuleConfig> {
        vec![
            RuleConfig::CollapseWhitespace,
            RuleConfig::CapitalizePronounI,
            RuleConfig::RepairContractions(vec![
                ("im".to_string(), "I'm".to_string()),
                ("dont".to_string(), "don't".to_string()),
                ("wont".to_string(), "won't".to_string()),
                ("cant".to_string(), "can't".to_string()),
            ]),
            RuleConfig::DisambiguateIts(
                ["a", "the", "my", "your", "his", "her", "their"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            RuleConfig::TerminateParagraphs,
            RuleConfig::CapitalizeSentences,
        ]
    }
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
enum RewriteRule {
    CollapseWhitespace,
    CapitalizePronounI { pattern: Regex },
    RepairContractions {
        pattern: Regex,
        corrections: FxHashMap<String, String>,
    },
    DisambiguateIts { pattern: Regex },
    TerminateParagraphs,
    CapitalizeSentences,
}

impl RewriteRule {
    fn compile(config: &RuleConfig) -> Result<RewriteRule, NormalizeError> {
        match config {
            RuleConfig::CollapseWhitespace => Ok(RewriteRule::CollapseWhitespace),
            RuleConfig::CapitalizePronounI => Ok(RewriteRule::CapitalizePronounI {
                pattern: Regex::new(r"\bi\b")?,
            }),
            RuleConfig::RepairContractions(pairs) => {
                if pairs.is_empty() {
                    return Err(NormalizeError::EmptyWordList("repair_contractions"));
                }
                let alternation = pairs
                    .iter()
                    .map(|(informal, _)| regex::escape(informal))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;
                let corrections = pairs
                    .iter()
                    .map(|(informal, correct)| (informal.to_lowercase(), correct.clone()))
                    .collect();
                Ok(RewriteRule::RepairContractions {
                    pattern,
                    corrections,
                })
            }
            RuleConfig::DisambiguateIts(triggers) => {
                if triggers.is_empty() {
                    return Err(NormalizeError::EmptyWordList("disambiguate_its"));
                }
                let alternation = triggers
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern =
                    Regex::new(&format!(r"\b([Ii])ts(\s+(?:{})\b)", alternation))?;
                Ok(RewriteRule::DisambiguateIts { pattern })
            }
            RuleConfig::TerminateParagraphs => Ok(RewriteRule::TerminateParagraphs),
            RuleConfig::CapitalizeSentences => Ok(RewriteRule::CapitalizeSentences),
        }
    }

    fn apply(&self, text: &str) -> String {
        match self {
            RewriteRule::CollapseWhitespace => collapse_whitespace(text),
            RewriteRule::CapitalizePronounI { pattern } => {
                pattern.replace_all(text, "I").into_owned()
            }
            RewriteRule::RepairContractions {
                pattern,
                corrections,
            } => pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    let word = caps[0].to_lowercase();
                    corrections
                        .get(&word)
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            RewriteRule::DisambiguateIts { pattern } => pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    format!("{}t's{}", &caps[1], &caps[2])
                })
                .into_owned(),
            RewriteRule::TerminateParagraphs => terminate_paragraphs(text),
            RewriteRule::CapitalizeSentences => capitalize_sentences(text),
        }
    }
}

/// Collapse whitespace runs within each line and trim line edges.
///
/// Operates line-internally so paragraph breaks survive; `\r\n` degrades to
/// `\n`. Lines must not keep trailing spaces, or the paragraph-termination
/// rule would never see the line's true last character.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut prev_space = false;
        for ch in line.trim().chars() {
            if ch.is_whitespace() {
                if !prev_space {
                    out.push(' ');
                    prev_space = true;
                }
            } else {
                out.push(ch);
                prev_space = false;
            }
        }
    }
    out
}

/// Insert a period before a newline when the line ends in a lowercase
/// letter. Uppercase, digits, and existing punctuation are left alone, as is
/// the final line.
fn terminate_paragraphs(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = String::with_capacity(text.len() + lines.len());
    for (i, line) in lines.iter().enumerate() {
        out.push_str(line);
        if i + 1 < lines.len() {
            if line
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphabetic() && c.is_lowercase())
            {
                out.push('.');
            }
            out.push('\n');
        }
    }
    out
}

/// Upper-case the first alphabetic character of the text and the first
/// alphabetic character after sentence-terminating punctuation plus
/// whitespace. Any other character at the boundary consumes it: a digit or
/// quote after the whitespace leaves the rest of the sentence untouched.
fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    let mut after_terminator = false;
    for ch in text.chars() {
        if at_boundary && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            at_boundary = false;
            after_terminator = false;
        } else {
            match ch {
                '.' | '!' | '?' => after_terminator = true,
                c if c.is_whitespace() => {
                    if after_terminator {
                        at_boundary = true;
                    }
                }
                _ => {
                    after_terminator = false;
                    at_boundary = false;
                }
            }
            out.push(ch);
        }
    }
    out
}

/// An ordered, compiled rule pipeline.
///
/// `Default` yields the standard pipeline; custom pipelines compile from
/// `RuleConfig` lists, typically loaded from RON.
#[derive(Debug, Clone)]
pub struct RuleSet {
    configs: Vec<RuleConfig>,
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    /// Compile an ordered list of rule configurations.
    pub fn compile(configs: Vec<RuleConfig>) -> Result<RuleSet, NormalizeError> {
        let rules = configs
            .iter()
            .map(RewriteRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet { configs, rules })
    }

    /// Parse a rule set from a RON string.
    pub fn parse_ron(source: &str) -> Result<RuleSet, NormalizeError> {
        let configs: Vec<RuleConfig> = ron::from_str(source)?;
        Self::compile(configs)
    }

    /// Load a rule set from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<RuleSet, NormalizeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// The configurations this set was compiled from, in application order.
    pub fn configs(&self) -> &[RuleConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the full pipeline over `text`.
    ///
    /// Total over all inputs and idempotent: re-running the pipeline on its
    /// own output changes nothing. Words are never added or removed — only
    /// case, punctuation, and whitespace are adjusted.
    pub fn normalize(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        // The standard pipeline is compile-time constant and known-good.
        Self::compile(RuleConfig::standard_pipeline())
            .expect("standard pipeline compiles")
    }
}

/// Normalize `text` with the standard pipeline.
pub fn normalize(text: &str) -> String {
    static STANDARD: OnceLock<RuleSet> = OnceLock::new();
    STANDARD.get_or_init(RuleSet::default).normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_noop() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalized_text_is_unchanged() {
        let text = "Hello world. This is fine.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn collapses_spaces_within_lines() {
        assert_eq!(normalize("Too   many    spaces."), "Too many spaces.");
    }

    #[test]
    fn preserves_paragraph_breaks() {
        let out = normalize("First paragraph.\n\nSecond paragraph.");
        assert_eq!(out, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn crlf_degrades_to_lf() {
        let out = normalize("First line.\r\nSecond line.");
        assert_eq!(out, "First line.\nSecond line.");
    }

    #[test]
    fn uppercases_standalone_i() {
        assert_eq!(normalize("i am happy"), "I am happy");
        assert_eq!(normalize("so i said"), "So I said");
    }

    #[test]
    fn leaves_i_inside_words_alone() {
        assert_eq!(normalize("Big inside itself."), "Big inside itself.");
    }

    #[test]
    fn repairs_contractions() {
        assert_eq!(normalize("i dont know"), "I don't know");
        assert_eq!(normalize("im sure it wont hurt"), "I'm sure it won't hurt");
        assert_eq!(normalize("We cant stop now."), "We can't stop now.");
    }

    #[test]
    fn contraction_repair_is_case_insensitive() {
        assert_eq!(normalize("Dont panic."), "Don't panic.");
    }

    #[test]
    fn disambiguates_its_before_trigger_words() {
        assert_eq!(normalize("Its the best day."), "It's the best day.");
        assert_eq!(normalize("I think its my turn."), "I think it's my turn.");
    }

    #[test]
    fn leaves_possessive_its_alone() {
        // "tail" is not in the trigger list, so the possessive survives.
        assert_eq!(
            normalize("The dog wagged its tail."),
            "The dog wagged its tail."
        );
    }

    #[test]
    fn terminates_lowercase_line_endings() {
        let out = normalize("end of line\nnext");
        assert_eq!(out, "End of line.\nNext");
    }

    #[test]
    fn leaves_punctuated_line_endings_alone() {
        assert_eq!(normalize("Stop!\nGo."), "Stop!\nGo.");
        assert_eq!(normalize("Room 101\nis locked."), "Room 101\nis locked.");
    }

    #[test]
    fn capitalizes_sentence_starts() {
        assert_eq!(
            normalize("hello world. this is a test."),
            "Hello world. This is a test."
        );
        assert_eq!(normalize("wait! really? yes."), "Wait! Really? Yes.");
    }

    #[test]
    fn digit_after_terminator_consumes_the_boundary() {
        assert_eq!(normalize("Chapter done. 3 dogs barked."), "Chapter done. 3 dogs barked.");
    }

    #[test]
    fn no_capitalization_without_whitespace_after_terminator() {
        assert_eq!(normalize("Visit example.com today."), "Visit example.com today.");
    }

    #[test]
    fn idempotent_on_sample_corpus() {
        let samples = [
            "",
            "i dont know  what    im doing\nits the truth",
            "hello world. this is a test.",
            "end of line\nnext",
            "The dog wagged its tail.\n\nit was happy",
            "Stop!   really?\tyes",
            "multi  space\r\nand crlf",
        ];
        for s in &samples {
            let once = normalize(s);
            let twice = normalize(&once);
            assert_eq!(once, twice, "not idempotent for input: {:?}", s);
        }
    }

    #[test]
    fn full_pipeline_on_messy_draft() {
        let draft = "once upon a time   i found a lamp\nit was old but its the kind\nof lamp i dont see anymore";
        let out = normalize(draft);
        assert_eq!(
            out,
            "Once upon a time I found a lamp.\nIt was old but it's the kind.\nOf lamp I don't see anymore"
        );
    }

    #[test]
    fn compile_rejects_empty_word_lists() {
        let err = RuleSet::compile(vec![RuleConfig::RepairContractions(Vec::new())]);
        assert!(matches!(err, Err(NormalizeError::EmptyWordList(_))));

        let err = RuleSet::compile(vec![RuleConfig::DisambiguateIts(Vec::new())]);
        assert!(matches!(err, Err(NormalizeError::EmptyWordList(_))));
    }

    #[test]
    fn word_lists_are_escaped_before_pattern_assembly() {
        // A word carrying regex metacharacters must not break compilation.
        let set = RuleSet::compile(vec![RuleConfig::RepairContractions(vec![(
            "a+b".to_string(),
            "a plus b".to_string(),
        )])])
        .unwrap();
        assert_eq!(set.normalize("x a+b y"), "x a plus b y");
    }

    #[test]
    fn parse_ron_roundtrip() {
        let source = r#"[
            CollapseWhitespace,
            RepairContractions([("dont", "don't")]),
        ]"#;
        let set = RuleSet::parse_ron(source).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.normalize("i  dont"), "i don't");
    }

    #[test]
    fn rule_order_is_the_contract() {
        // Capitalization before contraction repair would leave "Dont"
        // untouched by a case-sensitive matcher; the standard order repairs
        // first and capitalizes last.
        let out = normalize("dont stop");
        assert_eq!(out, "Don't stop");
    }

    #[test]
    fn config_names_are_stable() {
        for config in RuleConfig::standard_pipeline() {
            assert!(!config.name().is_empty());
        }
    }
}
