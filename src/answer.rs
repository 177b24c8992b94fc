//! Answer synthesis from retrieved context.

use serde::Serialize;

/// What retrieval produced for a question.
///
/// An empty search result is carried as `NoRelevantContext` so a synthesizer
/// can never mistake it for a legitimate, empty context string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "passages", rename_all = "snake_case")]
pub enum RetrievedContext {
    Passages(Vec<String>),
    NoRelevantContext,
}

impl RetrievedContext {
    /// Wraps ranked search results, dropping blank passages.
    pub fn from_results(results: Vec<String>) -> Self {
        let passages: Vec<String> = results
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        if passages.is_empty() {
            RetrievedContext::NoRelevantContext
        } else {
            RetrievedContext::Passages(passages)
        }
    }

    pub fn passages(&self) -> &[String] {
        match self {
            RetrievedContext::Passages(passages) => passages.as_slice(),
            RetrievedContext::NoRelevantContext => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RetrievedContext::NoRelevantContext)
    }
}

pub trait AnswerSynthesizer: Send + Sync {
    fn synthesize(&self, question: &str, context: &RetrievedContext) -> String;
}

pub const NO_CONTEXT_ANSWER: &str = "No relevant information found in the documents.";

/// Answers by quoting the retrieved passages in rank order.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSynthesizer;

impl AnswerSynthesizer for ExtractiveSynthesizer {
    fn synthesize(&self, _question: &str, context: &RetrievedContext) -> String {
        match context {
            RetrievedContext::NoRelevantContext => NO_CONTEXT_ANSWER.to_string(),
            RetrievedContext::Passages(passages) => {
                format!("Based on the retrieved context: {}", passages.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod answer_test {
    use super::*;

    #[test]
    fn test_empty_results_are_explicit() {
        assert_eq!(RetrievedContext::from_results(vec![]), RetrievedContext::NoRelevantContext);
        assert_eq!(
            RetrievedContext::from_results(vec!["   ".to_string(), String::new()]),
            RetrievedContext::NoRelevantContext
        );
    }

    #[test]
    fn test_passages_keep_rank_order() {
        let context = RetrievedContext::from_results(vec![
            "first".to_string(),
            "".to_string(),
            "second".to_string(),
        ]);
        assert_eq!(context.passages(), &["first".to_string(), "second".to_string()]);
        assert!(!context.is_empty());
    }

    #[test]
    fn test_extractive_answers() {
        let synth = ExtractiveSynthesizer;

        let none = synth.synthesize("anything?", &RetrievedContext::NoRelevantContext);
        assert_eq!(none, NO_CONTEXT_ANSWER);

        let context = RetrievedContext::Passages(vec!["A.".to_string(), "B.".to_string()]);
        assert_eq!(synth.synthesize("q", &context), "Based on the retrieved context: A. B.");
    }

    #[test]
    fn test_context_serializes_with_kind() {
        let json = serde_json::to_value(RetrievedContext::NoRelevantContext).unwrap();
        assert_eq!(json["kind"], "no_relevant_context");

        let json = serde_json::to_value(RetrievedContext::Passages(vec!["x".to_string()])).unwrap();
        assert_eq!(json["kind"], "passages");
        assert_eq!(json["passages"][0], "x");
    }
}
