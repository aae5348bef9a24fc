//! Intent classifier
//!
//! Maps a free-text message to exactly one `Intent` by walking a fixed,
//! ordered list of keyword rules. Rules that need extracted entities
//! (comparison, chart) consult the entity extractor before accepting and
//! fall through to later rules when the entity count is too low. When no
//! rule accepts, the message goes to the free-text finance agent.

use crate::extractor::EntityExtractor;
use crate::models::Intent;

/// One classification rule: an intent and the keywords that trigger it.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|kw| kw.to_string()).collect(),
        }
    }
}

/// Default rule table. Order is significant: earlier rules win when
/// keywords overlap ("sell my positions" is portfolio, not ordering).
fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            Intent::MarketStatus,
            &[
                "market open",
                "market closed",
                "börse",
                "trading hours",
                "market status",
            ],
        ),
        IntentRule::new(
            Intent::Portfolio,
            &[
                "portfolio",
                "account",
                "balance",
                "positions",
                "holdings",
                "my stocks",
            ],
        ),
        IntentRule::new(
            Intent::Comparison,
            &[
                "compare",
                "vs",
                "versus",
                "against",
                "better than",
                "vergleich",
                "oder",
            ],
        ),
        IntentRule::new(
            Intent::Ordering,
            &["buy", "sell", "purchase", "kaufe", "verkaufe"],
        ),
        IntentRule::new(
            Intent::Chart,
            &["chart", "graph", "visualize", "show", "price", "diagramm"],
        ),
    ]
}

/// Deterministic, first-applicable-rule-wins intent classifier.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    extractor: EntityExtractor,
}

impl IntentClassifier {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self {
            rules: default_rules(),
            extractor,
        }
    }

    /// Classifier with a substituted rule table, for tests.
    pub fn with_rules(rules: Vec<IntentRule>, extractor: EntityExtractor) -> Self {
        Self { rules, extractor }
    }

    /// Classify a message. Always resolves to exactly one intent;
    /// `Intent::Finance` is the fallback when no rule accepts.
    pub fn classify(&self, message: &str) -> Intent {
        let message_lower = message.to_lowercase();

        for rule in &self.rules {
            if !rule.keywords.iter().any(|kw| message_lower.contains(kw.as_str())) {
                continue;
            }

            match rule.intent {
                // Comparison needs two symbols to compare; chart needs one
                // to draw. Too few means the keyword was incidental, so
                // later rules still get a chance.
                Intent::Comparison => {
                    if self.extractor.extract_symbols(message).len() >= 2 {
                        return Intent::Comparison;
                    }
                }
                Intent::Chart => {
                    if !self.extractor.extract_symbols(message).is_empty() {
                        return Intent::Chart;
                    }
                }
                intent => return intent,
            }
        }

        Intent::Finance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(EntityExtractor::new())
    }

    #[test]
    fn classifies_market_status() {
        let c = classifier();
        assert_eq!(c.classify("Is the market open?"), Intent::MarketStatus);
        assert_eq!(c.classify("ist die Börse offen?"), Intent::MarketStatus);
    }

    #[test]
    fn classifies_portfolio() {
        let c = classifier();
        assert_eq!(c.classify("What's in my portfolio?"), Intent::Portfolio);
        assert_eq!(c.classify("show my account balance"), Intent::Portfolio);
    }

    #[test]
    fn comparison_requires_two_symbols() {
        let c = classifier();
        assert_eq!(c.classify("Compare AAPL and TSLA"), Intent::Comparison);
        // Company name resolves to a ticker, still two symbols
        assert_eq!(c.classify("Compare AAPL and Tesla"), Intent::Comparison);
        // One symbol: comparison rule falls through, no later rule matches
        assert_eq!(c.classify("compare apple with the index"), Intent::Finance);
    }

    #[test]
    fn chart_requires_one_symbol() {
        let c = classifier();
        assert_eq!(c.classify("Show me AAPL chart"), Intent::Chart);
        assert_eq!(c.classify("Show me a chart"), Intent::Finance);
    }

    #[test]
    fn ordering_beats_chart_keywords() {
        let c = classifier();
        // "buy" and "price" both present; ordering is the earlier rule
        assert_eq!(c.classify("Buy 5 AAPL at a good price"), Intent::Ordering);
        assert_eq!(c.classify("Buy 5 AAPL at $150"), Intent::Ordering);
    }

    #[test]
    fn unmatched_message_falls_back_to_finance() {
        let c = classifier();
        assert_eq!(c.classify("Should I diversify into bonds?"), Intent::Finance);
        assert_eq!(c.classify(""), Intent::Finance);
    }

    #[test]
    fn classification_is_idempotent() {
        let c = classifier();
        let message = "Compare Apple and Tesla";
        assert_eq!(c.classify(message), c.classify(message));
    }

    #[test]
    fn substituted_rules_are_honored() {
        let rules = vec![IntentRule::new(Intent::Portfolio, &["depot"])];
        let c = IntentClassifier::with_rules(rules, EntityExtractor::new());
        assert_eq!(c.classify("zeig mein depot"), Intent::Portfolio);
        assert_eq!(c.classify("buy 5 AAPL"), Intent::Finance);
    }
}
