//! Entity extraction
//!
//! Pure, deterministic functions that pull structured trading parameters
//! out of a free-text message: ticker symbols, quantity, limit price and
//! order side. Extraction never fails; a missing match yields a default.

use crate::models::OrderSide;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Uppercase ticker tokens, 1-5 chars. Known limitation: incidental
    /// all-caps words ("CEO", "USA") also match; callers treat symbol
    /// lists as heuristic.
    static ref TICKER_RE: Regex = Regex::new(r"\b[A-Z]{1,5}\b").unwrap();
    /// First standalone digit run anywhere in the message.
    static ref QUANTITY_RE: Regex = Regex::new(r"\b(\d+)\b").unwrap();
    /// Price patterns tried in order: "$150", "at 150", "for 150.50".
    static ref PRICE_RES: [Regex; 3] = [
        Regex::new(r"\$\s*(\d+\.?\d*)").unwrap(),
        Regex::new(r"at\s+(\d+\.?\d*)").unwrap(),
        Regex::new(r"for\s+(\d+\.?\d*)").unwrap(),
    ];
}

/// Default company-name to ticker lookup table.
const COMPANY_TO_TICKER: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("tesla", "TSLA"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("meta", "META"),
    ("facebook", "META"),
    ("nvidia", "NVDA"),
    ("netflix", "NFLX"),
    ("amd", "AMD"),
    ("intel", "INTC"),
    ("ford", "F"),
    ("gm", "GM"),
    ("general motors", "GM"),
    ("disney", "DIS"),
    ("coca cola", "KO"),
    ("pepsi", "PEP"),
];

const BUY_KEYWORDS: &[&str] = &["buy", "purchase", "kaufe"];

/// Pure entity extractor over raw user messages.
///
/// The company table is injected at construction so tests can substitute
/// a custom lexicon; `EntityExtractor::new()` carries the default table.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    companies: Vec<(String, String)>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            companies: COMPANY_TO_TICKER
                .iter()
                .map(|(name, ticker)| (name.to_string(), ticker.to_string()))
                .collect(),
        }
    }

    /// Extractor with a caller-supplied company lexicon. Names are
    /// matched against the lowercased message, so they should be
    /// lowercase themselves.
    pub fn with_companies(companies: Vec<(String, String)>) -> Self {
        Self { companies }
    }

    /// Extract ticker symbols: uppercase 1-5 char tokens from the
    /// original-case message, unioned with company-name hits from the
    /// lowercased message. Deduplicated in first-seen order; ordering
    /// carries no meaning.
    pub fn extract_symbols(&self, message: &str) -> Vec<String> {
        let message_lower = message.to_lowercase();
        let mut symbols: Vec<String> = Vec::new();

        for m in TICKER_RE.find_iter(message) {
            let symbol = m.as_str().to_string();
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }

        for (company, ticker) in &self.companies {
            if message_lower.contains(company.as_str()) && !symbols.contains(ticker) {
                symbols.push(ticker.clone());
            }
        }

        symbols
    }

    /// Extract quantity: the first digit run in the message, default 1.
    /// The first number wins even when it is actually a price; the price
    /// patterns rely on their surrounding keywords to disambiguate.
    pub fn extract_quantity(&self, message: &str) -> u32 {
        QUANTITY_RE
            .captures(message)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(1)
    }

    /// Extract a limit price: dollar-prefixed number, then "at <n>", then
    /// "for <n>"; first matching pattern wins.
    pub fn extract_price(&self, message: &str) -> Option<f64> {
        let message_lower = message.to_lowercase();
        for re in PRICE_RES.iter() {
            if let Some(captures) = re.captures(&message_lower) {
                if let Ok(price) = captures[1].parse() {
                    return Some(price);
                }
            }
        }
        None
    }

    /// Extract the order side: `Buy` if any buy keyword appears,
    /// otherwise `Sell`. This is a default-to-sell policy, not a
    /// "no side found" signal.
    pub fn extract_side(&self, message: &str) -> OrderSide {
        let message_lower = message.to_lowercase();
        if BUY_KEYWORDS.iter().any(|kw| message_lower.contains(kw)) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_uppercase_tickers() {
        let extractor = EntityExtractor::new();
        let symbols = extractor.extract_symbols("Compare AAPL and TSLA");
        assert!(symbols.contains(&"AAPL".to_string()));
        assert!(symbols.contains(&"TSLA".to_string()));
    }

    #[test]
    fn maps_company_name_to_ticker() {
        let extractor = EntityExtractor::new();
        let symbols = extractor.extract_symbols("how is apple doing?");
        assert_eq!(symbols, vec!["AAPL".to_string()]);
    }

    #[test]
    fn dedupes_ticker_and_company_name() {
        let extractor = EntityExtractor::new();
        // "Tesla" resolves to TSLA which is already present as a token
        let symbols = extractor.extract_symbols("TSLA vs Tesla");
        assert_eq!(
            symbols.iter().filter(|s| s.as_str() == "TSLA").count(),
            1
        );
    }

    #[test]
    fn multi_word_company_names_match() {
        let extractor = EntityExtractor::new();
        let symbols = extractor.extract_symbols("thoughts on general motors?");
        assert!(symbols.contains(&"GM".to_string()));
    }

    #[test]
    fn quantity_defaults_to_one() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_quantity("buy some apple stock"), 1);
    }

    #[test]
    fn quantity_takes_first_digit_run() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_quantity("buy 5 AAPL at 150"), 5);
    }

    #[test]
    fn price_prefers_dollar_sign() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_price("buy 5 AAPL at $150"), Some(150.0));
        assert_eq!(extractor.extract_price("sell 3 TSLA at 250.50"), Some(250.5));
        assert_eq!(extractor.extract_price("get 2 MSFT for 410"), Some(410.0));
        assert_eq!(extractor.extract_price("buy 5 AAPL"), None);
    }

    #[test]
    fn side_defaults_to_sell() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_side("AAPL 5"), OrderSide::Sell);
        assert_eq!(extractor.extract_side("dump my TSLA shares"), OrderSide::Sell);
    }

    #[test]
    fn buy_keyword_wins_over_sell() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract_side("sell MSFT and buy AAPL"),
            OrderSide::Buy
        );
        assert_eq!(extractor.extract_side("kaufe 3 BMW"), OrderSide::Buy);
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = EntityExtractor::new();
        let message = "Buy 5 AAPL at $150";
        assert_eq!(
            extractor.extract_symbols(message),
            extractor.extract_symbols(message)
        );
        assert_eq!(
            extractor.extract_quantity(message),
            extractor.extract_quantity(message)
        );
        assert_eq!(
            extractor.extract_price(message),
            extractor.extract_price(message)
        );
    }

    #[test]
    fn custom_lexicon_is_honored() {
        let extractor = EntityExtractor::with_companies(vec![(
            "acme".to_string(),
            "ACME".to_string(),
        )]);
        assert_eq!(
            extractor.extract_symbols("is acme worth holding?"),
            vec!["ACME".to_string()]
        );
    }
}
