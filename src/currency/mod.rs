//! Money rendering helpers shared by totals consumers.

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Renders `<symbol><amount>` with exactly two fraction digits.
///
/// The sign follows the symbol (`$-5.00`) and there is no grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFormatter {
    symbol: String,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        // -0.0 would otherwise print as "-0.00"
        let amount = if amount == 0.0 { 0.0 } else { amount };
        format!("{}{:.2}", self.symbol, amount)
    }
}

/// Formats `amount` with the default `$` symbol.
pub fn format_money(amount: f64) -> String {
    SymbolFormatter::default().format_amount(amount)
}
