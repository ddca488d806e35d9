//! Regime-conditional risk summary.
//!
//! Groups scored loans by macro regime and reports how predicted risk and
//! realised defaults differ between Expansion and Stress. Loans without a
//! regime are left out.

use crate::{OutputError, Result, ScoredLoans};
use regime_pd_data::Regime;
use regime_pd_model::{mean, percentile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk statistics of one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeRiskRow {
    /// Regime
    pub regime: Regime,
    /// Mean predicted PD
    pub mean_pd: f64,
    /// 95th percentile of predicted PD
    pub pd_95: f64,
    /// Share of loans that defaulted
    pub observed_default_rate: f64,
    /// Number of loans
    pub count: usize,
}

/// Per-regime risk statistics, in regime order. Regimes without loans are
/// omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeRiskSummary {
    rows: Vec<RegimeRiskRow>,
}

impl RegimeRiskSummary {
    /// Summarise scored loans by regime.
    ///
    /// # Errors
    /// [`OutputError::Empty`] when no loan has a regime.
    pub fn from_scored(scored: &ScoredLoans) -> Result<Self> {
        let rows: Vec<RegimeRiskRow> = Regime::ALL
            .into_iter()
            .filter_map(|regime| {
                let (pd, defaults) = scored.in_regime(regime);
                Some(RegimeRiskRow {
                    regime,
                    mean_pd: mean(&pd)?,
                    pd_95: percentile(&pd, 95.0)?,
                    observed_default_rate: mean(&defaults)?,
                    count: pd.len(),
                })
            })
            .collect();

        if rows.is_empty() {
            return Err(OutputError::Empty("no loan has a macro regime".to_string()));
        }
        Ok(Self { rows })
    }

    /// Rows in regime order.
    pub fn rows(&self) -> &[RegimeRiskRow] {
        &self.rows
    }

    /// Statistics of a single regime.
    pub fn get(&self, regime: Regime) -> Option<&RegimeRiskRow> {
        self.rows.iter().find(|row| row.regime == regime)
    }

    /// Relative increase of the Stress mean PD over the Expansion mean PD,
    /// in percent.
    ///
    /// `None` when either regime is absent or the Expansion mean is zero.
    pub fn relative_mean_pd_uplift(&self) -> Option<f64> {
        let stress = self.get(Regime::Stress)?.mean_pd;
        let expansion = self.get(Regime::Expansion)?.mean_pd;
        (expansion != 0.0).then(|| 100.0 * (stress - expansion) / expansion)
    }

    /// One-line uplift statement, or an explanation when it is undefined.
    pub fn uplift_line(&self) -> String {
        self.relative_mean_pd_uplift().map_or_else(
            || "Relative Mean PD Increase (Stress vs Expansion): n/a".to_string(),
            |uplift| format!("Relative Mean PD Increase (Stress vs Expansion): {uplift:.2}%"),
        )
    }

    /// Fixed-width text table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&"=".repeat(72));
        output.push_str("\nRegime-Conditional Risk Summary\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>20} {:>12}\n",
            "Regime", "Mean PD", "PD 95%", "Observed Default", "Count"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:>12.4} {:>12.4} {:>20.4} {:>12}\n",
                row.regime.as_str(),
                row.mean_pd,
                row.pd_95,
                row.observed_default_rate,
                row.count
            ));
        }
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&self.uplift_line());
        output.push('\n');
        output
    }

    /// Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("## Regime-Conditional Risk Summary\n\n");
        output.push_str("| Regime | Mean PD | PD 95% | Observed Default Rate | Count |\n");
        output.push_str("|--------|--------:|-------:|----------------------:|------:|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.4} | {} |\n",
                row.regime.as_str(),
                row.mean_pd,
                row.pd_95,
                row.observed_default_rate,
                row.count
            ));
        }
        output.push('\n');
        output.push_str(&self.uplift_line());
        output.push('\n');
        output
    }
}

impl fmt::Display for RegimeRiskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
