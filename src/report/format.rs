//! Formatted terminal output.
//!
//! Formatting lives in one place so:
//! - the estimation code stays free of presentation concerns
//! - output changes are localized (the tables are snapshot-tested)
//!
//! Non-finite metrics (percent errors over a zero actual) print as `inf`/`NaN`
//! rather than being hidden.

use crate::domain::{MetricSummary, ReportConfig};
use crate::io::IngestedPanel;
use crate::report::ModelComparison;
use crate::screening::InflationOutlook;

/// Significance level used for the verdict column of the DM table.
const DM_VERDICT_LEVEL: f64 = 0.05;

/// Header block: data source, variables and windows.
pub fn format_run_summary(config: &ReportConfig, panel: &IngestedPanel) -> String {
    let mut out = String::new();

    out.push_str("=== macro-forecast - Lithuanian macro forecast comparison ===\n");
    out.push_str(&format!(
        "Data: {} ({} rows, {})\n",
        panel.source,
        panel.rows_read,
        panel.table.coverage()
    ));
    out.push_str(&format!(
        "Variables: {} | horizon={} | DM horizon={}\n",
        config.variables.join(", "),
        config.horizon,
        config.dm_horizon
    ));
    out.push_str("Windows:\n");
    for w in &config.windows {
        out.push_str(&format!(
            "  {:<3} in-sample {}  holdout {}\n",
            w.label, w.in_sample, w.holdout
        ));
    }

    out
}

/// Pooled error metrics, one row per (variable, family).
///
/// `*` marks the best family of a variable, `+` the second best.
pub fn format_metrics_table(summaries: &[MetricSummary], comparisons: &[ModelComparison]) -> String {
    let mut out = String::new();
    out.push_str("Pooled forecast errors:\n");
    push_line(
        &mut out,
        format!(
            "  {:<8} {:<10} {:>3} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "variable", "model", "n", "MSE", "RMSE", "MAE", "MSPE", "RMSPE", "MAPE"
        ),
    );
    push_line(
        &mut out,
        format!(
            "  {:-<8} {:-<10} {:-<3} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", "", "", "", ""
        ),
    );

    for s in summaries {
        let selection = comparisons.iter().find(|c| c.selection.variable == s.variable);
        let mark = match selection {
            Some(c) if c.selection.best == s.family => '*',
            Some(c) if c.selection.second == s.family => '+',
            _ => ' ',
        };
        let m = &s.metrics;
        push_line(
            &mut out,
            format!(
                "{mark} {:<8} {:<10} {:>3} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                s.variable,
                s.family.display_name(),
                m.n,
                m.mse,
                m.rmse,
                m.mae,
                m.mspe,
                m.rmspe,
                m.mape
            ),
        );
    }

    out
}

/// Diebold-Mariano results, one row per variable.
pub fn format_significance_table(comparisons: &[ModelComparison]) -> String {
    let mut out = String::new();
    out.push_str("Diebold-Mariano (best vs second best, squared loss):\n");
    push_line(
        &mut out,
        format!(
            "{:<8} {:<10} {:<10} {:>3} {:>9} {:>8} {:<6}",
            "variable", "best", "second", "n", "DM", "p-value", "differ"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<8} {:-<10} {:-<10} {:-<3} {:-<9} {:-<8} {:-<6}",
            "", "", "", "", "", "", ""
        ),
    );
    for c in comparisons {
        let s = &c.significance;
        let verdict = if s.p_value < DM_VERDICT_LEVEL { "yes" } else { "no" };
        push_line(
            &mut out,
            format!(
                "{:<8} {:<10} {:<10} {:>3} {:>9.4} {:>8.4} {:<6}",
                s.variable,
                s.best.display_name(),
                s.second.display_name(),
                s.n,
                s.statistic,
                s.p_value,
                verdict
            ),
        );
    }
    out
}

/// Predictor screening table plus the VAR outlook.
pub fn format_screening(outlook: &InflationOutlook, alpha: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Predictors of {} ({}, keep p < {alpha}):\n",
        outlook.target, outlook.window
    ));
    push_line(
        &mut out,
        format!(
            "{:<10} {:>10} {:>10} {:>8} {:>8} {:<4}",
            "predictor", "coef", "std.err", "t", "p-value", "kept"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<10} {:-<10} {:-<10} {:-<8} {:-<8} {:-<4}", "", "", "", "", "", ""),
    );
    for s in &outlook.screens {
        push_line(
            &mut out,
            format!(
                "{:<10} {:>10.4} {:>10.4} {:>8.3} {:>8.4} {:<4}",
                s.predictor,
                s.coefficient,
                s.std_error,
                s.t_stat,
                s.p_value,
                if s.retained { "yes" } else { "no" }
            ),
        );
    }

    out.push_str(&format!(
        "\nVAR(1) over [{}], {}\n",
        outlook.model_variables.join(", "),
        outlook.window
    ));
    out.push_str(&format!(
        "{} forecast for {}: {:.3}\n",
        outlook.target, outlook.forecast_year, outlook.forecast
    ));
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BestModels, ErrorMetrics, ModelFamily, PredictorScreen, SignificanceResult, YearRange};
    use crate::fit::fit_var1;

    fn metrics(rmse: f64, mape: f64) -> ErrorMetrics {
        ErrorMetrics {
            n: 9,
            mse: rmse * rmse,
            rmse,
            mae: rmse * 0.5,
            mspe: mape * mape,
            rmspe: mape,
            mape,
        }
    }

    fn comparison() -> ModelComparison {
        ModelComparison {
            selection: BestModels {
                variable: "gdp".to_string(),
                best: ModelFamily::Ar1,
                second: ModelFamily::Ma1,
                best_rmse: 1.5,
                second_rmse: 2.0,
            },
            significance: SignificanceResult {
                variable: "gdp".to_string(),
                best: ModelFamily::Ar1,
                second: ModelFamily::Ma1,
                statistic: -0.3219,
                p_value: 0.75571,
                n: 9,
            },
        }
    }

    #[test]
    fn metrics_table_snapshot() {
        let summaries = vec![
            MetricSummary {
                family: ModelFamily::Ar1,
                variable: "gdp".to_string(),
                metrics: metrics(1.5, f64::INFINITY),
            },
            MetricSummary {
                family: ModelFamily::Ma1,
                variable: "gdp".to_string(),
                metrics: metrics(2.0, 0.25),
            },
            MetricSummary {
                family: ModelFamily::Var1,
                variable: "gdp".to_string(),
                metrics: metrics(3.0, 0.5),
            },
        ];
        let txt = format_metrics_table(&summaries, &[comparison()]);
        let expected = concat!(
            "Pooled forecast errors:\n",
            "  variable model        n        MSE       RMSE        MAE       MSPE      RMSPE       MAPE\n",
            "  -------- ---------- --- ---------- ---------- ---------- ---------- ---------- ----------\n",
            "* gdp      AR(1)        9     2.2500     1.5000     0.7500        inf        inf        inf\n",
            "+ gdp      MA(1)        9     4.0000     2.0000     1.0000     0.0625     0.2500     0.2500\n",
            "  gdp      VAR(1)       9     9.0000     3.0000     1.5000     0.2500     0.5000     0.5000\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn significance_table_snapshot() {
        let txt = format_significance_table(&[comparison()]);
        let expected = concat!(
            "Diebold-Mariano (best vs second best, squared loss):\n",
            "variable best       second       n        DM  p-value differ\n",
            "-------- ---------- ---------- --- --------- -------- ------\n",
            "gdp      AR(1)      MA(1)        9   -0.3219   0.7557 no\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn screening_report_lists_every_predictor() {
        let names = vec!["inf".to_string(), "oil".to_string()];
        let model = fit_var1(&names, &[vec![1.0, 2.5, 2.0, 4.0, 3.5], vec![10.0, 12.0, 15.0, 13.0, 17.0]]).unwrap();
        let outlook = InflationOutlook {
            target: "inf".to_string(),
            window: YearRange::new(2016, 2020),
            screens: vec![
                PredictorScreen {
                    predictor: "oil".to_string(),
                    coefficient: 0.25,
                    std_error: 0.05,
                    t_stat: 5.0,
                    p_value: 0.0154,
                    retained: true,
                },
                PredictorScreen {
                    predictor: "mos".to_string(),
                    coefficient: -0.1,
                    std_error: 0.2,
                    t_stat: -0.5,
                    p_value: 0.6511,
                    retained: false,
                },
            ],
            model_variables: names,
            model,
            forecast_year: 2021,
            forecast: 4.56789,
        };
        let txt = format_screening(&outlook, 0.1);
        assert!(txt.starts_with("Predictors of inf (2016-2020, keep p < 0.1):\n"));
        assert!(txt.contains("oil            0.2500     0.0500    5.000   0.0154 yes\n"));
        assert!(txt.contains("mos           -0.1000     0.2000   -0.500   0.6511 no\n"));
        assert!(txt.contains("VAR(1) over [inf, oil], 2016-2020\n"));
        assert!(txt.ends_with("inf forecast for 2021: 4.568\n"));
    }
}
