// src/report.rs
// Presentation of valuation results; the library never formats output itself

use dcf_valuation::domain::errors::AppResult;
use dcf_valuation::domain::models::ScenarioResult;
use dcf_valuation::profile::{PreparedValuation, Units};
use dcf_valuation::scenario::ScenarioOutcome;
use serde_json::{json, Value};

/// Plain-text grid in the style of `+---+---+` tables
pub struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let separator = |fill: char| {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&fill.to_string().repeat(width + 2));
                line.push('+');
            }
            line.push('\n');
            line
        };
        let format_row = |cells: &[String]| {
            let mut line = String::from("|");
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                line.push_str(&format!(" {:<width$} |", cell, width = width));
            }
            line.push('\n');
            line
        };

        let mut out = separator('-');
        out.push_str(&format_row(&self.headers));
        out.push_str(&separator('='));
        for row in &self.rows {
            out.push_str(&format_row(row));
            out.push_str(&separator('-'));
        }
        out
    }
}

fn money(value: f64, units: &Units) -> String {
    format!(
        "${:.2}{}",
        value / units.currency.factor(),
        units.currency.suffix()
    )
}

fn metric_row<F>(label: &str, outcomes: &[ScenarioOutcome], cell: F) -> Vec<String>
where
    F: Fn(&ScenarioResult) -> String,
{
    let mut row = vec![label.to_string()];
    row.extend(outcomes.iter().map(|o| match &o.result {
        Ok(result) => cell(result),
        Err(_) => "n/a".to_string(),
    }));
    row
}

/// Scenario comparison plus year-by-year projections
pub fn valuation_table(prepared: &PreparedValuation, outcomes: &[ScenarioOutcome]) -> String {
    let units = &prepared.display_units;
    let mut out = format!(
        "{}\nCalculated WACC: {:.2}% | Discount rate: {:.2}%\n\n",
        prepared.company,
        prepared.wacc * 100.0,
        prepared.context.discount_rate * 100.0
    );

    let mut headers = vec!["Metric".to_string()];
    headers.extend(outcomes.iter().map(|o| o.name.to_string()));

    let mut summary = Grid::new(headers.clone());
    summary.push_row(metric_row("Enterprise Value", outcomes, |r| {
        money(r.enterprise_value, units)
    }));
    summary.push_row(metric_row("Equity Value", outcomes, |r| {
        money(r.equity_value, units)
    }));
    summary.push_row(metric_row("Final Price per Share", outcomes, |r| {
        format!("${:.2}", r.final_price_per_share)
    }));
    summary.push_row(metric_row("Final Price-to-FCF Ratio", outcomes, |r| {
        format!("{:.2}", r.price_to_fcf)
    }));
    let mut status = vec!["Status".to_string()];
    status.extend(outcomes.iter().map(|o| match &o.result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    }));
    summary.push_row(status);
    out.push_str(&summary.render());

    let horizon = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|r| r.fcf_projection.horizon())
        .max()
        .unwrap_or(0);

    if horizon > 0 {
        out.push_str("\nYear-by-Year Projections:\n");
        let mut yearly = Grid::new(headers);
        for year in 0..horizon {
            let mut row = vec![format!("FY {}", prepared.base_fiscal_year + year as i32)];
            row.extend(outcomes.iter().map(|o| match &o.result {
                Ok(r) if year < r.fcf_projection.horizon() => format!(
                    "FCF: {} | Shares: {:.1}{} | Price: ${:.2}",
                    money(r.fcf_projection.values()[year], units),
                    r.share_counts[year] / units.shares.factor(),
                    units.shares.suffix(),
                    r.share_prices[year]
                ),
                _ => String::new(),
            }));
            yearly.push_row(row);
        }
        out.push_str(&yearly.render());
    }

    out
}

/// JSON document with every outcome; monetary values in base units
pub fn valuation_json(
    prepared: &PreparedValuation,
    outcomes: &[ScenarioOutcome],
) -> AppResult<String> {
    let scenarios: Vec<Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(result) => Ok(json!({
                "name": o.name,
                "status": "ok",
                "result": serde_json::to_value(result)?,
            })),
            Err(e) => Ok(json!({
                "name": o.name,
                "status": "error",
                "error": e.to_string(),
            })),
        })
        .collect::<Result<_, serde_json::Error>>()?;

    let document = json!({
        "company": prepared.company,
        "ticker": prepared.ticker,
        "base_fiscal_year": prepared.base_fiscal_year,
        "wacc": prepared.wacc,
        "discount_rate": prepared.context.discount_rate,
        "scenarios": scenarios,
    });

    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn wacc_output(prepared: &PreparedValuation, json_format: bool) -> AppResult<String> {
    if json_format {
        let document = json!({
            "company": prepared.company,
            "wacc": prepared.wacc,
            "cost_of_equity": prepared.context.capital.cost_of_equity(),
        });
        return Ok(serde_json::to_string_pretty(&document)?);
    }
    Ok(format!(
        "{}\nCalculated WACC: {:.2}%\n",
        prepared.company,
        prepared.wacc * 100.0
    ))
}

pub fn implied_growth_output(growth: f64, json_format: bool) -> AppResult<String> {
    if json_format {
        return Ok(serde_json::to_string_pretty(&json!({ "implied_growth": growth }))?);
    }
    Ok(format!("Implied Growth Rate: {:.2}%\n", growth * 100.0))
}
