//! Daily ledger report
//!
//! Groups transactions per UTC calendar day, totals fees, assets and expenses
//! in the target symbol and lists the day's legs ordered by category.

use crate::domain::entities::transaction::{Category, Transaction, TransactionType};
use crate::domain::errors::ConversionError;
use crate::domain::services::conversion::ConversionPipeline;
use crate::domain::services::totals::{calculate_total_amount, value_in};
use crate::domain::value_objects::amount::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Transaction ids are cut to this many characters in the table
const TRANSACTION_ID_WIDTH: usize = 10;

/// Minimum width of amount columns
const CURRENCY_PADDING: usize = 10;

const DIVIDER: &str = "------------------------------------------------------------";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub category: Category,
    pub amount: Amount,
    pub value: Amount,
    pub timestamp: DateTime<Utc>,
    pub side: TransactionType,
    pub source_name: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub fees: Amount,
    pub assets: Amount,
    pub expenses: Amount,
    /// assets - expenses
    pub remainder: Amount,
    pub rows: Vec<ReportRow>,
}

impl DaySummary {
    /// Net growth of the day, `None` when the day lost value
    pub fn added(&self) -> Option<&Amount> {
        (!self.remainder.is_negative()).then_some(&self.remainder)
    }

    /// Net loss of the day, `None` when the day kept or added value
    pub fn spent(&self) -> Option<&Amount> {
        self.remainder.is_negative().then_some(&self.remainder)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub target_symbol: String,
    pub days: Vec<DaySummary>,
}

pub fn truncate_id(id: &str, max_chars: usize) -> String {
    if id.chars().count() <= max_chars {
        return id.to_string();
    }
    let mut truncated: String = id.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn summarize_day(
    date: NaiveDate,
    transactions: &[Transaction],
    pipeline: &ConversionPipeline,
    target_symbol: &str,
) -> Result<DaySummary, ConversionError> {
    let day_start = start_of_day(date);
    let total = |category| calculate_total_amount(transactions, pipeline, day_start, target_symbol, category);

    let fees = total(Category::Fee)?;
    let assets = total(Category::Asset)?;
    let expenses = total(Category::Expense)?;
    let remainder = assets.subtract(&expenses)?;

    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.category);

    let rows = ordered
        .into_iter()
        .map(|t| {
            Ok(ReportRow {
                category: t.category,
                amount: t.amount.clone(),
                value: value_in(&t.amount, pipeline, t.timestamp, target_symbol)?,
                timestamp: t.timestamp,
                side: t.transaction_type,
                source_name: t.source_name.clone(),
                transaction_id: truncate_id(&t.transaction_id, TRANSACTION_ID_WIDTH),
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    Ok(DaySummary {
        date,
        fees,
        assets,
        expenses,
        remainder,
        rows,
    })
}

pub fn build_daily_report(
    transactions: &[Transaction],
    pipeline: &ConversionPipeline,
    target_symbol: &str,
) -> Result<DailyReport, ConversionError> {
    let mut ordered = transactions.to_vec();
    ordered.sort_by_key(|t| t.timestamp);

    let mut days = Vec::new();
    let mut start = 0;
    while start < ordered.len() {
        let date = ordered[start].timestamp.date_naive();
        let end = ordered[start..]
            .iter()
            .position(|t| t.timestamp.date_naive() != date)
            .map_or(ordered.len(), |offset| start + offset);

        days.push(summarize_day(date, &ordered[start..end], pipeline, target_symbol)?);
        start = end;
    }

    Ok(DailyReport {
        target_symbol: target_symbol.to_string(),
        days,
    })
}

fn write_table_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, " | {} |", padded.join(" | "))
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = [
            "Category".to_string(),
            "Quantity".to_string(),
            "Asset".to_string(),
            format!("In {}", self.target_symbol),
            "Time".to_string(),
            "Side".to_string(),
            "Source".to_string(),
            "Tx ID".to_string(),
        ];
        let none = format!("{:>width$}", "None", width = CURRENCY_PADDING);

        for day in &self.days {
            writeln!(f, "{}", DIVIDER)?;
            writeln!(f, " * Totals on {}:", day.date.format("%Y-%m-%d"))?;
            writeln!(f, "{}", DIVIDER)?;
            writeln!(f, "   Fees:\t{:>width$}", day.fees.to_string(), width = CURRENCY_PADDING)?;

            let added = day
                .added()
                .map(|a| format!("{:>width$}", a.to_string(), width = CURRENCY_PADDING))
                .unwrap_or_else(|| none.clone());
            let spent = day
                .spent()
                .map(|a| format!("{:>width$}", a.to_string(), width = CURRENCY_PADDING))
                .unwrap_or_else(|| none.clone());
            writeln!(f, "   Added:\t{}", added)?;
            writeln!(f, "   Expenses:\t{}", spent)?;
            writeln!(f)?;

            let cells: Vec<[String; 8]> = day
                .rows
                .iter()
                .map(|row| {
                    [
                        row.category.to_string(),
                        row.amount.to_string(),
                        row.amount.symbol().to_string(),
                        format!("{:>width$}", row.value.to_string(), width = CURRENCY_PADDING),
                        row.timestamp.format("%H:%M").to_string(),
                        row.side.to_string(),
                        row.source_name.clone(),
                        row.transaction_id.clone(),
                    ]
                })
                .collect();

            let mut widths = headers.clone().map(|h| h.chars().count());
            for line in &cells {
                for (width, cell) in widths.iter_mut().zip(line) {
                    *width = (*width).max(cell.chars().count());
                }
            }

            write_table_line(f, &headers, &widths)?;
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            writeln!(f, " |-{}-|", rule.join("-|-"))?;
            for line in &cells {
                write_table_line(f, line, &widths)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
