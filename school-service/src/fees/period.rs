use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::session::{month_abbrev, month_index, AcademicSession, SESSION_MONTHS};
use crate::models::{FeePlan, InvoiceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn number(self) -> usize {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    fn index(self) -> usize {
        self.number() - 1
    }

    pub fn months(self) -> [Month; 3] {
        let i = self.index() * 3;
        [SESSION_MONTHS[i], SESSION_MONTHS[i + 1], SESSION_MONTHS[i + 2]]
    }

    pub fn of_month(month: Month) -> Quarter {
        Quarter::ALL[month_index(month) / 3]
    }

    pub fn first_month(self) -> Month {
        self.months()[0]
    }

    pub fn label(self) -> String {
        format!("Q{}", self.number())
    }

    /// "Apr-Jun"
    pub fn span_label(self) -> String {
        let [first, _, last] = self.months();
        format!("{}-{}", month_abbrev(first), month_abbrev(last))
    }
}

/// The slice of a session an invoice pays for. Wire form: `ANNUAL`,
/// `Q1`..`Q4` or `APR`..`MAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeePeriod {
    Session,
    Quarter(Quarter),
    Month(Month),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown fee period '{0}'")]
pub struct ParsePeriodError(String);

impl FeePeriod {
    /// Every period billed under `plan`, in session order.
    pub fn for_plan(plan: FeePlan) -> Vec<FeePeriod> {
        match plan {
            FeePlan::Annual => vec![FeePeriod::Session],
            FeePlan::Quarterly => Quarter::ALL.into_iter().map(FeePeriod::Quarter).collect(),
            FeePlan::Monthly => SESSION_MONTHS.into_iter().map(FeePeriod::Month).collect(),
        }
    }

    pub fn plan(self) -> FeePlan {
        match self {
            FeePeriod::Session => FeePlan::Annual,
            FeePeriod::Quarter(_) => FeePlan::Quarterly,
            FeePeriod::Month(_) => FeePlan::Monthly,
        }
    }

    pub fn due_date(self, session: &AcademicSession) -> NaiveDate {
        match self {
            FeePeriod::Session => session.due_date(Month::April),
            FeePeriod::Quarter(q) => session.due_date(q.first_month()),
            FeePeriod::Month(m) => session.due_date(m),
        }
    }

    pub fn title(self, session: &AcademicSession) -> String {
        match self {
            FeePeriod::Session => format!("Annual Fee {}", session.label()),
            FeePeriod::Quarter(q) => format!("Tuition Fee - {} ({})", q.label(), q.span_label()),
            FeePeriod::Month(m) => {
                format!("Tuition Fee - {} {}", month_abbrev(m), session.year_of(m))
            }
        }
    }

    /// Share of `annual_fee` billed for this period. Monthly shares are
    /// rounded to whole rupees, so twelve of them may not sum to the fee.
    pub fn amount(self, annual_fee: Decimal) -> Decimal {
        match self {
            FeePeriod::Session => annual_fee,
            FeePeriod::Quarter(_) => annual_fee / Decimal::from(4),
            FeePeriod::Month(_) => (annual_fee / Decimal::from(12))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    /// Coverage of invoices stored before `period` existed, read from the title.
    pub fn infer_from_title(fee_type: InvoiceType, title: &str) -> Option<FeePeriod> {
        match fee_type {
            InvoiceType::Annual => Some(FeePeriod::Session),
            InvoiceType::Quarterly => Quarter::ALL
                .into_iter()
                .find(|q| title.contains(&q.label()))
                .map(FeePeriod::Quarter),
            InvoiceType::Monthly => SESSION_MONTHS
                .into_iter()
                .find(|m| title.contains(&format!(" {} ", month_abbrev(*m))))
                .map(FeePeriod::Month),
            InvoiceType::Other => None,
        }
    }
}

impl fmt::Display for FeePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeePeriod::Session => f.write_str("ANNUAL"),
            FeePeriod::Quarter(q) => f.write_str(&q.label()),
            FeePeriod::Month(m) => f.write_str(&month_abbrev(*m).to_uppercase()),
        }
    }
}

impl FromStr for FeePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if upper == "ANNUAL" {
            return Ok(FeePeriod::Session);
        }
        if let Some(q) = Quarter::ALL.into_iter().find(|q| q.label() == upper) {
            return Ok(FeePeriod::Quarter(q));
        }
        SESSION_MONTHS
            .into_iter()
            .find(|m| month_abbrev(*m).to_uppercase() == upper)
            .map(FeePeriod::Month)
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

impl TryFrom<String> for FeePeriod {
    type Error = ParsePeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeePeriod> for String {
    fn from(period: FeePeriod) -> Self {
        period.to_string()
    }
}
