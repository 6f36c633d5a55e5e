//! Derives the payable rows of a fee plan for the current session.
//!
//! Rows come from two places: invoices already stored for the plan's type,
//! and virtual rows for every period of the plan that no stored invoice
//! covers. Rows whose period overlaps a payment made under another plan
//! carry a [`BlockReason`] and cannot be paid.

use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::period::{FeePeriod, Quarter};
use super::session::{month_abbrev, month_index, AcademicSession};
use crate::models::{FeeInvoice, FeePlan, FeeStatus, InvoiceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// Annual row after a quarterly or monthly payment.
    PartialPayment,
    /// Quarterly or monthly row after the annual payment.
    AnnualPaid,
    MonthConflict(Month),
    QuarterConflict(Quarter),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::PartialPayment => {
                f.write_str("Partial payment already made via Monthly/Quarterly plan.")
            }
            BlockReason::AnnualPaid => f.write_str("Full session paid via Annual Plan."),
            BlockReason::MonthConflict(m) => write!(
                f,
                "Conflict: {} is already paid via Monthly Plan.",
                month_abbrev(*m)
            ),
            BlockReason::QuarterConflict(q) => write!(
                f,
                "Conflict: {} is already paid via Quarterly Plan.",
                q.label()
            ),
        }
    }
}

impl Serialize for BlockReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What the session's paid or processing invoices already cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentAnalysis {
    pub annual_settled: bool,
    quarters: [bool; 4],
    months: [bool; 12],
}

impl PaymentAnalysis {
    pub fn of(invoices: &[FeeInvoice], session: &AcademicSession) -> Self {
        let mut analysis = Self::default();
        let active = invoices
            .iter()
            .filter(|inv| inv.status.is_active() && session.contains(inv.due_date));
        for invoice in active {
            match invoice.coverage() {
                Some(FeePeriod::Session) => analysis.annual_settled = true,
                Some(FeePeriod::Quarter(q)) => analysis.quarters[q.number() - 1] = true,
                Some(FeePeriod::Month(m)) => analysis.months[month_index(m)] = true,
                None => {}
            }
        }
        analysis
    }

    pub fn quarter_paid(&self, quarter: Quarter) -> bool {
        self.quarters[quarter.number() - 1]
    }

    pub fn month_paid(&self, month: Month) -> bool {
        self.months[month_index(month)]
    }

    pub fn has_partial_payment(&self) -> bool {
        self.quarters.iter().chain(self.months.iter()).any(|paid| *paid)
    }

    /// Why `period` may not be paid under its own plan, if at all.
    pub fn block_reason(&self, period: FeePeriod) -> Option<BlockReason> {
        match period {
            FeePeriod::Session if self.has_partial_payment() => Some(BlockReason::PartialPayment),
            FeePeriod::Session => None,
            _ if self.annual_settled => Some(BlockReason::AnnualPaid),
            FeePeriod::Quarter(q) => q
                .months()
                .into_iter()
                .find(|m| self.month_paid(*m))
                .map(BlockReason::MonthConflict),
            FeePeriod::Month(m) if self.quarter_paid(Quarter::of_month(m)) => {
                Some(BlockReason::QuarterConflict(Quarter::of_month(m)))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_id: Option<String>,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    #[serde(rename = "type")]
    pub fee_type: InvoiceType,
    pub period: Option<FeePeriod>,
    pub is_virtual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<BlockReason>,
}

impl PlanRow {
    fn stored(invoice: &FeeInvoice, blocked_reason: Option<BlockReason>) -> Self {
        Self {
            invoice_id: Some(invoice.id.clone()),
            virtual_id: None,
            title: invoice.title.clone(),
            amount: invoice.amount,
            due_date: invoice.due_date,
            status: invoice.status,
            fee_type: invoice.fee_type,
            period: invoice.coverage(),
            is_virtual: false,
            blocked_reason,
        }
    }

    fn virtual_row(
        period: FeePeriod,
        session: &AcademicSession,
        annual_fee: Decimal,
        blocked_reason: Option<BlockReason>,
    ) -> Self {
        Self {
            invoice_id: None,
            virtual_id: Some(format!("virt-{}-{}", period, session.start_year)),
            title: period.title(session),
            amount: period.amount(annual_fee),
            due_date: period.due_date(session),
            status: FeeStatus::Pending,
            fee_type: period.plan().into(),
            period: Some(period),
            is_virtual: true,
            blocked_reason,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked_reason.is_some()
    }

    /// Open and not blocked.
    pub fn is_payable(&self) -> bool {
        !self.is_blocked() && self.status.is_open()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeePlanView {
    pub session: AcademicSession,
    pub plan: FeePlan,
    pub rows: Vec<PlanRow>,
    #[serde(with = "rust_decimal::serde::float")]
    pub outstanding: Decimal,
    /// Most recent paid or processing invoice, by payment date.
    pub last_payment: Option<FeeInvoice>,
    /// Paid invoices, newest payment first.
    pub paid_history: Vec<FeeInvoice>,
}

impl FeePlanView {
    /// View for a student with no billable batch.
    pub fn empty(plan: FeePlan, invoices: &[FeeInvoice], today: NaiveDate) -> Self {
        Self {
            session: AcademicSession::for_date(today),
            plan,
            rows: Vec::new(),
            outstanding: Decimal::ZERO,
            last_payment: last_payment(invoices),
            paid_history: paid_history(invoices),
        }
    }

    /// Row for `period`, preferring one that is still open.
    pub fn row_for(&self, period: FeePeriod) -> Option<&PlanRow> {
        let mut matching = self.rows.iter().filter(|row| row.period == Some(period));
        let first = matching.clone().next();
        matching.find(|row| row.status.is_open()).or(first)
    }
}

/// Builds the rows a student can see and pay under `plan` on `today`.
pub fn derive_plan(
    annual_fee: Decimal,
    invoices: &[FeeInvoice],
    plan: FeePlan,
    today: NaiveDate,
) -> FeePlanView {
    let session = AcademicSession::for_date(today);
    let analysis = PaymentAnalysis::of(invoices, &session);
    let fee_type = InvoiceType::from(plan);

    let mut rows = Vec::new();
    let mut covered = Vec::new();
    for invoice in invoices
        .iter()
        .filter(|inv| inv.fee_type == fee_type && session.contains(inv.due_date))
    {
        let period = invoice.coverage();
        covered.extend(period);
        let blocked = match period {
            Some(p) if invoice.status.is_open() => analysis.block_reason(p),
            _ => None,
        };
        rows.push(PlanRow::stored(invoice, blocked));
    }

    for period in FeePeriod::for_plan(plan) {
        if covered.contains(&period) {
            continue;
        }
        rows.push(PlanRow::virtual_row(
            period,
            &session,
            annual_fee,
            analysis.block_reason(period),
        ));
    }

    if plan != FeePlan::Annual {
        let horizon = end_of_month(today);
        rows.retain(|row| {
            row.status != FeeStatus::Pending || row.is_blocked() || row.due_date <= horizon
        });
    }

    rows.sort_by_key(|row| (!row.status.is_active(), row.due_date));

    let outstanding: Decimal = rows
        .iter()
        .filter(|row| row.is_payable())
        .map(|row| row.amount)
        .sum();

    FeePlanView {
        session,
        plan,
        rows,
        outstanding,
        last_payment: last_payment(invoices),
        paid_history: paid_history(invoices),
    }
}

fn last_payment(invoices: &[FeeInvoice]) -> Option<FeeInvoice> {
    invoices
        .iter()
        .filter(|inv| inv.status.is_active())
        .max_by_key(|inv| inv.payment_date.unwrap_or(inv.due_date))
        .cloned()
}

fn paid_history(invoices: &[FeeInvoice]) -> Vec<FeeInvoice> {
    let mut paid: Vec<_> = invoices
        .iter()
        .filter(|inv| inv.status == FeeStatus::Paid)
        .cloned()
        .collect();
    paid.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    paid
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(chrono::Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid(period: FeePeriod, session: &AcademicSession, fee: Decimal) -> FeeInvoice {
        let mut inv = FeeInvoice::new(
            "STUD1".into(),
            period.title(session),
            period.amount(fee),
            period.due_date(session),
            period.plan().into(),
            Some(period),
        );
        inv.status = FeeStatus::Paid;
        inv
    }

    fn fee() -> Decimal {
        Decimal::from(15000)
    }

    #[test]
    fn test_fresh_monthly_plan_in_april_shows_one_row() {
        let view = derive_plan(fee(), &[], FeePlan::Monthly, date(2024, 4, 5));
        assert_eq!(view.rows.len(), 1);
        let row = &view.rows[0];
        assert_eq!(row.title, "Tuition Fee - Apr 2024");
        assert_eq!(row.amount, Decimal::from(1250));
        assert_eq!(row.status, FeeStatus::Pending);
        assert!(row.is_virtual);
        assert_eq!(row.virtual_id.as_deref(), Some("virt-APR-2024"));
        assert!(!row.is_blocked());
        assert_eq!(view.outstanding, Decimal::from(1250));
    }

    #[test]
    fn test_annual_plan_is_never_filtered() {
        let view = derive_plan(fee(), &[], FeePlan::Annual, date(2024, 4, 5));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].title, "Annual Fee 2024-2025");
        assert_eq!(view.rows[0].due_date, date(2024, 4, 10));
        assert_eq!(view.rows[0].amount, fee());
    }

    #[test]
    fn test_quarterly_plan_shows_quarters_due_by_month_end() {
        let view = derive_plan(fee(), &[], FeePlan::Quarterly, date(2024, 10, 20));
        let titles: Vec<_> = view.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Tuition Fee - Q1 (Apr-Jun)",
                "Tuition Fee - Q2 (Jul-Sep)",
                "Tuition Fee - Q3 (Oct-Dec)",
            ]
        );
        assert_eq!(view.outstanding, Decimal::from(11250));
    }

    #[test]
    fn test_monthly_payment_blocks_annual_row() {
        let s = AcademicSession::starting(2024);
        let invoices = vec![paid(FeePeriod::Month(Month::April), &s, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Annual, date(2024, 5, 1));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(
            view.rows[0].blocked_reason,
            Some(BlockReason::PartialPayment)
        );
        assert_eq!(view.outstanding, Decimal::ZERO);
    }

    #[test]
    fn test_month_conflict_blocks_its_quarter() {
        let s = AcademicSession::starting(2024);
        let invoices = vec![paid(FeePeriod::Month(Month::July), &s, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Quarterly, date(2024, 7, 15));
        let q2 = view.row_for(FeePeriod::Quarter(Quarter::Q2)).unwrap();
        assert_eq!(
            q2.blocked_reason.map(|r| r.to_string()).as_deref(),
            Some("Conflict: Jul is already paid via Monthly Plan.")
        );
        let q1 = view.row_for(FeePeriod::Quarter(Quarter::Q1)).unwrap();
        assert!(!q1.is_blocked());
    }

    #[test]
    fn test_quarter_payment_blocks_exactly_its_months() {
        let s = AcademicSession::starting(2024);
        let invoices = vec![paid(FeePeriod::Quarter(Quarter::Q1), &s, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Monthly, date(2024, 8, 1));
        for row in &view.rows {
            let Some(FeePeriod::Month(m)) = row.period else {
                panic!("monthly row without month");
            };
            let in_q1 = Quarter::of_month(m) == Quarter::Q1;
            assert_eq!(row.is_blocked(), in_q1, "{}", row.title);
        }
        let april = view.row_for(FeePeriod::Month(Month::April)).unwrap();
        assert_eq!(
            april.blocked_reason.unwrap().to_string(),
            "Conflict: Q1 is already paid via Quarterly Plan."
        );
    }

    #[test]
    fn test_each_month_of_a_quarter_blocks_it() {
        let s = AcademicSession::starting(2024);
        let invoices = vec![paid(FeePeriod::Month(Month::May), &s, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Quarterly, date(2024, 5, 20));
        let q1 = view.row_for(FeePeriod::Quarter(Quarter::Q1)).unwrap();
        assert_eq!(
            q1.blocked_reason.map(|r| r.to_string()).as_deref(),
            Some("Conflict: May is already paid via Monthly Plan.")
        );
        assert_eq!(view.outstanding, Decimal::ZERO);
    }

    #[test]
    fn test_last_payment_and_paid_history() {
        let s = AcademicSession::starting(2024);
        let mut april = paid(FeePeriod::Month(Month::April), &s, fee());
        april.payment_date = Some(date(2024, 4, 8));
        let mut may = paid(FeePeriod::Month(Month::May), &s, fee());
        may.payment_date = Some(date(2024, 5, 9));
        let mut june = paid(FeePeriod::Month(Month::June), &s, fee());
        june.status = FeeStatus::Processing;
        june.payment_date = Some(date(2024, 6, 2));
        let invoices = vec![april.clone(), june.clone(), may.clone()];

        let view = derive_plan(fee(), &invoices, FeePlan::Monthly, date(2024, 6, 5));
        assert_eq!(view.last_payment.as_ref().map(|i| i.id.as_str()), Some(june.id.as_str()));
        let history: Vec<_> = view.paid_history.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(history, vec![may.id.as_str(), april.id.as_str()]);

        let empty = FeePlanView::empty(FeePlan::Monthly, &[], date(2024, 6, 5));
        assert!(empty.last_payment.is_none());
        assert!(empty.paid_history.is_empty());
    }

    #[test]
    fn test_paid_rows_sort_first_and_replace_virtual() {
        let s = AcademicSession::starting(2024);
        let invoices = vec![paid(FeePeriod::Month(Month::May), &s, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Monthly, date(2024, 5, 20));
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].status, FeeStatus::Paid);
        assert!(!view.rows[0].is_virtual);
        assert_eq!(view.rows[1].title, "Tuition Fee - Apr 2024");
        assert_eq!(view.outstanding, Decimal::from(1250));
    }

    #[test]
    fn test_previous_session_payments_are_ignored() {
        let last = AcademicSession::starting(2023);
        let invoices = vec![paid(FeePeriod::Session, &last, fee())];
        let view = derive_plan(fee(), &invoices, FeePlan::Monthly, date(2024, 4, 2));
        assert_eq!(view.rows.len(), 1);
        assert!(!view.rows[0].is_blocked());
    }

    #[test]
    fn test_legacy_titles_count_as_coverage() {
        let s = AcademicSession::starting(2024);
        let mut legacy = paid(FeePeriod::Quarter(Quarter::Q2), &s, fee());
        legacy.period = None;
        let view = derive_plan(fee(), &[legacy], FeePlan::Monthly, date(2024, 9, 1));
        let aug = view.row_for(FeePeriod::Month(Month::August)).unwrap();
        assert!(aug.is_blocked());
    }

    #[test]
    fn test_open_stored_row_is_blocked_by_annual_payment() {
        let s = AcademicSession::starting(2024);
        let mut pending_q = paid(FeePeriod::Quarter(Quarter::Q1), &s, fee());
        pending_q.status = FeeStatus::Overdue;
        let invoices = vec![paid(FeePeriod::Session, &s, fee()), pending_q];
        let view = derive_plan(fee(), &invoices, FeePlan::Quarterly, date(2024, 6, 1));
        let q1 = view.row_for(FeePeriod::Quarter(Quarter::Q1)).unwrap();
        assert!(!q1.is_virtual);
        assert_eq!(q1.blocked_reason, Some(BlockReason::AnnualPaid));
        assert_eq!(view.outstanding, Decimal::ZERO);
    }

    #[test]
    fn test_zero_fee_gives_zero_amounts() {
        let view = derive_plan(Decimal::ZERO, &[], FeePlan::Quarterly, date(2024, 4, 1));
        assert!(view.rows.iter().all(|r| r.amount.is_zero()));
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2024, 12, 31)), date(2024, 12, 31));
    }

    #[test]
    fn test_row_wire_format() {
        let view = derive_plan(fee(), &[], FeePlan::Monthly, date(2024, 4, 5));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["plan"], "MONTHLY");
        assert_eq!(json["session"]["startYear"], 2024);
        let row = &json["rows"][0];
        assert_eq!(row["virtualId"], "virt-APR-2024");
        assert_eq!(row["isVirtual"], true);
        assert_eq!(row["type"], "MONTHLY");
        assert_eq!(row["period"], "APR");
        assert!(row.get("blockedReason").is_none());
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Quarterly shares are exact; monthly shares sum to the fee within rounding.
        #[test]
        fn shares_add_up_to_the_fee(rupees in 0i64..1_000_000) {
            let fee = Decimal::from(rupees);
            let quarters: Decimal = FeePeriod::for_plan(FeePlan::Quarterly)
                .into_iter()
                .map(|p| p.amount(fee))
                .sum();
            prop_assert_eq!(quarters, fee);

            let months: Decimal = FeePeriod::for_plan(FeePlan::Monthly)
                .into_iter()
                .map(|p| p.amount(fee))
                .sum();
            prop_assert!((months - fee).abs() <= Decimal::from(6));
        }

        /// Any monthly payment this session blocks the annual row.
        #[test]
        fn monthly_payment_blocks_annual(month_idx in 0usize..12, today in any_date()) {
            let s = AcademicSession::for_date(today);
            let month = crate::fees::SESSION_MONTHS[month_idx];
            let invoices = vec![paid(FeePeriod::Month(month), &s, fee())];
            let view = derive_plan(fee(), &invoices, FeePlan::Annual, today);
            let annual = view.row_for(FeePeriod::Session).unwrap();
            prop_assert!(annual.is_blocked());
        }

        /// A settled annual fee blocks every quarterly and monthly row.
        #[test]
        fn annual_payment_blocks_everything_else(today in any_date(), processing in any::<bool>()) {
            let s = AcademicSession::for_date(today);
            let mut annual = paid(FeePeriod::Session, &s, fee());
            if processing {
                annual.status = FeeStatus::Processing;
            }
            let invoices = vec![annual];
            for plan in [FeePlan::Quarterly, FeePlan::Monthly] {
                let view = derive_plan(fee(), &invoices, plan, today);
                for row in view.rows {
                    prop_assert_eq!(row.blocked_reason, Some(BlockReason::AnnualPaid));
                }
            }
        }

        /// A paid month blocks exactly the quarter that contains it.
        #[test]
        fn monthly_payment_blocks_exactly_its_quarter(month_idx in 0usize..12, processing in any::<bool>()) {
            let s = AcademicSession::starting(2024);
            let month = crate::fees::SESSION_MONTHS[month_idx];
            let mut invoice = paid(FeePeriod::Month(month), &s, fee());
            if processing {
                invoice.status = FeeStatus::Processing;
            }
            let analysis = PaymentAnalysis::of(&[invoice], &s);
            for quarter in Quarter::ALL {
                let expected = (quarter == Quarter::of_month(month))
                    .then_some(BlockReason::MonthConflict(month));
                prop_assert_eq!(analysis.block_reason(FeePeriod::Quarter(quarter)), expected);
            }
        }

        /// Derived rows always sit inside the session of `today`.
        #[test]
        fn rows_stay_in_session(today in any_date()) {
            let s = AcademicSession::for_date(today);
            for plan in [FeePlan::Annual, FeePlan::Quarterly, FeePlan::Monthly] {
                let view = derive_plan(fee(), &[], plan, today);
                prop_assert!(!view.rows.is_empty());
                for row in &view.rows {
                    prop_assert!(s.contains(row.due_date));
                }
            }
        }
    }
}
