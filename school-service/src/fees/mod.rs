//! Fee domain: academic session calendar, fee periods, the plan deriver
//! and the invoice payment state machine. Pure functions over models;
//! persistence lives in `services::fee_plans`.

pub mod lifecycle;
pub mod period;
pub mod planner;
pub mod session;

pub use lifecycle::{begin_payment, override_status, TransitionError};
pub use period::{FeePeriod, ParsePeriodError, Quarter};
pub use planner::{derive_plan, BlockReason, FeePlanView, PaymentAnalysis, PlanRow};
pub use session::{AcademicSession, SESSION_MONTHS};
