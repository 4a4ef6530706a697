//! Ticket lifecycle module
//!
//! Ticket types and the settlement state machine, plus the oracle and
//! ledger-of-record collaborators with in-memory paper implementations and
//! the permissionless settlement agent.

mod ledger;
mod lifecycle;
mod oracle;
mod settler;
mod types;

pub use ledger::{BuyOrder, Ledger, LedgerError, PaperLedger, SettleOutcome};
pub use lifecycle::{
    progressive_claimable, settle_status, settled_entitlement, verdicts, won_payout,
    LifecycleError,
};
pub use oracle::{Oracle, OracleError, OracleSet, PaperOracle};
pub use settler::{SettleStats, Settler};
pub use types::{
    LegResolution, LegStatus, LegVerdict, PayoutMode, Ticket, TicketId, TicketStatus,
};
