//! Carbon Credit Client Core
//!
//! Service layer of the carbon-credit client. UI and CLI callers issue
//! commands here; each service validates against the ledger, prices through
//! the [`lib_market::PricingEngine`], and settles into the shared
//! [`lib_ledger::Ledger`].
//!
//! # Services
//!
//! - [`SwapService`]: buy / sell carbon tokens against the AMM pool
//! - [`StakingService`]: stake, unstake, claim and accrue rewards
//! - [`RetirementService`]: burn tokens and issue a stored certificate
//! - [`WalletService`]: mint, transfer, governance votes
//!
//! # Failure Model
//!
//! Preconditions are checked before any mutation. Collaborator calls
//! (reserves, content store) complete before the ledger write guard is taken,
//! so a collaborator failure or timeout leaves balance and history untouched
//! and the call can simply be retried.
//!
//! # Usage
//!
//! ```ignore
//! use lib_carbon::{CarbonConfig, CarbonDesk};
//! use lib_ledger::ActorId;
//!
//! let desk = CarbonDesk::simulated(CarbonConfig::default(), ActorId::new("0xA11CE"), today)?;
//! desk.wallet().mint(dec!(100)).await?;
//! let bought = desk.swap().buy(dec!(1000), dec!(0.5)).await?;
//! ```

pub mod collaborators;
pub mod config;
pub mod context;
pub mod desk;
pub mod errors;
pub mod memory;
pub mod portfolio;
pub mod retirement;
pub mod staking;
pub mod swap;
pub mod wallet;

pub use collaborators::{ContentStore, ReserveSource, Session};
pub use config::CarbonConfig;
pub use context::{ServiceContext, SharedEngine};
pub use desk::{CarbonDesk, Collaborators};
pub use errors::{CarbonError, CarbonResult, ErrorKind};
pub use memory::{MemoryContentStore, SimulatedLatency, StaticReserveSource, WalletSession};
pub use portfolio::PortfolioSummary;
pub use retirement::{RetirementOutcome, RetirementService};
pub use staking::StakingService;
pub use swap::{SwapOutcome, SwapPhase, SwapService};
pub use wallet::WalletService;
