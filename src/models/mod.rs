pub mod economics;
pub mod irradiance;
pub mod proposal;

pub use economics::{EconomicsInput, EconomicsOutcome, EconomicsResult, Payback, RawEconomicsInput};
pub use irradiance::{IrradianceQuery, IrradianceResult};
pub use proposal::ProposalRequest;
