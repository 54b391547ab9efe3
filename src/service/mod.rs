pub mod calculator;
pub mod proposal;
pub mod pvgis;

pub use calculator::EconomicsCalculator;
pub use proposal::{ProposalDocument, ProposalRenderer};
pub use pvgis::{IrradianceSource, PvgisClient};
