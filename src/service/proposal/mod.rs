//! 提案文档: 绘制指令构建 + PDF 序列化

pub mod document;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod pdf;

pub use document::{DrawOp, ProposalDocument};
pub use layout::ProposalRenderer;
