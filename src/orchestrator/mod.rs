//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次对照的资源管理和阶段调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (读取 PDF、导出结果)
//!     ↓
//! workflow::ComparisonFlow (翻译 → 对齐 → 打分)
//!     ↓
//! services (能力层：translate / align / similarity / export)
//!     ↓
//! infrastructure (基础设施：PdfExtractor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层读写文件
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计

pub mod app;

pub use app::App;
