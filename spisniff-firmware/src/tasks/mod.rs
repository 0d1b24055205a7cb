//! Embassy async tasks
//!
//! The boundary task runs on the high-priority interrupt executor; the
//! report task runs on the thread-mode executor.

pub mod boundary;
pub mod report;

pub use boundary::boundary_task;
pub use report::report_task;
