// Session document model: resume and portfolio trees, their id-keyed
// collections, export/import and the portfolio preview.

pub mod export;
pub mod handlers;
pub mod models;
pub mod preview;
pub mod store;
