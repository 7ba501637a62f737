//! Batch interface: reads submissions, loads their documents and reports
//! outcomes in a transport-neutral shape.

pub mod attachments;
pub mod csv;
pub mod problem;
