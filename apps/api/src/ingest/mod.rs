// Proposal ingestion: uploaded file -> cleaned plain text + fingerprint.

pub mod extract;
pub mod handlers;
