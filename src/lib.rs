// Grievance: consumer complaint narrative analysis
//
// This is the library root. Each module corresponds to a stage of the
// analysis: loading, cleaning, topic sweeps, and anchor classification.

pub mod classify;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod normalize;
pub mod output;
pub mod topics;
