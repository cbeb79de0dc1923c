//! # score-engine
//!
//! The scoring core: keyword matching, score aggregation, and the
//! conversation score pipeline.
//!
//! A block of user-authored text is matched against each catalog category
//! twice over: a literal phase (case-insensitive substring containment) and,
//! when the literal phase finds fewer than three keywords, a semantic phase
//! comparing text and keyword embeddings by cosine similarity. Matches feed
//! a coarse step function per category, and category scores sum into a
//! 0-100 total with a qualitative summary.
//!
//! External collaborators (embedding provider, key-value store) are
//! injected; every external failure degrades rather than aborting scoring,
//! so the worst case is a literal-only score.

pub mod matcher;
pub mod scorer;
pub mod service;

pub use matcher::{CategoryMatch, Matcher};
pub use scorer::{evaluation_summary, step_score};
pub use service::ScoringService;
