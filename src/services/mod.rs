pub mod ai;
pub mod collision;
pub mod heuristic;
pub mod pattern;
pub mod signals;
pub mod slug_service;
pub mod tier;

pub use ai::{AiUsageRecorder, AnthropicProvider, CompletionProvider, NoopUsageRecorder};
pub use collision::{Clock, CollisionResolver, FixedClock, SlugExistence, SystemClock};
pub use heuristic::{HeuristicGenerator, generate_heuristic_slug};
pub use pattern::learn_pattern;
pub use signals::{detect_promotional_signals, primary_signal};
pub use slug_service::{GenerateRequest, SlugEngine};
pub use tier::{ModelCatalog, model_class_for, select_model};
