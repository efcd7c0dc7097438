//! Data model shared by the generators, the cache and the engine facade

mod signal;
mod slug;
mod tier;
mod user;

pub use signal::{PageMetadata, PromotionalSignal, SignalPriority, SignalType};
pub use slug::{Confidence, SlugCandidate, SlugComponents, SlugSource, SlugStyle};
pub use tier::{ModelClass, ModelTier, SubscriptionTier, TierRequest};
pub use user::{Capitalization, UserContext, UserPattern, UserPreferences};
